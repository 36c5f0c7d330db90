//! Level geometry API: rooms, dynamic objects and per-character visibility.
//!
//! Every mutation here finishes before any character is ticked against the
//! affected geometry. After a mutation that can free surfaces, each character's
//! stored surface references are checked and any that no longer resolve are
//! dropped or re-queried, so no character keeps pointing into freed geometry.

use sim::{
    ObjectHandle, RawSurface, Surface, SurfaceMesh, SurfaceRef, SurfaceSource, TransformInput,
    refresh_floor_and_ceiling,
};

use crate::{Simulation, instance::InstanceId};

impl Simulation {
    /// Start a level with `room_count` room slots.
    pub fn init_level(&mut self, room_count: u32) -> bool {
        self.world.init(room_count)
    }

    /// Drop all level geometry. Characters survive with no surface references.
    pub fn unload_level(&mut self) {
        self.world.unload_level();
        for (_, ctx) in self.instances.iter_mut() {
            ctx.state.clear_surfaces();
        }
    }

    pub fn load_room(&mut self, room_id: u32, statics: &[RawSurface], meshes: &[SurfaceMesh]) -> bool {
        self.world.load_room(room_id, statics, meshes)
    }

    pub fn unload_room(&mut self, room_id: u32) -> bool {
        if !self.world.unload_room(room_id) {
            return false;
        }
        self.drop_stale_surfaces();
        true
    }

    /// Exchange room slots pairwise. Visible lists follow the swap by position.
    pub fn swap_rooms(&mut self, pairs: &[(u32, u32)]) {
        self.world.swap_rooms(pairs);
        self.drop_stale_surfaces();
    }

    pub fn create_dynamic_object(&mut self, transform: &TransformInput, surfaces: &[RawSurface]) -> ObjectHandle {
        self.world.create_dynamic_object(transform, surfaces)
    }

    pub fn move_dynamic_object(&mut self, object: ObjectHandle, transform: &TransformInput) -> bool {
        self.world.move_dynamic_object(object, transform)
    }

    /// Free a dynamic object. Characters standing on it lose the platform and
    /// get a fresh floor right away.
    pub fn delete_dynamic_object(&mut self, object: ObjectHandle) -> bool {
        if !self.world.delete_dynamic_object(object) {
            return false;
        }
        self.drop_stale_surfaces();
        true
    }

    pub fn update_visible_rooms(&mut self, id: InstanceId, room_ids: &[u32]) -> bool {
        self.update_visible_rooms_with_clippers(id, room_ids, &[])
    }

    /// Replace a character's visible rooms and its wall-only clipper surfaces.
    ///
    /// A wall held from the old clipper list is dropped, since clipper
    /// indices refer to whichever list is current.
    pub fn update_visible_rooms_with_clippers(
        &mut self,
        id: InstanceId,
        room_ids: &[u32],
        clippers: &[RawSurface],
    ) -> bool {
        let Some(ctx) = self.instances.get(id) else {
            log::warn!("Tried to update visible rooms of non-existent character {:?}", id);
            return false;
        };
        let view = ctx.view;
        if !self.world.update_visible_rooms(view, room_ids, clippers) {
            return false;
        }
        if let Some(ctx) = self.instances.get_mut(id) {
            if matches!(ctx.state.wall, Some(SurfaceRef::Clipper { .. })) {
                ctx.state.wall = None;
            }
        }
        self.drop_stale_surfaces();
        true
    }

    /// Visible rooms plus the dynamic-object pseudo-room.
    pub fn room_count(&self, id: InstanceId) -> Option<u32> {
        self.world.room_count(self.instances.get(id)?.view)
    }

    pub fn room_surface_count(&self, id: InstanceId, index: u32) -> Option<u32> {
        self.world.room_surface_count(self.instances.get(id)?.view, index)
    }

    pub fn room_surface(&self, id: InstanceId, index: u32, surface_index: u32) -> Option<&Surface> {
        self.world.room_surface(self.instances.get(id)?.view, index, surface_index)
    }

    fn drop_stale_surfaces(&mut self) {
        for (id, ctx) in self.instances.iter_mut() {
            let m = &mut ctx.state;
            let Some(view) = self.world.surface_view(ctx.view) else {
                m.clear_surfaces();
                continue;
            };

            if m.wall.is_some_and(|wall| view.resolve(wall).is_none()) {
                m.wall = None;
            }
            if m.platform.is_some_and(|object| view.object_transform(object).is_none()) {
                m.platform = None;
            }

            let floor_stale = m.floor.is_some_and(|floor| view.resolve(floor).is_none());
            let ceil_stale = m.ceil.is_some_and(|ceil| view.resolve(ceil).is_none());
            if floor_stale || ceil_stale {
                refresh_floor_and_ceiling(m, &view);
                m.platform = m.floor.and_then(|floor| floor.object());
                log::debug!("Re-queried floor of character {:?} after its geometry was freed", id);
            }
        }
    }
}
