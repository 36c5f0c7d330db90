//! World model: rooms, dynamic objects and per-instance visible-room sets.
//!
//! This module is responsible for:
//! - Owning every room and dynamic object and deriving their surfaces.
//! - Keeping one [`VisibleRoomSet`] per character instance, addressed by [`ViewHandle`].
//! - Handing out [`SurfaceView`]s that merge a visible set with the shared
//!   dynamic-object cache for the queries in `collision`.
//!
//! Design notes
//! - Rooms are looked up by host room id through a fixed-size table sized at `init`.
//!   The table maps ids to arena keys, so swapping two ids never moves room data.
//! - The dynamic-object cache lists `(object, surface index)` pairs. It is rebuilt
//!   when an object is created or deleted, never on a move (same slot, same count).
//! - Mutators are fail-soft: bad ids are logged and ignored.
//!
//! Callers that keep [`SurfaceRef`](crate::collision::SurfaceRef)s into an object must
//! refresh them after deleting it; `WorldModel` only guarantees they resolve to `None`.

pub mod dynamic;
pub mod room;
pub mod transform;
pub mod view;
pub mod visible;

pub use dynamic::DynamicObject;
pub use room::{Room, SurfaceMesh};
pub use transform::{ObjectTransform, TransformInput};
pub use view::SurfaceView;
pub use visible::VisibleRoomSet;

use crate::{
    arena::{Arena, Handle},
    collision::{RawSurface, Surface, Vec3},
};

/// Arena key of a loaded room. Survives room-id swaps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RoomKey(pub(crate) Handle);

/// Host-visible handle of a dynamic object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub(crate) Handle);

impl ObjectHandle {
    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0.to_raw()
    }

    #[inline]
    pub fn from_raw(raw: u64) -> Result<Self, &'static str> {
        Handle::from_raw(raw).map(Self)
    }
}

/// Handle of one instance's visible-room set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub(crate) Handle);

#[derive(Default)]
pub struct WorldModel {
    room_table: Vec<Option<RoomKey>>,
    rooms: Arena<Room>,
    objects: Arena<DynamicObject>,
    object_cache: Vec<(ObjectHandle, u32)>,
    views: Arena<VisibleRoomSet>,
    loaded: bool,
}

impl WorldModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the room table for `room_count` ids. Fails if a level is already loaded.
    pub fn init(&mut self, room_count: u32) -> bool {
        if self.loaded {
            log::warn!("Aborted loading a level while one is already loaded");
            return false;
        }
        self.room_table = vec![None; room_count as usize];
        self.loaded = true;
        log::info!("Level initialized with {room_count} room slots");
        true
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Drop every room and dynamic object and empty every visible set.
    /// Visible sets themselves survive; they belong to live instances.
    pub fn unload_level(&mut self) {
        self.loaded = false;
        self.room_table.clear();
        self.rooms.clear();
        self.objects.clear();
        self.object_cache.clear();
        for (_, view) in self.views.iter_mut() {
            view.rooms.clear();
            view.clippers.clear();
        }
        log::info!("Level unloaded");
    }

    pub fn load_room(&mut self, room_id: u32, statics: &[RawSurface], meshes: &[SurfaceMesh]) -> bool {
        if !self.loaded {
            log::warn!("Tried to load room {room_id} into a level that is not loaded");
            return false;
        }
        let Some(slot) = self.room_table.get(room_id as usize) else {
            log::warn!(
                "Tried to load room {room_id} when there is only space for {} rooms",
                self.room_table.len()
            );
            return false;
        };
        if slot.is_some() {
            log::warn!("Tried to reload room {room_id} that was already loaded");
            return false;
        }

        let key = RoomKey(self.rooms.insert(Room::build(room_id, statics, meshes)));
        self.room_table[room_id as usize] = Some(key);
        log::debug!("Loaded room {room_id}");
        true
    }

    /// Free a room. Any visible set still listing it loses that entry.
    pub fn unload_room(&mut self, room_id: u32) -> bool {
        let Some(key) = self.room_table.get_mut(room_id as usize).and_then(Option::take) else {
            log::warn!("Tried to unload room {room_id} that is not loaded");
            return false;
        };

        self.rooms.remove(key.0);
        for (_, view) in self.views.iter_mut() {
            view.purge(key);
        }
        log::debug!("Unloaded room {room_id}");
        true
    }

    /// Exchange room-table entries pairwise, in order.
    ///
    /// A visible set listing the room under `src` keeps the same list position
    /// and now lists whatever was under `dst`. If `dst` was empty the entry is dropped.
    pub fn swap_rooms(&mut self, pairs: &[(u32, u32)]) {
        let len = self.room_table.len();
        for &(src, dst) in pairs {
            let (src_i, dst_i) = (src as usize, dst as usize);
            if src_i >= len || dst_i >= len {
                log::warn!("Tried to swap rooms {src} and {dst} outside of {len} room slots");
                continue;
            }

            let old_src = self.room_table[src_i];
            let old_dst = self.room_table[dst_i];

            if let Some(src_key) = old_src {
                for (_, view) in self.views.iter_mut() {
                    let Some(pos) = view.rooms.iter().position(|&k| k == src_key) else {
                        continue;
                    };
                    match old_dst {
                        Some(dst_key) => view.rooms[pos] = dst_key,
                        None => {
                            log::warn!("Room {dst} swapped into a visible set is not loaded");
                            view.rooms.remove(pos);
                        }
                    }
                }
            }

            self.room_table[src_i] = old_dst;
            self.room_table[dst_i] = old_src;
            log::debug!("Swapped room {src} with room {dst}");
        }
    }

    pub fn room(&self, room_id: u32) -> Option<&Room> {
        let key = (*self.room_table.get(room_id as usize)?)?;
        self.rooms.get(key.0)
    }

    pub fn room_by_key(&self, key: RoomKey) -> Option<&Room> {
        self.rooms.get(key.0)
    }

    pub fn create_dynamic_object(&mut self, transform: &TransformInput, surfaces: &[RawSurface]) -> ObjectHandle {
        let handle = ObjectHandle(self.objects.insert(DynamicObject::new(transform, surfaces)));
        self.rebuild_object_cache();
        log::debug!("Added dynamic object {}", handle.0.index);
        handle
    }

    pub fn move_dynamic_object(&mut self, object: ObjectHandle, transform: &TransformInput) -> bool {
        let Some(obj) = self.objects.get_mut(object.0) else {
            log::warn!("Tried to move non-existent dynamic object {:?}", object);
            return false;
        };
        obj.move_to(transform);
        true
    }

    pub fn delete_dynamic_object(&mut self, object: ObjectHandle) -> bool {
        if self.objects.remove(object.0).is_none() {
            log::warn!("Tried to delete non-existent dynamic object {:?}", object);
            return false;
        }
        self.rebuild_object_cache();
        log::debug!("Removed dynamic object {}", object.0.index);
        true
    }

    pub fn object(&self, object: ObjectHandle) -> Option<&DynamicObject> {
        self.objects.get(object.0)
    }

    pub fn object_transform(&self, object: ObjectHandle) -> Option<&ObjectTransform> {
        self.objects.get(object.0).map(|o| &o.transform)
    }

    fn rebuild_object_cache(&mut self) {
        self.object_cache.clear();
        for (handle, obj) in self.objects.iter() {
            let object = ObjectHandle(handle);
            self.object_cache
                .extend((0..obj.len() as u32).map(|index| (object, index)));
        }
    }

    pub fn create_view(&mut self, world_floor_enabled: bool) -> ViewHandle {
        ViewHandle(self.views.insert(VisibleRoomSet {
            world_floor_enabled,
            ..Default::default()
        }))
    }

    pub fn delete_view(&mut self, view: ViewHandle) -> bool {
        self.views.remove(view.0).is_some()
    }

    pub fn visible(&self, view: ViewHandle) -> Option<&VisibleRoomSet> {
        self.views.get(view.0)
    }

    /// Replace a visible set's room list and clippers.
    ///
    /// Unloaded or out-of-range ids are skipped with a warning. An empty list
    /// leaves the set with no rooms.
    pub fn update_visible_rooms(&mut self, view: ViewHandle, room_ids: &[u32], clippers: &[RawSurface]) -> bool {
        let table = &self.room_table;
        let Some(visible) = self.views.get_mut(view.0) else {
            log::warn!("Tried to update rooms of non-existent visible set {:?}", view);
            return false;
        };

        visible.rooms.clear();
        for &id in room_ids {
            match table.get(id as usize).copied().flatten() {
                Some(key) => visible.rooms.push(key),
                None => log::warn!("Skipping visible room {id}: not loaded"),
            }
        }
        visible.set_clippers(clippers);
        true
    }

    pub fn recenter_world_floor(&mut self, view: ViewHandle, pos: Vec3) {
        if let Some(visible) = self.views.get_mut(view.0) {
            visible.recenter_world_floor(pos);
        }
    }

    pub fn surface_view(&self, view: ViewHandle) -> Option<SurfaceView<'_>> {
        self.views
            .get(view.0)
            .map(|visible| SurfaceView::new(self, visible))
    }

    /// Visible rooms plus one for the dynamic-object pseudo-room.
    pub fn room_count(&self, view: ViewHandle) -> Option<u32> {
        Some(self.views.get(view.0)?.rooms.len() as u32 + 1)
    }

    /// Surface count of visible room `index`; the last index is the pseudo-room.
    pub fn room_surface_count(&self, view: ViewHandle, index: u32) -> Option<u32> {
        let visible = self.views.get(view.0)?;
        let index = index as usize;
        if index == visible.rooms.len() {
            return Some(self.object_cache.len() as u32);
        }
        let key = visible.rooms.get(index)?;
        Some(self.rooms.get(key.0)?.len() as u32)
    }

    pub fn room_surface(&self, view: ViewHandle, index: u32, surface_index: u32) -> Option<&Surface> {
        let visible = self.views.get(view.0)?;
        let index = index as usize;
        if index == visible.rooms.len() {
            let &(object, i) = self.object_cache.get(surface_index as usize)?;
            return self.objects.get(object.0)?.surfaces.get(i as usize);
        }
        let key = visible.rooms.get(index)?;
        self.rooms.get(key.0)?.surfaces.get(surface_index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{SurfaceRef, SurfaceSource, find_floor};

    fn floor(y: i32) -> Vec<RawSurface> {
        vec![
            RawSurface::new([[-500, y, -500], [-500, y, 500], [500, y, 500]]),
            RawSurface::new([[-500, y, -500], [500, y, 500], [500, y, -500]]),
        ]
    }

    fn world_with_rooms(count: u32) -> WorldModel {
        let mut world = WorldModel::new();
        assert!(world.init(count));
        for id in 0..count {
            assert!(world.load_room(id, &floor(id as i32 * 100), &[]));
        }
        world
    }

    #[test]
    fn load_rejects_reloads_and_out_of_range_ids() {
        let mut world = world_with_rooms(2);
        assert!(!world.load_room(0, &floor(0), &[]));
        assert!(!world.load_room(2, &floor(0), &[]));
        assert!(world.unload_room(0));
        assert!(!world.unload_room(0));
        assert!(world.load_room(0, &floor(0), &[]));
    }

    #[test]
    fn load_before_init_is_rejected() {
        let mut world = WorldModel::new();
        assert!(!world.load_room(0, &floor(0), &[]));
        assert!(world.init(1));
        assert!(!world.init(1));
    }

    #[test]
    fn swap_keeps_list_position_and_follows_content() {
        let mut world = world_with_rooms(3);
        let view = world.create_view(false);
        assert!(world.update_visible_rooms(view, &[2, 0], &[]));

        let room_a = world.room(0).map(Room::fingerprint);
        let room_b = world.room(1).map(Room::fingerprint);

        world.swap_rooms(&[(0, 1)]);

        let visible = world.visible(view).map(|v| v.rooms.clone()).unwrap_or_default();
        assert_eq!(visible.len(), 2);
        // Position 1 used to show room 0's content; it now shows room 1's.
        assert_eq!(world.room_by_key(visible[1]).map(Room::fingerprint), room_b);
        // The ids swapped in the table too.
        assert_eq!(world.room(1).map(Room::fingerprint), room_a);
        assert_eq!(world.room(0).map(Room::fingerprint), room_b);
    }

    #[test]
    fn swap_with_an_empty_slot_drops_the_visible_entry() {
        let mut world = world_with_rooms(1);
        world.room_table.push(None);
        let view = world.create_view(false);
        world.update_visible_rooms(view, &[0], &[]);

        world.swap_rooms(&[(0, 1)]);
        assert_eq!(world.visible(view).map(|v| v.rooms.len()), Some(0));
        assert!(world.room(0).is_none());
        assert!(world.room(1).is_some());
    }

    #[test]
    fn unloading_a_room_purges_it_from_views() {
        let mut world = world_with_rooms(2);
        let view = world.create_view(false);
        world.update_visible_rooms(view, &[0, 1], &[]);
        world.unload_room(0);
        assert_eq!(world.room_count(view), Some(2));
    }

    #[test]
    fn room_count_includes_the_dynamic_pseudo_room() {
        let mut world = world_with_rooms(2);
        let view = world.create_view(true);
        world.update_visible_rooms(view, &[0, 1], &[]);

        let platform = floor(500);
        let a = world.create_dynamic_object(&TransformInput::default(), &platform);
        let b = world.create_dynamic_object(&TransformInput::default(), &platform[..1]);

        assert_eq!(world.room_count(view), Some(3));
        assert_eq!(world.room_surface_count(view, 2), Some(3));
        assert_eq!(world.room_surface_count(view, 0), Some(2));
        assert!(world.room_surface(view, 2, 2).is_some());
        assert!(world.room_surface(view, 2, 3).is_none());

        world.delete_dynamic_object(a);
        assert_eq!(world.room_surface_count(view, 2), Some(1));
        // The freed slot is reused before the arena grows.
        let c = world.create_dynamic_object(&TransformInput::default(), &platform);
        assert_eq!(c.0.index, a.0.index);
        assert_ne!(c, a);
        assert!(world.object(b).is_some());
    }

    #[test]
    fn stale_object_refs_resolve_to_none() {
        let mut world = world_with_rooms(1);
        let view = world.create_view(false);
        world.update_visible_rooms(view, &[0], &[]);
        let object = world.create_dynamic_object(&TransformInput::default(), &floor(300));

        let pos = Vec3::new(0.0, 400.0, 0.0);
        let floor_ref = world
            .surface_view(view)
            .and_then(|v| find_floor(&v, pos).surface);
        assert_eq!(floor_ref.and_then(|r| r.object()), Some(object));

        world.delete_dynamic_object(object);
        let Some(view) = world.surface_view(view) else {
            panic!("view should exist");
        };
        assert!(floor_ref.and_then(|r| view.resolve(r)).is_none());
        // A fresh query falls through to the room floor underneath.
        let refound = find_floor(&view, pos);
        assert!(matches!(refound.surface, Some(SurfaceRef::Room { .. })));
        assert_eq!(refound.height, 0.0);
    }

    #[test]
    fn room_refs_resolve_only_while_the_room_is_visible() {
        let mut world = world_with_rooms(2);
        let view = world.create_view(false);
        world.update_visible_rooms(view, &[0, 1], &[]);

        let pos = Vec3::new(0.0, 150.0, 0.0);
        let hit = world.surface_view(view).and_then(|v| find_floor(&v, pos).surface);
        assert!(matches!(hit, Some(SurfaceRef::Room { .. })));

        world.update_visible_rooms(view, &[0], &[]);
        let Some(surfaces) = world.surface_view(view) else {
            panic!("view should exist");
        };
        assert!(hit.and_then(|r| surfaces.resolve(r)).is_none());
        assert_eq!(find_floor(&surfaces, pos).height, 0.0);
    }

    #[test]
    fn world_floor_catches_a_character_over_the_void() {
        let mut world = world_with_rooms(1);
        let view = world.create_view(true);
        world.recenter_world_floor(view, Vec3::new(5000.0, 0.0, 5000.0));

        let Some(surfaces) = world.surface_view(view) else {
            panic!("view should exist");
        };
        let hit = find_floor(&surfaces, Vec3::new(5000.0, 0.0, 5000.0));
        assert!(matches!(hit.surface, Some(SurfaceRef::WorldFloor { .. })));
        assert_eq!(hit.height, -100000.0);
    }

    #[test]
    fn clippers_block_walls_but_never_floors() {
        let mut world = world_with_rooms(1);
        let view = world.create_view(false);
        let clipper = RawSurface::new([[0, 0, -100], [0, 100, -100], [0, 100, 100]]);
        let flat = RawSurface::new([[-50, 10, -50], [-50, 10, 50], [50, 10, 50]]);
        world.update_visible_rooms(view, &[0], &[clipper, flat]);

        let Some(surfaces) = world.surface_view(view) else {
            panic!("view should exist");
        };
        let clippers = surfaces
            .wall_surfaces()
            .filter(|(r, _)| matches!(r, SurfaceRef::Clipper { .. }))
            .count();
        assert_eq!(clippers, 2);
        let hit = find_floor(&surfaces, Vec3::new(-10.0, 20.0, 20.0));
        assert!(matches!(hit.surface, Some(SurfaceRef::Room { .. })));
    }
}
