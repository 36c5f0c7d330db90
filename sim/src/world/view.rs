use super::{ObjectHandle, ObjectTransform, VisibleRoomSet, WorldModel};
use crate::collision::{Surface, SurfaceRef, SurfaceSource};

/// One instance's merged, read-only view of the world.
///
/// Search order: visible rooms (in list order), then dynamic-object surfaces
/// (in cache order), then the world floor. Wall searches see the clippers in
/// place of the world floor. Room references only resolve while their room
/// is in the visible list.
#[derive(Clone, Copy)]
pub struct SurfaceView<'a> {
    world: &'a WorldModel,
    visible: &'a VisibleRoomSet,
}

impl<'a> SurfaceView<'a> {
    pub(crate) fn new(world: &'a WorldModel, visible: &'a VisibleRoomSet) -> Self {
        Self { world, visible }
    }

    pub fn visible(&self) -> &'a VisibleRoomSet {
        self.visible
    }

    /// Current pose of a dynamic object, for carrying characters that stand on it.
    pub fn object_transform(&self, object: ObjectHandle) -> Option<&'a ObjectTransform> {
        self.world.object_transform(object)
    }

    fn room_surfaces(&self) -> impl Iterator<Item = (SurfaceRef, &Surface)> {
        let rooms = &self.world.rooms;
        self.visible.rooms.iter().flat_map(move |&key| {
            rooms
                .get(key.0)
                .into_iter()
                .flat_map(|room| room.surfaces.iter().enumerate())
                .map(move |(i, s)| {
                    (
                        SurfaceRef::Room {
                            room: key,
                            index: i as u32,
                        },
                        s,
                    )
                })
        })
    }

    fn object_surfaces(&self) -> impl Iterator<Item = (SurfaceRef, &Surface)> {
        let world = self.world;
        world.object_cache.iter().filter_map(move |&(object, index)| {
            let s = world.objects.get(object.0)?.surfaces.get(index as usize)?;
            Some((SurfaceRef::Object { object, index }, s))
        })
    }

    fn world_floor(&self) -> impl Iterator<Item = (SurfaceRef, &Surface)> {
        let enabled = self.visible.world_floor_enabled;
        self.visible
            .world_floor
            .iter()
            .enumerate()
            .filter(move |_| enabled)
            .map(|(i, s)| (SurfaceRef::WorldFloor { index: i as u32 }, s))
    }

    fn clippers(&self) -> impl Iterator<Item = (SurfaceRef, &Surface)> {
        self.visible
            .clippers
            .iter()
            .enumerate()
            .map(|(i, s)| (SurfaceRef::Clipper { index: i as u32 }, s))
    }
}

impl<'a> SurfaceSource for SurfaceView<'a> {
    fn surfaces(&self) -> impl Iterator<Item = (SurfaceRef, &Surface)> {
        self.room_surfaces()
            .chain(self.object_surfaces())
            .chain(self.world_floor())
    }

    fn wall_surfaces(&self) -> impl Iterator<Item = (SurfaceRef, &Surface)> {
        self.room_surfaces()
            .chain(self.object_surfaces())
            .chain(self.clippers())
    }

    fn resolve(&self, surface: SurfaceRef) -> Option<&Surface> {
        match surface {
            SurfaceRef::Room { room, index } => {
                if !self.visible.rooms.contains(&room) {
                    return None;
                }
                self.world.rooms.get(room.0)?.surfaces.get(index as usize)
            }
            SurfaceRef::Object { object, index } => {
                self.world.objects.get(object.0)?.surfaces.get(index as usize)
            }
            SurfaceRef::Clipper { index } => self.visible.clippers.get(index as usize),
            SurfaceRef::WorldFloor { index } => {
                if !self.visible.world_floor_enabled {
                    return None;
                }
                self.visible.world_floor.get(index as usize)
            }
        }
    }
}
