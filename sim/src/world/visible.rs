use super::RoomKey;
use crate::{
    collision::{RawSurface, Surface, SurfaceOrigin, Vec3, Vec3i, settings::MAX_CLIPPER_SURFACES},
    constants::{WORLD_FLOOR_DEPTH, WORLD_FLOOR_HALF_WIDTH},
};

/// The rooms, clippers and fallback floor one character instance collides with.
#[derive(Clone, Debug)]
pub struct VisibleRoomSet {
    /// Visible rooms in host order. Position in this list is stable across room swaps.
    pub rooms: Vec<RoomKey>,
    /// Seam-patching walls, in world space. Take part in wall queries only.
    pub clippers: Vec<Surface>,
    pub world_floor: [Surface; 2],
    pub world_floor_enabled: bool,
}

impl Default for VisibleRoomSet {
    fn default() -> Self {
        let mut set = Self {
            rooms: Vec::new(),
            clippers: Vec::new(),
            world_floor: [
                Surface::flat_floor(Vec3i::zeros(), Vec3i::zeros(), Vec3i::zeros()),
                Surface::flat_floor(Vec3i::zeros(), Vec3i::zeros(), Vec3i::zeros()),
            ],
            world_floor_enabled: true,
        };
        set.recenter_world_floor(Vec3::zeros());
        set
    }
}

impl VisibleRoomSet {
    /// Replace the clipper list. Anything past `MAX_CLIPPER_SURFACES` is dropped.
    pub fn set_clippers(&mut self, clippers: &[RawSurface]) {
        if clippers.len() > MAX_CLIPPER_SURFACES {
            log::warn!(
                "Dropping {} clipper surfaces past the limit of {}",
                clippers.len() - MAX_CLIPPER_SURFACES,
                MAX_CLIPPER_SURFACES
            );
        }
        self.clippers.clear();
        self.clippers.extend(
            clippers
                .iter()
                .take(MAX_CLIPPER_SURFACES)
                .map(|raw| Surface::from_raw(raw, SurfaceOrigin::Clipper)),
        );
    }

    /// Move the two fallback floor triangles under `pos`.
    pub fn recenter_world_floor(&mut self, pos: Vec3) {
        let height = (pos.y - WORLD_FLOOR_DEPTH) as i32;
        let x = pos.x as i32;
        let z = pos.z as i32;
        let d = WORLD_FLOOR_HALF_WIDTH as i32;
        let (x0, x1) = (x.saturating_sub(d), x.saturating_add(d));
        let (z0, z1) = (z.saturating_sub(d), z.saturating_add(d));

        self.world_floor = [
            Surface::flat_floor(
                Vec3i::new(x0, height, z0),
                Vec3i::new(x0, height, z1),
                Vec3i::new(x1, height, z1),
            ),
            Surface::flat_floor(
                Vec3i::new(x0, height, z0),
                Vec3i::new(x1, height, z1),
                Vec3i::new(x1, height, z0),
            ),
        ];
    }

    /// Drop every reference to `key`.
    pub fn purge(&mut self, key: RoomKey) -> bool {
        let before = self.rooms.len();
        self.rooms.retain(|&k| k != key);
        before != self.rooms.len()
    }
}
