/*!
Core collision types and math aliases shared by the collision submodules.

This module contains no search algorithms. It defines the data exchanged between:
- the world model (rooms, dynamic objects, per-instance visible sets)
- the floor/ceiling and wall queries
- the action handlers, which keep [`SurfaceRef`]s to the surfaces they touch

Surfaces are never referenced by pointer. A [`SurfaceRef`] names the owner
(room key, object handle, clipper slot, world-floor slot) plus an index; it is
resolved through a [`SurfaceSource`] every time it is used, so a reference to
unloaded geometry resolves to `None` instead of dangling.
*/

use nalgebra as na;

use super::settings::{NORMAL_EPS, SURFACE_Y_PADDING, WALL_NORMAL_Y_MAX};
use crate::world::{ObjectHandle, RoomKey};

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Vec3i = na::Vector3<i32>;
pub type Mat3 = na::Matrix3<f32>;

/// Terrain types whose `force` value is meaningful.
pub mod surface_type {
    pub const DEFAULT: i16 = 0x0000;
    pub const UNUSED_0004: i16 = 0x0004;
    pub const FLOWING_WATER: i16 = 0x000E;
    pub const DEEP_MOVING_QUICKSAND: i16 = 0x0024;
    pub const SHALLOW_MOVING_QUICKSAND: i16 = 0x0025;
    pub const MOVING_QUICKSAND: i16 = 0x0027;
    pub const HORIZONTAL_WIND: i16 = 0x002C;
    pub const INSTANT_MOVING_QUICKSAND: i16 = 0x002D;

    /// Terrain class for the synthetic world floor.
    pub const TERRAIN_STONE: u16 = 0x0002;
}

/// Whether a surface of this type exerts a force (flowing water, moving sand, wind).
pub fn surface_has_force(surface_type: i16) -> bool {
    matches!(
        surface_type,
        surface_type::UNUSED_0004
            | surface_type::FLOWING_WATER
            | surface_type::DEEP_MOVING_QUICKSAND
            | surface_type::SHALLOW_MOVING_QUICKSAND
            | surface_type::MOVING_QUICKSAND
            | surface_type::HORIZONTAL_WIND
            | surface_type::INSTANT_MOVING_QUICKSAND
    )
}

/// A triangle as registered by the host: integer vertices plus classification
/// and the ids needed to map it back to the host's own mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawSurface {
    pub vertices: [[i32; 3]; 3],
    pub surface_type: i16,
    pub force: i16,
    pub terrain: u16,
    pub room_id: i32,
    pub face_id: i32,
}

impl RawSurface {
    pub fn new(vertices: [[i32; 3]; 3]) -> Self {
        Self {
            vertices,
            ..Default::default()
        }
    }
}

/// Where a surface came from. Reported back to the host for introspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceOrigin {
    /// Plain room geometry.
    Static,
    /// Room geometry placed by a sub-mesh transform (index into the room's transforms).
    StaticMesh { mesh: u32 },
    /// Geometry owned by a movable object.
    DynamicObject,
    /// Seam-patching wall from a visible-room set.
    Clipper,
    /// The synthetic floor far below the character.
    WorldFloor,
}

/// Floor, wall or ceiling, decided by the normal's Y component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceClass {
    Floor,
    Wall,
    Ceiling,
}

/// A classified, plane-derived collision triangle.
///
/// Invariants for a valid surface:
/// - `normal` has unit length.
/// - every vertex satisfies `normal · v + origin_offset ≈ 0`.
/// - `lower_y`/`upper_y` pad the vertex Y range by 5 units each way.
///
/// A degenerate triangle keeps `is_valid == false` and is skipped by every query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub vertex1: Vec3i,
    pub vertex2: Vec3i,
    pub vertex3: Vec3i,
    pub normal: Vec3,
    pub origin_offset: f32,
    pub lower_y: i32,
    pub upper_y: i32,
    pub surface_type: i16,
    pub force: i16,
    pub terrain: u16,
    pub room_id: i32,
    pub face_id: i32,
    pub origin: SurfaceOrigin,
    pub is_valid: bool,
}

impl Surface {
    /// Derive a surface from host triangle data in world space.
    pub fn from_raw(raw: &RawSurface, origin: SurfaceOrigin) -> Self {
        let [a, b, c] = raw.vertices;
        Self::from_vertices(
            raw,
            Vec3i::new(a[0], a[1], a[2]),
            Vec3i::new(b[0], b[1], b[2]),
            Vec3i::new(c[0], c[1], c[2]),
            origin,
        )
    }

    /// Derive a surface after placing the raw vertices with `rotation` then `translation`.
    /// Placed coordinates truncate toward zero.
    pub fn from_raw_transformed(
        raw: &RawSurface,
        rotation: &Mat3,
        translation: &Vec3,
        origin: SurfaceOrigin,
    ) -> Self {
        let place = |v: [i32; 3]| -> Vec3i {
            let local = Vec3::new(v[0] as f32, v[1] as f32, v[2] as f32);
            let world = rotation * local + translation;
            Vec3i::new(world.x as i32, world.y as i32, world.z as i32)
        };
        let [a, b, c] = raw.vertices;
        Self::from_vertices(raw, place(a), place(b), place(c), origin)
    }

    fn from_vertices(
        raw: &RawSurface,
        v1: Vec3i,
        v2: Vec3i,
        v3: Vec3i,
        origin: SurfaceOrigin,
    ) -> Self {
        let f1: Vec3 = v1.cast();
        let f2: Vec3 = v2.cast();
        let f3: Vec3 = v3.cast();

        // (v2 - v1) x (v3 - v2)
        let n = (f2 - f1).cross(&(f3 - f2));
        let mag = n.norm();

        let min_y = v1.y.min(v2.y).min(v3.y);
        let max_y = v1.y.max(v2.y).max(v3.y);

        let mut surface = Self {
            vertex1: v1,
            vertex2: v2,
            vertex3: v3,
            normal: Vec3::zeros(),
            origin_offset: 0.0,
            lower_y: min_y.saturating_sub(SURFACE_Y_PADDING),
            upper_y: max_y.saturating_add(SURFACE_Y_PADDING),
            surface_type: raw.surface_type,
            force: if surface_has_force(raw.surface_type) {
                raw.force
            } else {
                0
            },
            terrain: raw.terrain,
            room_id: raw.room_id,
            face_id: raw.face_id,
            origin,
            is_valid: false,
        };

        if mag < NORMAL_EPS {
            return surface;
        }

        surface.normal = n / mag;
        surface.origin_offset = -surface.normal.dot(&f1);
        surface.is_valid = true;
        surface
    }

    /// A flat upward-facing square half, used for the world-floor fallback.
    pub fn flat_floor(v1: Vec3i, v2: Vec3i, v3: Vec3i) -> Self {
        let raw = RawSurface {
            terrain: surface_type::TERRAIN_STONE,
            room_id: -1,
            face_id: -1,
            ..Default::default()
        };
        Self::from_vertices(&raw, v1, v2, v3, SurfaceOrigin::WorldFloor)
    }

    #[inline]
    pub fn class(&self) -> SurfaceClass {
        if self.normal.y > WALL_NORMAL_Y_MAX {
            SurfaceClass::Floor
        } else if self.normal.y < -WALL_NORMAL_Y_MAX {
            SurfaceClass::Ceiling
        } else {
            SurfaceClass::Wall
        }
    }

    /// Signed distance from the surface plane.
    #[inline]
    pub fn plane_distance(&self, pos: &Vec3) -> f32 {
        self.normal.dot(pos) + self.origin_offset
    }

    /// Height of the plane at (`x`, `z`). Only meaningful for floors and ceilings.
    #[inline]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        -(x * self.normal.x + z * self.normal.z + self.origin_offset) / self.normal.y
    }

    /// Whether (`x`, `z`) lies inside the triangle's horizontal projection.
    /// Works for either winding.
    pub fn contains_xz(&self, x: f32, z: f32) -> bool {
        let (x1, z1) = (self.vertex1.x as f32, self.vertex1.z as f32);
        let (x2, z2) = (self.vertex2.x as f32, self.vertex2.z as f32);
        let (x3, z3) = (self.vertex3.x as f32, self.vertex3.z as f32);

        let e1 = (z1 - z) * (x2 - x1) - (x1 - x) * (z2 - z1);
        let e2 = (z2 - z) * (x3 - x2) - (x2 - x) * (z3 - z2);
        let e3 = (z3 - z) * (x1 - x3) - (x3 - x) * (z1 - z3);

        (e1 >= 0.0 && e2 >= 0.0 && e3 >= 0.0) || (e1 <= 0.0 && e2 <= 0.0 && e3 <= 0.0)
    }

    /// Outward angle of a wall in turn units.
    #[inline]
    pub fn outward_angle(&self) -> i16 {
        crate::angle::atan2s(self.normal.z, self.normal.x).wrapping_add(i16::MIN)
    }
}

/// Non-owning reference to a surface in the world model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceRef {
    Room { room: RoomKey, index: u32 },
    Object { object: ObjectHandle, index: u32 },
    Clipper { index: u32 },
    WorldFloor { index: u32 },
}

impl SurfaceRef {
    /// The dynamic object owning this surface, if any.
    #[inline]
    pub fn object(&self) -> Option<ObjectHandle> {
        match *self {
            SurfaceRef::Object { object, .. } => Some(object),
            _ => None,
        }
    }
}

/// Anything the queries can search: a per-instance merged view in the world
/// model, or a loose list in tests.
pub trait SurfaceSource {
    /// Surfaces that can be floors or ceilings, in search order.
    fn surfaces(&self) -> impl Iterator<Item = (SurfaceRef, &Surface)>;

    /// Surfaces that can be walls, in search order. Defaults to [`Self::surfaces`].
    fn wall_surfaces(&self) -> impl Iterator<Item = (SurfaceRef, &Surface)> {
        self.surfaces()
    }

    /// Resolve a reference. `None` when the owner is gone or the slot is empty.
    fn resolve(&self, surface: SurfaceRef) -> Option<&Surface>;
}

/// Result of a floor or ceiling search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneHit {
    pub height: f32,
    pub surface: Option<SurfaceRef>,
}

/// Result of a multi-wall search: the pushed-out position plus every wall hit.
#[derive(Clone, Debug, PartialEq)]
pub struct WallCollisions {
    pub resolved_pos: Vec3,
    pub walls: Vec<SurfaceRef>,
}

impl WallCollisions {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Last wall found, which is the one movement code treats as "the" wall.
    #[inline]
    pub fn last(&self) -> Option<SurfaceRef> {
        self.walls.last().copied()
    }
}
