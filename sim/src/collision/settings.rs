/*!
Surface query settings and tolerances.

These constants centralize the parameters used by surface derivation and the
floor, ceiling and wall searches. Keeping them together makes tuning easier and
keeps query behavior identical across instances.

Notes
- Distances are in world units.
- Tolerances are world-space values, not machine epsilon.
*/

/// Smallest cross-product magnitude for a triangle to get a normal.
/// Anything smaller is degenerate and the surface is marked invalid.
pub const NORMAL_EPS: f32 = 1.0e-4;

/// Padding added below the lowest and above the highest vertex.
pub const SURFACE_Y_PADDING: i32 = 5;

/// Normals with `|y|` at or below this are walls.
pub const WALL_NORMAL_Y_MAX: f32 = 0.01;

/// A floor up to this far above the query point still counts as "below".
pub const FLOOR_SNAP_TOLERANCE: f32 = 78.0;

/// A ceiling down to this far below the query point still counts as "above".
pub const CEIL_SNAP_TOLERANCE: f32 = 78.0;

/// Height reported when no floor is found.
pub const FLOOR_LOWER_LIMIT: f32 = -11000.0;

/// Height reported when no ceiling is found.
pub const CEIL_NONE_HEIGHT: f32 = 20000.0;

/// Walls whose `|normal.x|` exceeds this are projected onto the YZ plane for
/// the containment test; the rest onto the XY plane.
pub const WALL_PROJECT_X_MIN: f32 = 0.707;

/// Capacity of a multi-wall query result. Extra hits are dropped.
pub const MAX_REFERENCED_WALLS: usize = 4;

/// Capacity of the clipper list in one visible-room set.
pub const MAX_CLIPPER_SURFACES: usize = 64;

/// Angular window, in turn units, between facing and a wall's outward angle
/// for the wall to be climbable.
pub const CLIMB_FACING_WINDOW: i32 = 0x2800;
