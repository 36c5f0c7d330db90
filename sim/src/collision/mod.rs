/*!
Collision root module.

Triangle-surface queries the action handlers run every tick. The code is split
for clarity:

- types:    surface data, references, search results and the `SurfaceSource` seam
- settings: query tolerances and capacities
- ground:   floor and ceiling searches
- wall:     wall and multi-wall searches, plus the climbable-wall test

Every query skips invalid (degenerate) surfaces, so a bad triangle never
reaches the caller.
*/

pub mod ground;
pub mod settings;
pub mod types;
pub mod wall;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types and functions.
pub use ground::{find_ceiling, find_floor, find_floor_height};
pub use types::{
    Mat3, PlaneHit, RawSurface, Surface, SurfaceClass, SurfaceOrigin, SurfaceRef, SurfaceSource,
    Vec3, Vec3i, WallCollisions, surface_has_force,
};
pub use wall::{ClimbFace, ClimbMask, find_wall, find_walls_multi, is_wall_climbable};
