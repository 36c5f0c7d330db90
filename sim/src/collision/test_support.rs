//! Loose surface lists for query tests.

use super::types::{RawSurface, Surface, SurfaceOrigin, SurfaceRef, SurfaceSource};

/// Loose triangles, addressed as clipper slots by index.
pub struct Soup {
    pub surfaces: Vec<Surface>,
}

impl Soup {
    pub fn new(surfaces: Vec<Surface>) -> Self {
        Self { surfaces }
    }

    pub fn from_quads(quads: &[[Surface; 2]]) -> Self {
        Self::new(quads.iter().flatten().copied().collect())
    }
}

impl SurfaceSource for Soup {
    fn surfaces(&self) -> impl Iterator<Item = (SurfaceRef, &Surface)> {
        self.surfaces
            .iter()
            .enumerate()
            .map(|(i, s)| (SurfaceRef::Clipper { index: i as u32 }, s))
    }

    fn resolve(&self, surface: SurfaceRef) -> Option<&Surface> {
        match surface {
            SurfaceRef::Clipper { index } => self.surfaces.get(index as usize),
            _ => None,
        }
    }
}

fn tri(v: [[i32; 3]; 3]) -> Surface {
    Surface::from_raw(&RawSurface::new(v), SurfaceOrigin::Static)
}

/// Upward-facing square at height `y` spanning `[min, max]` on X and Z.
pub fn floor_quad(y: i32, min: i32, max: i32) -> [Surface; 2] {
    [
        tri([[min, y, min], [min, y, max], [max, y, max]]),
        tri([[min, y, min], [max, y, max], [max, y, min]]),
    ]
}

/// Downward-facing square at height `y` spanning `[min, max]` on X and Z.
pub fn ceiling_quad(y: i32, min: i32, max: i32) -> [Surface; 2] {
    [
        tri([[min, y, min], [max, y, max], [min, y, max]]),
        tri([[min, y, min], [max, y, min], [max, y, max]]),
    ]
}

/// Vertical square in the plane `x = x`, facing +X when `facing_pos` is set.
/// Spans `[y0, y1]` vertically and `[z0, z1]` along Z.
pub fn wall_x(x: i32, y0: i32, y1: i32, z0: i32, z1: i32, facing_pos: bool) -> [Surface; 2] {
    if facing_pos {
        [
            tri([[x, y0, z0], [x, y1, z0], [x, y1, z1]]),
            tri([[x, y0, z0], [x, y1, z1], [x, y0, z1]]),
        ]
    } else {
        [
            tri([[x, y0, z0], [x, y1, z1], [x, y1, z0]]),
            tri([[x, y0, z0], [x, y0, z1], [x, y1, z1]]),
        ]
    }
}

/// Vertical square in the plane `z = z`, facing +Z when `facing_pos` is set.
pub fn wall_z(z: i32, y0: i32, y1: i32, x0: i32, x1: i32, facing_pos: bool) -> [Surface; 2] {
    if facing_pos {
        [
            tri([[x0, y0, z], [x1, y1, z], [x0, y1, z]]),
            tri([[x0, y0, z], [x1, y0, z], [x1, y1, z]]),
        ]
    } else {
        [
            tri([[x0, y0, z], [x0, y1, z], [x1, y1, z]]),
            tri([[x0, y0, z], [x1, y1, z], [x1, y0, z]]),
        ]
    }
}
