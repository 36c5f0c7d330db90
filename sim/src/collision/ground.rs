use super::{
    settings::{CEIL_NONE_HEIGHT, CEIL_SNAP_TOLERANCE, FLOOR_LOWER_LIMIT, FLOOR_SNAP_TOLERANCE},
    types::{PlaneHit, SurfaceClass, SurfaceSource, Vec3},
};

/// Find the floor under `pos`.
///
/// - Only valid floor-class surfaces whose XZ projection contains `pos.xz` are considered.
/// - A plane up to `FLOOR_SNAP_TOLERANCE` above `pos.y` still counts as underneath.
/// - The highest qualifying plane wins; on equal heights the first one in search order wins.
/// - With no floor, returns `FLOOR_LOWER_LIMIT` and `surface: None`. That is a
///   normal outcome (the character is over a void), not an error.
pub fn find_floor<S: SurfaceSource + ?Sized>(source: &S, pos: Vec3) -> PlaneHit {
    let mut best = PlaneHit {
        height: FLOOR_LOWER_LIMIT,
        surface: None,
    };

    for (surface_ref, s) in source.surfaces() {
        if !s.is_valid || s.class() != SurfaceClass::Floor {
            continue;
        }
        if !s.contains_xz(pos.x, pos.z) {
            continue;
        }

        let height = s.height_at(pos.x, pos.z);
        if height > pos.y + FLOOR_SNAP_TOLERANCE {
            continue;
        }

        if best.surface.is_none() || height > best.height {
            best = PlaneHit {
                height,
                surface: Some(surface_ref),
            };
        }
    }

    best
}

/// Convenience: only the floor height.
#[inline]
pub fn find_floor_height<S: SurfaceSource + ?Sized>(source: &S, pos: Vec3) -> f32 {
    find_floor(source, pos).height
}

/// Find the ceiling above `pos`, searching from `pos.y + search_height`.
///
/// Mirrors [`find_floor`]: the lowest qualifying ceiling wins, and a plane up to
/// `CEIL_SNAP_TOLERANCE` below the query point still counts as overhead. With no
/// ceiling, returns `CEIL_NONE_HEIGHT`.
pub fn find_ceiling<S: SurfaceSource + ?Sized>(source: &S, pos: Vec3, search_height: f32) -> PlaneHit {
    let top_y = pos.y + search_height;
    let mut best = PlaneHit {
        height: CEIL_NONE_HEIGHT,
        surface: None,
    };

    for (surface_ref, s) in source.surfaces() {
        if !s.is_valid || s.class() != SurfaceClass::Ceiling {
            continue;
        }
        if !s.contains_xz(pos.x, pos.z) {
            continue;
        }

        let height = s.height_at(pos.x, pos.z);
        if height < top_y - CEIL_SNAP_TOLERANCE {
            continue;
        }

        if best.surface.is_none() || height < best.height {
            best = PlaneHit {
                height,
                surface: Some(surface_ref),
            };
        }
    }

    best
}
