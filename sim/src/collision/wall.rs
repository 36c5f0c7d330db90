use super::{
    settings::{CLIMB_FACING_WINDOW, MAX_REFERENCED_WALLS, WALL_PROJECT_X_MIN},
    types::{Surface, SurfaceClass, SurfaceRef, SurfaceSource, Vec3, WallCollisions},
};
use crate::{
    angle::angle_diff,
    bitmask_flags::BitmaskFlags,
    define_bitmask_flags,
};

define_bitmask_flags!(
    /// Which axis-aligned wall faces a character may climb.
    ///
    /// Named after the side of the wall the character grabs from: `NegX` is a
    /// wall whose normal points +X (the character stands on its +X side and
    /// faces -X).
    ClimbFace, u8, {
        NegX,
        PosX,
        NegZ,
        PosZ,
    }
);

pub type ClimbMask = BitmaskFlags<u8>;

/// A single wall contact before push-out is accumulated.
struct WallContact {
    surface: SurfaceRef,
    normal: Vec3,
    offset: f32,
}

/// Walk every wall touching a cylinder of `radius` at `pos.y + offset`.
///
/// Every hit is tested against the original position; push-outs accumulate.
fn collect_wall_contacts<S: SurfaceSource + ?Sized>(
    source: &S,
    pos: Vec3,
    offset: f32,
    radius: f32,
    mut visit: impl FnMut(WallContact),
) {
    let x = pos.x;
    let y = pos.y + offset;
    let z = pos.z;
    let point = Vec3::new(x, y, z);

    for (surface_ref, s) in source.wall_surfaces() {
        if !s.is_valid || s.class() != SurfaceClass::Wall {
            continue;
        }
        if y < s.lower_y as f32 || y > s.upper_y as f32 {
            continue;
        }

        let dist = s.plane_distance(&point);
        if dist < -radius || dist > radius {
            continue;
        }

        if !wall_projection_contains(s, x, y, z) {
            continue;
        }

        visit(WallContact {
            surface: surface_ref,
            normal: s.normal,
            offset: dist,
        });
    }
}

/// Containment test in the wall's dominant vertical projection plane.
fn wall_projection_contains(s: &Surface, x: f32, y: f32, z: f32) -> bool {
    let (y1, y2, y3) = (s.vertex1.y as f32, s.vertex2.y as f32, s.vertex3.y as f32);

    let (w1, w2, w3, pw, positive) = if s.normal.x.abs() > WALL_PROJECT_X_MIN {
        (
            -(s.vertex1.z as f32),
            -(s.vertex2.z as f32),
            -(s.vertex3.z as f32),
            -z,
            s.normal.x > 0.0,
        )
    } else {
        (
            s.vertex1.x as f32,
            s.vertex2.x as f32,
            s.vertex3.x as f32,
            x,
            s.normal.z > 0.0,
        )
    };

    let edges = [
        (y1 - y) * (w2 - w1) - (w1 - pw) * (y2 - y1),
        (y2 - y) * (w3 - w2) - (w2 - pw) * (y3 - y2),
        (y3 - y) * (w1 - w3) - (w3 - pw) * (y1 - y3),
    ];

    if positive {
        edges.iter().all(|&e| e <= 0.0)
    } else {
        edges.iter().all(|&e| e >= 0.0)
    }
}

/// Find every wall within `radius` of `pos` raised by `offset`, pushing the
/// position out of each one.
///
/// - Up to `MAX_REFERENCED_WALLS` walls are reported, in search order; further
///   hits still push the position but are not listed.
/// - With no hits, `walls` is empty and `resolved_pos == pos`.
pub fn find_walls_multi<S: SurfaceSource + ?Sized>(
    source: &S,
    pos: Vec3,
    offset: f32,
    radius: f32,
) -> WallCollisions {
    let mut out = WallCollisions {
        resolved_pos: pos,
        walls: Vec::with_capacity(MAX_REFERENCED_WALLS),
    };

    collect_wall_contacts(source, pos, offset, radius, |hit| {
        out.resolved_pos.x += hit.normal.x * (radius - hit.offset);
        out.resolved_pos.z += hit.normal.z * (radius - hit.offset);
        if out.walls.len() < MAX_REFERENCED_WALLS {
            out.walls.push(hit.surface);
        }
    });

    out
}

/// Find the single most blocking wall near `pos` raised by `offset`.
///
/// The wall the point sits deepest behind wins; on a tie the first one found wins.
pub fn find_wall<S: SurfaceSource + ?Sized>(
    source: &S,
    pos: Vec3,
    offset: f32,
    radius: f32,
) -> Option<SurfaceRef> {
    let mut best: Option<(SurfaceRef, f32)> = None;

    collect_wall_contacts(source, pos, offset, radius, |hit| {
        if best.as_ref().is_none_or(|&(_, d)| hit.offset < d) {
            best = Some((hit.surface, hit.offset));
        }
    });

    best.map(|(surface, _)| surface)
}

/// Whether `wall` can be climbed by a character facing `facing`.
///
/// Requires a perfectly vertical, axis-aligned wall whose face is enabled in
/// `climb`, and a facing within `CLIMB_FACING_WINDOW` of the wall's outward
/// angle plus a half turn.
pub fn is_wall_climbable(wall: &Surface, climb: ClimbMask, facing: i16) -> bool {
    if !wall.is_valid || wall.normal.y != 0.0 {
        return false;
    }

    let n = wall.normal;
    let face_enabled = (climb.has(ClimbFace::NegX) && n.x > 0.0 && n.z == 0.0)
        || (climb.has(ClimbFace::PosX) && n.x < 0.0 && n.z == 0.0)
        || (climb.has(ClimbFace::NegZ) && n.z > 0.0 && n.x == 0.0)
        || (climb.has(ClimbFace::PosZ) && n.z < 0.0 && n.x == 0.0);
    if !face_enabled {
        return false;
    }

    let diff = angle_diff(facing, wall.outward_angle()) as i32;
    diff.abs() <= CLIMB_FACING_WINDOW
}
