use crate::{
    angle::{angle_diff, coss, sins},
    collision::{SurfaceSource, Vec3, find_ceiling, find_floor, find_walls_multi},
    constants::{CHARACTER_HEIGHT, GRAVITY, TERMINAL_VELOCITY, WATER_SURFACE_DEPTH},
    state::CharacterState,
};

/// Walls closer than this to the facing direction stop an airborne character.
const AIR_WALL_FACING_WINDOW: i32 = 0x2000;

/// Outcome of a ground step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundStep {
    None,
    LeftGround,
    /// A wall touched the upper body; movement continued along it.
    HitWall,
    /// Movement stopped short: a void, a ceiling too low, or nothing under the next position.
    Blocked,
}

/// Outcome of an air step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AirStep {
    None,
    Landed,
    /// Ran into a wall while facing it, or stopped against a low ceiling.
    HitWall,
}

/// Outcome of a water step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaterStep {
    None,
    HitFloor,
    HitCeiling,
    HitWall,
}

/// Re-query the floor and ceiling at the current position.
///
/// Runs once per tick before input processing so `OffFloor` and every handler
/// see fresh references. Walls are left to the steps that move the character.
pub fn refresh_floor_and_ceiling<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) {
    let floor = find_floor(surfaces, m.pos);
    m.floor = floor.surface;
    m.floor_height = floor.height;

    let ceil = find_ceiling(surfaces, Vec3::new(m.pos.x, m.floor_height.max(m.pos.y), m.pos.z), 0.0);
    m.ceil = ceil.surface;
    m.ceil_height = ceil.height;
}

/// Set the horizontal velocity from `forward_vel` along the facing yaw.
#[inline]
pub fn apply_forward_velocity(m: &mut CharacterState) {
    m.vel.x = m.forward_vel * sins(m.yaw());
    m.vel.z = m.forward_vel * coss(m.yaw());
}

#[inline]
pub fn apply_gravity(m: &mut CharacterState) {
    m.vel.y = (m.vel.y - GRAVITY).max(TERMINAL_VELOCITY);
}

/// Move along the ground by `vel.xz` in four quarter steps.
///
/// Behavior
/// - Each quarter step is pushed out of walls at knee and chest height.
/// - The character snaps to the floor under the new position.
/// - A drop of more than 100 units leaves the ground; the rest of the step is skipped.
/// - No floor, or a ceiling lower than the character, blocks the step in place.
pub fn perform_ground_step<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> GroundStep {
    let mut result = GroundStep::None;

    for _ in 0..4 {
        let next = Vec3::new(m.pos.x + m.vel.x / 4.0, m.pos.y, m.pos.z + m.vel.z / 4.0);
        result = ground_quarter_step(m, surfaces, next);
        if matches!(result, GroundStep::LeftGround | GroundStep::Blocked) {
            break;
        }
    }

    result
}

fn ground_quarter_step<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S, next: Vec3) -> GroundStep {
    let lower = find_walls_multi(surfaces, next, 30.0, 24.0);
    let upper = find_walls_multi(surfaces, lower.resolved_pos, 60.0, 50.0);
    let next = upper.resolved_pos;

    let floor = find_floor(surfaces, next);
    let Some(floor_ref) = floor.surface else {
        return GroundStep::Blocked;
    };
    let ceil = find_ceiling(surfaces, Vec3::new(next.x, floor.height, next.z), 0.0);

    m.wall = upper.last();

    if next.y > floor.height + 100.0 {
        if next.y + CHARACTER_HEIGHT >= ceil.height {
            return GroundStep::Blocked;
        }
        m.pos = next;
        m.floor = Some(floor_ref);
        m.floor_height = floor.height;
        return GroundStep::LeftGround;
    }

    if floor.height + CHARACTER_HEIGHT >= ceil.height {
        return GroundStep::Blocked;
    }

    m.pos = Vec3::new(next.x, floor.height, next.z);
    m.floor = Some(floor_ref);
    m.floor_height = floor.height;
    m.ceil = ceil.surface;
    m.ceil_height = ceil.height;

    if m.wall.is_some() {
        GroundStep::HitWall
    } else {
        GroundStep::None
    }
}

/// Move through the air by `vel` in four quarter steps.
///
/// Behavior
/// - Walls are resolved at head and knee height before the floor is checked.
/// - Reaching the floor lands and ends the step.
/// - A ceiling stops upward motion; the character keeps its horizontal speed.
/// - `peak_height` follows the character while it is still rising.
pub fn perform_air_step<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> AirStep {
    let mut result = AirStep::None;
    m.wall = None;

    for _ in 0..4 {
        let next = m.pos + m.vel / 4.0;
        let quarter = air_quarter_step(m, surfaces, next);
        if quarter != AirStep::None {
            result = quarter;
        }
        if quarter == AirStep::Landed {
            break;
        }
    }

    if m.vel.y >= 0.0 {
        m.peak_height = m.pos.y;
    }

    result
}

fn air_quarter_step<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S, next: Vec3) -> AirStep {
    let upper = find_walls_multi(surfaces, next, 150.0, 50.0);
    let lower = find_walls_multi(surfaces, upper.resolved_pos, 30.0, 50.0);
    let next = lower.resolved_pos;

    let floor = find_floor(surfaces, next);
    let ceil = find_ceiling(surfaces, next, 0.0);

    let Some(floor_ref) = floor.surface else {
        if next.y <= m.floor_height {
            m.pos.y = m.floor_height;
            return AirStep::Landed;
        }
        m.pos.y = next.y;
        return AirStep::HitWall;
    };

    if next.y <= floor.height {
        if ceil.height - floor.height > CHARACTER_HEIGHT {
            m.pos.x = next.x;
            m.pos.z = next.z;
            m.floor = Some(floor_ref);
            m.floor_height = floor.height;
        }
        m.pos.y = m.floor_height;
        return AirStep::Landed;
    }

    if next.y + CHARACTER_HEIGHT > ceil.height {
        if m.vel.y >= 0.0 {
            m.vel.y = 0.0;
            return AirStep::None;
        }
        if next.y <= m.floor_height {
            m.pos.y = m.floor_height;
            return AirStep::Landed;
        }
        m.pos.y = next.y;
        return AirStep::HitWall;
    }

    m.pos = next;
    m.floor = Some(floor_ref);
    m.floor_height = floor.height;
    m.ceil = ceil.surface;
    m.ceil_height = ceil.height;

    let Some(wall_ref) = upper.last().or(lower.last()) else {
        return AirStep::None;
    };
    m.wall = Some(wall_ref);

    let Some(wall) = surfaces.resolve(wall_ref) else {
        return AirStep::None;
    };
    let into_wall = angle_diff(m.yaw(), wall.outward_angle()) as i32;
    if into_wall.abs() < AIR_WALL_FACING_WINDOW {
        AirStep::HitWall
    } else {
        AirStep::None
    }
}

/// Move through water by `vel` in one step, holding the character below the surface.
pub fn perform_water_step<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> WaterStep {
    let mut next = m.pos + m.vel;
    let surface_limit = m.water_level - WATER_SURFACE_DEPTH;
    if next.y > surface_limit {
        next.y = surface_limit;
        m.vel.y = 0.0;
    }

    let walls = find_walls_multi(surfaces, next, 10.0, 110.0);
    let next = walls.resolved_pos;
    m.wall = walls.last();

    let floor = find_floor(surfaces, next);
    let Some(floor_ref) = floor.surface else {
        return WaterStep::HitWall;
    };
    let ceil = find_ceiling(surfaces, next, 0.0);

    if ceil.height - floor.height < CHARACTER_HEIGHT {
        return WaterStep::HitWall;
    }

    m.floor = Some(floor_ref);
    m.floor_height = floor.height;
    m.ceil = ceil.surface;
    m.ceil_height = ceil.height;

    if next.y < floor.height {
        m.pos = Vec3::new(next.x, floor.height, next.z);
        return WaterStep::HitFloor;
    }
    if ceil.height - next.y < CHARACTER_HEIGHT {
        m.pos = Vec3::new(next.x, ceil.height - CHARACTER_HEIGHT, next.z);
        return WaterStep::HitCeiling;
    }

    m.pos = next;
    if m.wall.is_some() {
        WaterStep::HitWall
    } else {
        WaterStep::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{
        Surface,
        test_support::{Soup, ceiling_quad, floor_quad, wall_x},
    };

    fn soup(quads: &[[Surface; 2]]) -> Soup {
        Soup::from_quads(quads)
    }

    #[test]
    fn ground_step_walks_and_snaps_to_floor() {
        let s = soup(&[floor_quad(0, -1000, 1000)]);
        let mut m = CharacterState::new(Vec3::new(0.0, 0.0, 0.0));
        m.forward_vel = 20.0;
        apply_forward_velocity(&mut m);

        assert_eq!(perform_ground_step(&mut m, &s), GroundStep::None);
        assert!((m.pos.z - 20.0).abs() < 1e-3);
        assert_eq!(m.pos.y, 0.0);
        assert!(m.floor.is_some());
    }

    #[test]
    fn ground_step_leaves_ground_at_a_ledge() {
        // High floor for z < 10, low floor beyond.
        let s = Soup::new(
            floor_quad(0, -1000, 1000)
                .into_iter()
                .chain(floor_quad(500, -1000, 10))
                .collect(),
        );
        let mut m = CharacterState::new(Vec3::new(0.0, 500.0, 0.0));
        m.forward_vel = 32.0;
        apply_forward_velocity(&mut m);

        assert_eq!(perform_ground_step(&mut m, &s), GroundStep::LeftGround);
        assert_eq!(m.pos.y, 500.0);
        assert_eq!(m.floor_height, 0.0);
    }

    #[test]
    fn ground_step_refuses_to_walk_into_a_void() {
        let s = soup(&[floor_quad(0, -100, 100)]);
        let mut m = CharacterState::new(Vec3::new(0.0, 0.0, 90.0));
        m.forward_vel = 40.0;
        apply_forward_velocity(&mut m);

        assert_eq!(perform_ground_step(&mut m, &s), GroundStep::Blocked);
        assert!(m.pos.z <= 100.0);
    }

    #[test]
    fn ground_step_is_pushed_out_of_walls() {
        // Wall at x = 100 facing -X.
        let s = soup(&[floor_quad(0, -1000, 1000), wall_x(100, 0, 500, -1000, 1000, false)]);
        let mut m = CharacterState::new(Vec3::new(40.0, 0.0, 0.0));
        m.face_angle[1] = 0x4000;
        m.forward_vel = 32.0;
        apply_forward_velocity(&mut m);

        assert_eq!(perform_ground_step(&mut m, &s), GroundStep::HitWall);
        assert!(m.pos.x <= 50.0 + 1e-3);
        assert!(m.wall.is_some());
    }

    #[test]
    fn air_step_lands_on_the_floor() {
        let s = soup(&[floor_quad(0, -1000, 1000)]);
        let mut m = CharacterState::new(Vec3::new(0.0, 10.0, 0.0));
        m.vel.y = -40.0;

        assert_eq!(perform_air_step(&mut m, &s), AirStep::Landed);
        assert_eq!(m.pos.y, 0.0);
    }

    #[test]
    fn air_step_bumps_into_a_ceiling() {
        let s = soup(&[floor_quad(0, -1000, 1000), ceiling_quad(300, -1000, 1000)]);
        let mut m = CharacterState::new(Vec3::new(0.0, 100.0, 0.0));
        m.vel.y = 60.0;

        assert_eq!(perform_air_step(&mut m, &s), AirStep::None);
        assert_eq!(m.vel.y, 0.0);
        assert!(m.pos.y + CHARACTER_HEIGHT <= 300.0);
    }

    #[test]
    fn air_step_reports_a_wall_the_character_faces() {
        let s = soup(&[floor_quad(0, -1000, 1000), wall_x(100, 0, 1000, -1000, 1000, false)]);
        let mut m = CharacterState::new(Vec3::new(60.0, 200.0, 0.0));
        m.face_angle[1] = 0x4000;
        m.forward_vel = 30.0;
        apply_forward_velocity(&mut m);

        assert_eq!(perform_air_step(&mut m, &s), AirStep::HitWall);
        assert!(m.pos.x <= 50.0 + 1e-3);
    }

    #[test]
    fn water_step_holds_below_the_surface() {
        let s = soup(&[floor_quad(-2000, -1000, 1000)]);
        let mut m = CharacterState::new(Vec3::new(0.0, -100.0, 0.0));
        m.water_level = 0.0;
        m.vel.y = 50.0;

        assert_eq!(perform_water_step(&mut m, &s), WaterStep::None);
        assert_eq!(m.pos.y, -WATER_SURFACE_DEPTH);
        assert_eq!(m.vel.y, 0.0);
    }

    #[test]
    fn water_step_rests_on_the_floor() {
        let s = soup(&[floor_quad(-200, -1000, 1000)]);
        let mut m = CharacterState::new(Vec3::new(0.0, -190.0, 0.0));
        m.water_level = 0.0;
        m.vel.y = -20.0;

        assert_eq!(perform_water_step(&mut m, &s), WaterStep::HitFloor);
        assert_eq!(m.pos.y, -200.0);
    }
}
