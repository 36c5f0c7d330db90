//! Climbing sub-machine: grab, idle, and moving along axis-aligned walls.
//!
//! Every state re-checks the held wall first; losing it, or pressing B,
//! releases the character into a soft bonk.

use super::{Action, check_water_plunge, reset_unmapped};
use crate::{
    angle::{coss, sins},
    collision::{SurfaceRef, SurfaceSource, Vec3, find_floor, find_floor_height, find_wall, find_walls_multi, is_wall_climbable},
    constants::{
        LADDER_CEILING_MARGIN, LADDER_CLIMB_SPEED, LADDER_FLOOR_MARGIN, LADDER_GRAB_LIFT, LADDER_GRAB_REACH,
        LADDER_GRAB_WALL_OFFSET, LADDER_GRAB_WALL_RADIUS, LADDER_IDLE_ANIM_ACCEL, LADDER_MOVE_ANIM_ACCEL,
        LADDER_RELEASE_DROP, LADDER_RELEASE_FORWARD_VELOCITY, LADDER_RELEASE_PUSHBACK, LADDER_SIDE_LIMIT,
        LADDER_SIDE_SPEED, LADDER_STEP_WALL_OFFSET, LADDER_STEP_WALL_RADIUS,
    },
    state::{Animation, CharacterState, InputFlag},
};

/// Raw stick yaw window, either side, that counts as a sideways push.
const SIDE_YAW_MIN: i16 = 0x3000;
const SIDE_YAW_MAX: i16 = 0x5000;

/// Sideways direction along the wall, named as seen from the wall's face:
/// pushing the stick right moves the climber toward the wall's left edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn stick_side(raw_yaw: i16) -> Option<Side> {
    if (-SIDE_YAW_MAX..=-SIDE_YAW_MIN).contains(&raw_yaw) {
        Some(Side::Left)
    } else if (SIDE_YAW_MIN..=SIDE_YAW_MAX).contains(&raw_yaw) {
        Some(Side::Right)
    } else {
        None
    }
}

/// Try to grab a climbable wall in front of the character.
///
/// Looks `LADDER_GRAB_REACH` ahead along the facing direction. On success the
/// wall is stored and the action switches to `LadderStartGrab`.
pub fn request_ladder_grab<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    let yaw = m.yaw();
    let reach = m.pos + Vec3::new(sins(yaw), 0.0, coss(yaw)) * LADDER_GRAB_REACH;

    let Some(found) = find_wall(surfaces, reach, LADDER_GRAB_WALL_OFFSET, LADDER_GRAB_WALL_RADIUS) else {
        return false;
    };
    let climbable = surfaces
        .resolve(found)
        .is_some_and(|wall| is_wall_climbable(wall, m.climb_mask, yaw));
    if !climbable {
        return false;
    }

    m.wall = Some(found);
    m.set_action(Action::LadderStartGrab, 0)
}

/// First climbable wall touching `pos`, if any.
fn viable_wall<S: SurfaceSource + ?Sized>(m: &CharacterState, surfaces: &S, pos: Vec3) -> Option<SurfaceRef> {
    let hits = find_walls_multi(surfaces, pos, LADDER_STEP_WALL_OFFSET, LADDER_STEP_WALL_RADIUS);
    hits.walls.into_iter().find(|&wall| {
        surfaces
            .resolve(wall)
            .is_some_and(|s| is_wall_climbable(s, m.climb_mask, m.yaw()))
    })
}

fn holds_wall<S: SurfaceSource + ?Sized>(m: &CharacterState, surfaces: &S) -> bool {
    m.wall.and_then(|wall| surfaces.resolve(wall)).is_some()
}

/// Step back off the wall and drop into a soft bonk.
fn let_go<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) {
    m.vel.y = 0.0;
    m.forward_vel = LADDER_RELEASE_FORWARD_VELOCITY;
    m.pos.x -= LADDER_RELEASE_PUSHBACK * sins(m.yaw());
    m.pos.z -= LADDER_RELEASE_PUSHBACK * coss(m.yaw());

    let floor = find_floor(surfaces, m.pos);
    if floor.surface.is_none() || floor.height < m.pos.y - LADDER_RELEASE_DROP {
        m.pos.y -= LADDER_RELEASE_DROP;
    } else {
        m.pos.y = floor.height;
        m.floor = floor.surface;
        m.floor_height = floor.height;
    }

    m.wall = None;
    m.set_action(Action::SoftBonk, 0);
}

fn act_start_grab<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    let Some(wall) = m.wall.and_then(|wall| surfaces.resolve(wall)) else {
        let_go(m, surfaces);
        return false;
    };

    m.pos.y += LADDER_GRAB_LIFT;
    if wall.normal.x != 0.0 {
        m.pos.x = wall.vertex1.x as f32;
    } else {
        m.pos.z = wall.vertex1.z as f32;
    }
    m.face_angle[1] = wall.outward_angle();

    m.set_animation(Animation::IdleOnLedge, LADDER_IDLE_ANIM_ACCEL);
    m.set_action(Action::LadderIdle, 0);
    false
}

fn act_idle<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if !holds_wall(m, surfaces) || m.has_input(InputFlag::BPressed) {
        let_go(m, surfaces);
        return false;
    }

    if m.has_input(InputFlag::NonzeroAnalog) {
        return match stick_side(m.raw_yaw) {
            Some(_) => m.set_action(Action::LadderMovingHorizontal, 0),
            None => m.set_action(Action::LadderMovingVertical, 0),
        };
    }

    m.set_animation(Animation::IdleOnLedge, LADDER_IDLE_ANIM_ACCEL);
    false
}

fn act_moving_vertical<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if !holds_wall(m, surfaces) || m.has_input(InputFlag::BPressed) {
        let_go(m, surfaces);
        return false;
    }
    if !m.has_input(InputFlag::NonzeroAnalog) {
        return m.set_action(Action::LadderIdle, 0);
    }

    let up = m.raw_yaw >= -SIDE_YAW_MIN && m.raw_yaw <= SIDE_YAW_MIN;
    let down = m.raw_yaw <= -SIDE_YAW_MAX || m.raw_yaw >= SIDE_YAW_MAX;
    if !up && !down {
        m.set_action(Action::LadderIdle, 0);
        return false;
    }
    let dir = if up { 1.0 } else { -1.0 };

    let floor_height = find_floor_height(surfaces, m.pos);
    let mut next = m.pos;
    let mut wall = None;
    let mut reached_floor = false;

    // One unit at a time, so the climb stops at the last position that still has a wall.
    for _ in 0..LADDER_CLIMB_SPEED {
        let candidate = next + Vec3::new(0.0, dir, 0.0);

        if !up && candidate.y > floor_height && candidate.y - LADDER_FLOOR_MARGIN < floor_height {
            reached_floor = true;
            break;
        }
        if up && candidate.y + LADDER_CEILING_MARGIN > m.ceil_height {
            break;
        }
        let Some(found) = viable_wall(m, surfaces, candidate) else {
            break;
        };

        next = candidate;
        wall = Some(found);
    }

    let Some(wall) = wall else {
        m.set_action(Action::LadderIdle, 0);
        return false;
    };

    m.wall = Some(wall);
    m.pos = next;
    m.set_animation(Animation::IdleOnLedge, LADDER_MOVE_ANIM_ACCEL);

    if reached_floor {
        m.set_action(Action::LadderIdle, 0);
    }
    false
}

fn act_moving_horizontal<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if !holds_wall(m, surfaces) || m.has_input(InputFlag::BPressed) {
        let_go(m, surfaces);
        return false;
    }
    if !m.has_input(InputFlag::NonzeroAnalog) {
        return m.set_action(Action::LadderIdle, 0);
    }

    let yaw = m.yaw();
    let dir = match stick_side(m.raw_yaw) {
        Some(Side::Left) => Vec3::new(-coss(yaw), 0.0, sins(yaw)),
        Some(Side::Right) => Vec3::new(coss(yaw), 0.0, -sins(yaw)),
        None => {
            m.set_action(Action::LadderIdle, 0);
            return false;
        }
    };

    // Search further out than the actual step so the next wall segment is
    // found before the character reaches the seam.
    let next = m.pos + dir * LADDER_SIDE_SPEED;
    let lookahead = m.pos + dir * (LADDER_SIDE_SPEED + LADDER_SIDE_LIMIT);

    let Some(wall) = viable_wall(m, surfaces, lookahead) else {
        m.set_action(Action::LadderIdle, 0);
        return false;
    };

    m.wall = Some(wall);
    m.pos = next;
    m.set_animation(Animation::IdleOnLedge, LADDER_MOVE_ANIM_ACCEL);
    false
}

fn check_common_cancels(m: &mut CharacterState) -> bool {
    check_water_plunge(m)
}

pub(crate) fn execute<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if check_common_cancels(m) {
        return true;
    }

    match m.action {
        Action::LadderStartGrab => act_start_grab(m, surfaces),
        Action::LadderIdle => act_idle(m, surfaces),
        Action::LadderMovingVertical => act_moving_vertical(m, surfaces),
        Action::LadderMovingHorizontal => act_moving_horizontal(m, surfaces),
        other => reset_unmapped(m, other),
    }
}
