use super::{Action, check_water_plunge, request_ladder_grab, reset_unmapped};
use crate::{
    collision::SurfaceSource,
    constants::{
        TANK_TURN_MAX_COUNT, TANK_TURN_MIN_ANGLE, TANK_TURN_SIDE_FLIP_COUNT, WALK_ACCEL, WALK_DECEL, WALK_MAX_SPEED,
        WALK_TURN_SPEED,
    },
    motion::{approach_angle, approach_f32, approach_f32_symmetric},
    movement::{GroundStep, apply_forward_velocity, perform_ground_step},
    state::{Animation, CharacterState, InputFlag, ParticleFlag},
};

/// Ticks spent recovering from a landing before control returns.
const LAND_RECOVERY_TICKS: u16 = 4;

fn check_common_cancels(m: &mut CharacterState) -> bool {
    if check_water_plunge(m) {
        return true;
    }
    if m.has_input(InputFlag::OffFloor) {
        return m.set_action(Action::Freefall, 0);
    }
    false
}

/// Count ticks the stick is held hard to one side.
///
/// Holding a side counts it up to `TANK_TURN_MAX_COUNT` and bleeds the other
/// side down by one, so a quick reversal still sees the old count.
fn update_turn_counters(m: &mut CharacterState) {
    let analog = m.has_input(InputFlag::NonzeroAnalog);
    if analog && m.raw_yaw >= TANK_TURN_MIN_ANGLE {
        m.tank_left_count = (m.tank_left_count + 1).min(TANK_TURN_MAX_COUNT);
        m.tank_right_count = m.tank_right_count.saturating_sub(1);
    } else if analog && m.raw_yaw <= -TANK_TURN_MIN_ANGLE {
        m.tank_right_count = (m.tank_right_count + 1).min(TANK_TURN_MAX_COUNT);
        m.tank_left_count = m.tank_left_count.saturating_sub(1);
    } else {
        m.tank_left_count = m.tank_left_count.saturating_sub(1);
        m.tank_right_count = m.tank_right_count.saturating_sub(1);
    }
}

/// Whether the stick was just swung across after being held on the other side.
fn side_flip_ready(m: &CharacterState) -> bool {
    if !m.has_input(InputFlag::NonzeroAnalog) {
        return false;
    }
    (m.raw_yaw <= -TANK_TURN_MIN_ANGLE && m.tank_left_count >= TANK_TURN_SIDE_FLIP_COUNT)
        || (m.raw_yaw >= TANK_TURN_MIN_ANGLE && m.tank_right_count >= TANK_TURN_SIDE_FLIP_COUNT)
}

fn act_walking<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if m.has_input(InputFlag::APressed) {
        if side_flip_ready(m) {
            m.tank_left_count = 0;
            m.tank_right_count = 0;
            m.particles.add(ParticleFlag::Dust);
            return m.set_action(Action::SideFlip, 0);
        }
        return m.set_action(Action::Jump, 0);
    }
    if m.has_input(InputFlag::ZPressed) && request_ladder_grab(m, surfaces) {
        return true;
    }

    update_turn_counters(m);

    if m.has_input(InputFlag::NonzeroAnalog) {
        let target = m.intended_mag / 32.0 * WALK_MAX_SPEED;
        m.forward_vel = approach_f32(m.forward_vel, target, WALK_ACCEL, WALK_DECEL);
        m.face_angle[1] = approach_angle(m.yaw(), m.intended_yaw, WALK_TURN_SPEED);
    } else {
        m.forward_vel = approach_f32_symmetric(m.forward_vel, 0.0, WALK_DECEL);
        if m.forward_vel == 0.0 {
            return m.set_action(Action::Idle, 0);
        }
    }

    apply_forward_velocity(m);
    m.vel.y = 0.0;

    match perform_ground_step(m, surfaces) {
        GroundStep::LeftGround => return m.set_action(Action::Freefall, 0),
        GroundStep::Blocked => m.forward_vel = 0.0,
        GroundStep::HitWall | GroundStep::None => {}
    }

    let accel = (m.forward_vel.max(1.0) / 4.0 * 0x10000 as f32) as i32;
    m.set_animation(Animation::Walking, accel);
    false
}

fn act_freefall_land<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if m.has_input(InputFlag::APressed) {
        return m.set_action(Action::Jump, 0);
    }
    if m.action_timer == 0 {
        m.particles.add(ParticleFlag::Dust);
    }
    m.action_timer = m.action_timer.saturating_add(1);

    m.forward_vel = approach_f32_symmetric(m.forward_vel, 0.0, WALK_DECEL);
    apply_forward_velocity(m);
    m.vel.y = 0.0;
    if perform_ground_step(m, surfaces) == GroundStep::LeftGround {
        return m.set_action(Action::Freefall, 0);
    }
    m.set_animation(Animation::LandFromFall, 0x10000);

    if m.action_timer >= LAND_RECOVERY_TICKS {
        if m.has_input(InputFlag::NonzeroAnalog) {
            m.face_angle[1] = m.intended_yaw;
            m.set_action(Action::Walking, 0);
        } else {
            m.set_action(Action::Idle, 0);
        }
    }
    false
}

pub(crate) fn execute<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if check_common_cancels(m) {
        return true;
    }

    match m.action {
        Action::Walking => act_walking(m, surfaces),
        Action::FreefallLand => act_freefall_land(m, surfaces),
        other => reset_unmapped(m, other),
    }
}
