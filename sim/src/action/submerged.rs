use super::{Action, reset_unmapped};
use crate::{
    collision::SurfaceSource,
    constants::{
        AIR_TURN_SPEED, GRAVITY, IN_WATER_DEPTH, WATER_DRAG, WATER_SINK_SPEED, WATER_SURFACE_DEPTH, WATER_SWIM_SPEED,
    },
    motion::{approach_angle, approach_f32, approach_f32_symmetric},
    movement::{WaterStep, apply_forward_velocity, perform_water_step},
    state::{Animation, CharacterState, InputFlag, ParticleFlag},
};

/// Ticks between idle bubble puffs.
const BUBBLE_INTERVAL: u16 = 32;

/// Leave the water once the surface has dropped below the character.
fn check_common_cancels(m: &mut CharacterState) -> bool {
    if m.pos.y < m.water_level - IN_WATER_DEPTH {
        return false;
    }
    if m.pos.y <= m.floor_height {
        m.pos.y = m.floor_height;
        return m.set_action(Action::Idle, 0);
    }
    m.set_action(Action::Freefall, 0)
}

fn at_surface(m: &CharacterState) -> bool {
    m.pos.y >= m.water_level - WATER_SURFACE_DEPTH - 1.0
}

fn act_water_plunge<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if m.action_timer == 0 {
        m.particles.add(ParticleFlag::Splash);
    }
    m.action_timer = m.action_timer.saturating_add(1);

    m.forward_vel *= WATER_DRAG;
    apply_forward_velocity(m);
    m.vel.y = approach_f32_symmetric(m.vel.y, WATER_SINK_SPEED, GRAVITY);

    let step = perform_water_step(m, surfaces);
    m.set_animation(Animation::WaterPlunge, 0x10000);

    if step == WaterStep::HitFloor || m.vel.y >= WATER_SINK_SPEED {
        m.set_action(Action::WaterIdle, 0);
    }
    false
}

fn act_water_idle<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if m.has_input(InputFlag::APressed) && at_surface(m) {
        return m.set_action(Action::Jump, 0);
    }

    if m.has_input(InputFlag::NonzeroAnalog) {
        m.face_angle[1] = approach_angle(m.yaw(), m.intended_yaw, AIR_TURN_SPEED);
        let target = m.intended_mag / 32.0 * WATER_SWIM_SPEED;
        m.forward_vel = approach_f32(m.forward_vel, target, 1.0, 1.0);
    } else {
        m.forward_vel *= WATER_DRAG;
    }
    apply_forward_velocity(m);

    m.vel.y = if m.has_input(InputFlag::ADown) {
        WATER_SWIM_SPEED / 2.0
    } else {
        approach_f32_symmetric(m.vel.y, WATER_SINK_SPEED, 1.0)
    };

    perform_water_step(m, surfaces);

    if m.action_timer % BUBBLE_INTERVAL == 0 {
        m.particles.add(ParticleFlag::Bubble);
    }
    m.action_timer = m.action_timer.wrapping_add(1);
    m.set_animation(Animation::WaterIdle, 0x10000);
    false
}

pub(crate) fn execute<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if check_common_cancels(m) {
        return true;
    }

    match m.action {
        Action::WaterPlunge => act_water_plunge(m, surfaces),
        Action::WaterIdle => act_water_idle(m, surfaces),
        other => reset_unmapped(m, other),
    }
}
