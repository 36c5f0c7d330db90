use super::{Action, check_water_plunge, reset_unmapped};
use crate::{
    angle::{angle_diff, coss, sins},
    collision::SurfaceSource,
    constants::{AIR_MAX_SPEED, AIR_STEER_ACCEL, AIR_TURN_SPEED, FALL_DAMAGE_HEIGHT_LARGE, FALL_DAMAGE_HEIGHT_SMALL},
    movement::{AirStep, apply_forward_velocity, apply_gravity, perform_air_step},
    state::{Animation, CharacterState, InputFlag, ParticleFlag},
};

/// Forward speed above which running into a wall knocks the character back.
const BONK_SPEED: f32 = 16.0;

fn check_common_cancels(m: &mut CharacterState) -> bool {
    check_water_plunge(m)
}

fn update_air_velocity(m: &mut CharacterState, steer: bool) {
    if steer && m.has_input(InputFlag::NonzeroAnalog) {
        let dyaw = angle_diff(m.intended_yaw, m.yaw());
        let mag = m.intended_mag / 32.0;
        m.forward_vel += AIR_STEER_ACCEL * coss(dyaw) * mag;
        let turn = (AIR_TURN_SPEED as f32 * sins(dyaw) * mag) as i16;
        m.face_angle[1] = m.yaw().wrapping_add(turn);
    }
    m.forward_vel = m.forward_vel.clamp(-AIR_MAX_SPEED, AIR_MAX_SPEED);
    apply_forward_velocity(m);

    // Letting go of A early cuts a rising jump short.
    if m.action == Action::Jump && m.vel.y > 0.0 && !m.has_input(InputFlag::ADown) {
        m.vel.y *= 0.25;
    }
    apply_gravity(m);
}

/// Damage for the height fallen since the last peak. Resets the peak.
fn apply_fall_damage(m: &mut CharacterState) -> bool {
    let fall = m.peak_height - m.pos.y;
    m.peak_height = m.pos.y;

    let wedges = if fall > FALL_DAMAGE_HEIGHT_LARGE {
        3
    } else if fall > FALL_DAMAGE_HEIGHT_SMALL {
        1
    } else {
        0
    };
    if wedges == 0 {
        return false;
    }
    log::debug!("Fell {fall:.0} units, taking {wedges} wedges of damage");
    m.take_damage(wedges)
}

fn common_air_action<S: SurfaceSource + ?Sized>(
    m: &mut CharacterState,
    surfaces: &S,
    animation: Animation,
    steer: bool,
) -> bool {
    update_air_velocity(m, steer);

    match perform_air_step(m, surfaces) {
        AirStep::Landed => {
            apply_fall_damage(m);
            m.set_action(Action::FreefallLand, 0);
        }
        AirStep::HitWall => {
            if m.forward_vel > BONK_SPEED {
                m.forward_vel = -BONK_SPEED;
                m.particles.add(ParticleFlag::HorizontalStar);
                m.set_action(Action::SoftBonk, 0);
            } else if m.forward_vel > 0.0 {
                m.forward_vel = 0.0;
            }
        }
        AirStep::None => {}
    }

    m.set_animation(animation, 0x10000);
    false
}

pub(crate) fn execute<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if check_common_cancels(m) {
        return true;
    }

    match m.action {
        Action::Jump => common_air_action(m, surfaces, Animation::Jump, true),
        Action::SideFlip => common_air_action(m, surfaces, Animation::SideFlip, true),
        Action::Freefall => common_air_action(m, surfaces, Animation::Falling, true),
        Action::SoftBonk => common_air_action(m, surfaces, Animation::SoftBonk, false),
        other => reset_unmapped(m, other),
    }
}
