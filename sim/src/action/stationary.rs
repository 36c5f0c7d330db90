use super::{Action, check_water_plunge, request_ladder_grab, reset_unmapped};
use crate::{
    collision::{SurfaceSource, Vec3},
    movement::{GroundStep, perform_ground_step},
    state::{Animation, CharacterState, InputFlag},
};

fn check_common_cancels(m: &mut CharacterState) -> bool {
    if check_water_plunge(m) {
        return true;
    }
    if m.has_input(InputFlag::OffFloor) {
        return m.set_action(Action::Freefall, 0);
    }
    false
}

fn act_idle<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if m.has_input(InputFlag::APressed) {
        return m.set_action(Action::Jump, 0);
    }
    if m.has_input(InputFlag::ZPressed) && request_ladder_grab(m, surfaces) {
        return true;
    }
    if m.has_input(InputFlag::NonzeroAnalog) {
        m.face_angle[1] = m.intended_yaw;
        return m.set_action(Action::Walking, 0);
    }

    m.forward_vel = 0.0;
    m.vel = Vec3::zeros();
    if perform_ground_step(m, surfaces) == GroundStep::LeftGround {
        return m.set_action(Action::Freefall, 0);
    }

    m.set_animation(Animation::Idle, 0x10000);
    false
}

pub(crate) fn execute<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) -> bool {
    if check_common_cancels(m) {
        return true;
    }

    match m.action {
        Action::Idle => act_idle(m, surfaces),
        other => reset_unmapped(m, other),
    }
}
