//! Controller sampling and per-tick input bits.

use crate::{
    angle::atan2s,
    bitmask_flags::BitmaskFlags,
    constants::{IN_WATER_DEPTH, STICK_DEADZONE, STICK_RANGE},
    define_bitmask_flags,
    state::{CharacterState, InputFlag},
};

define_bitmask_flags!(
    Button, u8, {
        A,
        B,
        Z,
    }
);

/// One tick of raw host input.
///
/// Stick axes are in `[-1, 1]` with +X to the right and +Y up. The camera
/// look vector only needs its horizontal components.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControllerFrame {
    pub stick_x: f32,
    pub stick_y: f32,
    pub button_a: bool,
    pub button_b: bool,
    pub button_z: bool,
    pub cam_look_x: f32,
    pub cam_look_z: f32,
}

/// Button edge state plus the scaled stick of the last sampled frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct Controller {
    pub down: BitmaskFlags<u8>,
    pub pressed: BitmaskFlags<u8>,
    pub stick_x: f32,
    pub stick_y: f32,
    pub stick_mag: f32,
    pub cam_yaw: i16,
}

impl Controller {
    /// Sample `frame`. A button counts as pressed only on the tick it goes down.
    pub fn update(&mut self, frame: &ControllerFrame) {
        let previous = self.down;

        let mut down = BitmaskFlags::<u8>::default();
        down.set(Button::A, frame.button_a);
        down.set(Button::B, frame.button_b);
        down.set(Button::Z, frame.button_z);

        let mut pressed = BitmaskFlags::<u8>::default();
        for button in [Button::A, Button::B, Button::Z] {
            pressed.set(button, down.has(button) && !previous.has(button));
        }
        self.down = down;
        self.pressed = pressed;

        self.stick_x = frame.stick_x.clamp(-1.0, 1.0) * STICK_RANGE;
        self.stick_y = frame.stick_y.clamp(-1.0, 1.0) * STICK_RANGE;
        self.stick_mag = self.stick_x.hypot(self.stick_y).min(STICK_RANGE);
        self.cam_yaw = atan2s(frame.cam_look_z, frame.cam_look_x);
    }
}

/// Rebuild the character's input bits and intended motion from `controller`.
///
/// Must run after the floor refresh, since `OffFloor` reads `floor_height`.
pub fn update_character_inputs(m: &mut CharacterState, controller: &Controller) {
    m.input.clear();

    m.input.set(InputFlag::APressed, controller.pressed.has(Button::A));
    m.input.set(InputFlag::ADown, controller.down.has(Button::A));
    m.input.set(InputFlag::BPressed, controller.pressed.has(Button::B));
    m.input.set(InputFlag::ZPressed, controller.pressed.has(Button::Z));
    m.input.set(InputFlag::ZDown, controller.down.has(Button::Z));

    if controller.stick_mag > STICK_DEADZONE {
        let mag = controller.stick_mag / STICK_RANGE;
        m.intended_mag = mag * mag * STICK_RANGE / 2.0;
        // Turn angles grow toward +X, which is screen-left for a camera
        // looking down +Z, so the horizontal axis is mirrored.
        m.raw_yaw = atan2s(controller.stick_y, -controller.stick_x);
        m.intended_yaw = m.raw_yaw.wrapping_add(controller.cam_yaw);
        m.input.add(InputFlag::NonzeroAnalog);
    } else {
        m.intended_mag = 0.0;
        m.raw_yaw = 0;
        m.intended_yaw = m.yaw();
    }

    if m.pos.y > m.floor_height + 100.0 {
        m.input.add(InputFlag::OffFloor);
    }
    if m.pos.y < m.water_level - IN_WATER_DEPTH {
        m.input.add(InputFlag::InWater);
    }
}
