//! The per-character tick.
//!
//! Order within one tick:
//! 1. Sample the controller (button edges, stick, camera yaw).
//! 2. Recentre the world floor under the character.
//! 3. Carry the character along with the platform it stood on last tick.
//! 4. Refresh floor and ceiling, rebuild input bits, run the action machine.
//! 5. Remember the new platform and derive the reported status bits.

use sim::{
    ActionGroup, CharacterState, ControllerFrame, StateFlag, SurfaceView, WorldModel, angle::turn_to_radians,
    execute_action, refresh_floor_and_ceiling, update_character_inputs,
};

use crate::instance::CharacterContext;

/// Host input for one tick.
///
/// Stick axes are in `[-1, 1]`, +X right and +Y up. Only the horizontal part of
/// the camera look vector is used.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    pub stick_x: f32,
    pub stick_y: f32,
    pub button_a: bool,
    pub button_b: bool,
    pub button_z: bool,
    pub cam_look: [f32; 3],
}

impl From<&TickInput> for ControllerFrame {
    fn from(input: &TickInput) -> Self {
        Self {
            stick_x: input.stick_x,
            stick_y: input.stick_y,
            button_a: input.button_a,
            button_b: input.button_b,
            button_z: input.button_z,
            cam_look_x: input.cam_look[0],
            cam_look_z: input.cam_look[2],
        }
    }
}

/// What the host reads back after a tick. Angles are in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickOutput {
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub angular_velocity: [f32; 3],
    pub face_angle: f32,
    pub pitch_angle: f32,
    pub health: i16,
    pub action: u32,
    pub state_flags: u32,
    pub particle_flags: u32,
    pub invinc_timer: i16,
    /// Health wedges lost during this tick.
    pub damage_taken: u8,
    pub animation_id: i16,
    pub animation_accel: i32,
}

impl TickOutput {
    pub fn capture(m: &CharacterState) -> Self {
        Self {
            position: m.pos.into(),
            velocity: m.vel.into(),
            angular_velocity: m.angle_vel.map(turn_to_radians),
            face_angle: turn_to_radians(m.face_angle[1]),
            pitch_angle: turn_to_radians(m.face_angle[0]),
            health: m.health,
            action: m.action.id(),
            state_flags: m.flags.bits,
            particle_flags: m.particles.bits,
            invinc_timer: m.invinc_timer,
            damage_taken: m.damage_taken,
            animation_id: m.animation.id as i16,
            animation_accel: m.animation.accel,
        }
    }
}

/// Advance one character by one tick against the shared world.
pub fn tick_character(world: &mut WorldModel, ctx: &mut CharacterContext, input: &TickInput) -> TickOutput {
    ctx.controller.update(&ControllerFrame::from(input));

    let m = &mut ctx.state;
    m.damage_taken = 0;
    let face_before = m.face_angle;

    world.recenter_world_floor(ctx.view, m.pos);
    let Some(view) = world.surface_view(ctx.view) else {
        log::warn!("Character has no visible-room set, skipping tick");
        return TickOutput::capture(m);
    };

    apply_platform_displacement(m, &view);
    refresh_floor_and_ceiling(m, &view);
    update_character_inputs(m, &ctx.controller);
    execute_action(m, &view);

    m.platform = m.floor.and_then(|floor| floor.object());
    for i in 0..3 {
        m.angle_vel[i] = m.face_angle[i].wrapping_sub(face_before[i]);
    }
    if m.invinc_timer > 0 {
        m.invinc_timer -= 1;
    }
    update_state_flags(m);

    TickOutput::capture(m)
}

/// Move the character by its platform's motion since the last object update.
fn apply_platform_displacement(m: &mut CharacterState, view: &SurfaceView<'_>) {
    let Some(platform) = m.platform else {
        return;
    };
    let Some(transform) = view.object_transform(platform) else {
        m.platform = None;
        return;
    };

    m.pos = transform.carry(m.pos);
    m.face_angle[1] = m.face_angle[1].wrapping_add(transform.angle_velocity[1]);
}

fn update_state_flags(m: &mut CharacterState) {
    let group = m.action.group();
    m.flags.set(StateFlag::OnPlatform, m.platform.is_some());
    m.flags.set(StateFlag::Climbing, group == ActionGroup::Ladder);
    m.flags.set(StateFlag::Submerged, group == ActionGroup::Submerged);
    m.flags.set(StateFlag::Invulnerable, m.invinc_timer > 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{instance::InstanceManager, settings::HostSettings};
    use sim::{Action, ParticleFlag, RawSurface, Vec3};

    fn floor(y: i32) -> [RawSurface; 2] {
        [
            RawSurface::new([[-1000, y, -1000], [-1000, y, 1000], [1000, y, 1000]]),
            RawSurface::new([[-1000, y, -1000], [1000, y, 1000], [1000, y, -1000]]),
        ]
    }

    fn one_room_world(y: i32) -> (WorldModel, InstanceManager, crate::instance::InstanceId) {
        let mut world = WorldModel::new();
        world.init(1);
        world.load_room(0, &floor(y), &[]);
        let mut instances = InstanceManager::new();
        let id = instances
            .create(&mut world, &HostSettings::default(), Vec3::new(0.0, y as f32, 0.0), 0)
            .expect("instance");
        let view = instances.get(id).expect("live").view;
        world.update_visible_rooms(view, &[0], &[]);
        (world, instances, id)
    }

    #[test]
    fn idle_tick_reports_position_and_action() {
        let (mut world, mut instances, id) = one_room_world(0);
        let ctx = instances.get_mut(id).expect("live");
        let out = tick_character(&mut world, ctx, &TickInput::default());

        assert_eq!(out.position, [0.0, 0.0, 0.0]);
        assert_eq!(out.action, Action::Idle.id());
        assert_eq!(out.health, ctx.state.health);
        assert!(ctx.state.floor.is_some());
    }

    #[test]
    fn a_press_is_edge_detected_across_ticks() {
        let (mut world, mut instances, id) = one_room_world(0);
        let ctx = instances.get_mut(id).expect("live");
        let held = TickInput {
            button_a: true,
            ..Default::default()
        };

        let out = tick_character(&mut world, ctx, &held);
        assert_eq!(out.action, Action::Jump.id());
        let y = out.position[1];
        assert!(y > 0.0);

        // Still held, so no second jump; the first one keeps rising.
        let out = tick_character(&mut world, ctx, &held);
        assert_eq!(out.action, Action::Jump.id());
        assert!(out.position[1] > y);
    }

    #[test]
    fn stick_is_taken_relative_to_the_camera() {
        let (mut world, mut instances, id) = one_room_world(0);
        let ctx = instances.get_mut(id).expect("live");
        // Camera looking down +X, stick straight up: walk toward +X.
        let input = TickInput {
            stick_y: 1.0,
            cam_look: [1.0, 0.0, 0.0],
            ..Default::default()
        };

        let out = tick_character(&mut world, ctx, &input);
        assert_eq!(out.action, Action::Walking.id());
        assert!(out.position[0] > 0.0);
        assert!(out.position[2].abs() < 1e-3);
        assert!((out.face_angle - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn damage_counter_resets_each_tick_and_invincibility_counts_down() {
        let (mut world, mut instances, id) = one_room_world(0);
        let ctx = instances.get_mut(id).expect("live");
        assert!(ctx.state.take_damage(2));
        let timer = ctx.state.invinc_timer;

        let out = tick_character(&mut world, ctx, &TickInput::default());
        // Damage applied between ticks is cleared at tick start.
        assert_eq!(out.damage_taken, 0);
        assert_eq!(out.invinc_timer, timer - 1);
        assert!(ctx.state.flags.has(StateFlag::Invulnerable));
    }

    #[test]
    fn falling_into_water_reports_submerged() {
        let (mut world, mut instances, id) = one_room_world(-2000);
        let ctx = instances.get_mut(id).expect("live");
        ctx.state.pos.y = -50.0;
        ctx.state.water_level = 100.0;
        ctx.state.set_action(Action::Freefall, 0);
        ctx.state.vel.y = -40.0;

        let out = tick_character(&mut world, ctx, &TickInput::default());
        assert_eq!(out.action, Action::WaterPlunge.id());
        assert!(ctx.state.flags.has(StateFlag::Submerged));
        assert!(ctx.state.particles.has(ParticleFlag::Splash));
    }
}
