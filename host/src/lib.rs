//! Host-facing side of the character simulation.
//!
//! A [`Simulation`] owns the shared [`WorldModel`] and every character
//! instance. The host drives it from one loop: world mutations first, then
//! [`Simulation::tick`] for each character. Every operation names its target
//! instance explicitly.
//!
//! Bad ids never panic. They are logged and the call reports failure through
//! `bool` or `None`.

pub mod instance;
pub mod level;
pub mod settings;
pub mod tick;

pub use instance::{CharacterContext, InstanceId, InstanceManager};
pub use settings::HostSettings;
pub use tick::{TickInput, TickOutput};

use sim::{Action, CharacterState, ClimbMask, Vec3, WorldModel, request_ladder_grab};

pub struct Simulation {
    world: WorldModel,
    instances: InstanceManager,
    settings: HostSettings,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(HostSettings::default())
    }
}

impl Simulation {
    pub fn new(settings: HostSettings) -> Self {
        Self {
            world: WorldModel::new(),
            instances: InstanceManager::new(),
            settings,
        }
    }

    #[inline]
    pub fn settings(&self) -> &HostSettings {
        &self.settings
    }

    #[inline]
    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    /// Create a character at `pos` facing `yaw` (turn units).
    pub fn create_character(&mut self, pos: [f32; 3], yaw: i16) -> Option<InstanceId> {
        self.instances
            .create(&mut self.world, &self.settings, Vec3::from(pos), yaw)
    }

    pub fn delete_character(&mut self, id: InstanceId) -> bool {
        self.instances.delete(&mut self.world, id)
    }

    pub fn character(&self, id: InstanceId) -> Option<&CharacterState> {
        self.instances.get(id).map(|ctx| &ctx.state)
    }

    #[inline]
    pub fn character_count(&self) -> usize {
        self.instances.len()
    }

    /// Advance one character by one tick.
    pub fn tick(&mut self, id: InstanceId, input: &TickInput) -> Option<TickOutput> {
        let Some(ctx) = self.instances.get_mut(id) else {
            log::warn!("Tried to tick non-existent character {:?}", id);
            return None;
        };
        Some(tick::tick_character(&mut self.world, ctx, input))
    }

    fn with_character<R>(
        &mut self,
        id: InstanceId,
        op: &str,
        f: impl FnOnce(&mut CharacterState) -> R,
    ) -> Option<R> {
        let Some(ctx) = self.instances.get_mut(id) else {
            log::warn!("Tried to {op} on non-existent character {:?}", id);
            return None;
        };
        Some(f(&mut ctx.state))
    }

    /// Switch action by raw id. Unknown ids fall back to `Idle`.
    pub fn set_action(&mut self, id: InstanceId, action_id: u32) -> bool {
        self.set_action_arg(id, action_id, 0)
    }

    pub fn set_action_arg(&mut self, id: InstanceId, action_id: u32, arg: u32) -> bool {
        self.with_character(id, "set action", |m| {
            let action = Action::from_id(action_id).unwrap_or_else(|| {
                log::error!("Unknown action id {action_id:#010x}, falling back to idle");
                Action::Idle
            });
            m.set_action(action, arg)
        })
        .unwrap_or(false)
    }

    pub fn action(&self, id: InstanceId) -> Option<u32> {
        self.character(id).map(|m| m.action.id())
    }

    pub fn set_position(&mut self, id: InstanceId, pos: [f32; 3]) -> bool {
        self.with_character(id, "set position", |m| m.pos = Vec3::from(pos))
            .is_some()
    }

    pub fn add_position(&mut self, id: InstanceId, delta: [f32; 3]) -> bool {
        self.with_character(id, "add position", |m| m.pos += Vec3::from(delta))
            .is_some()
    }

    /// Set pitch, yaw and roll in turn units.
    pub fn set_angle(&mut self, id: InstanceId, angle: [i16; 3]) -> bool {
        self.with_character(id, "set angle", |m| m.face_angle = angle)
            .is_some()
    }

    pub fn set_face_angle(&mut self, id: InstanceId, yaw: i16) -> bool {
        self.with_character(id, "set face angle", |m| m.face_angle[1] = yaw)
            .is_some()
    }

    pub fn set_velocity(&mut self, id: InstanceId, vel: [f32; 3]) -> bool {
        self.with_character(id, "set velocity", |m| m.vel = Vec3::from(vel))
            .is_some()
    }

    pub fn set_forward_velocity(&mut self, id: InstanceId, vel: f32) -> bool {
        self.with_character(id, "set forward velocity", |m| m.forward_vel = vel)
            .is_some()
    }

    pub fn set_water_level(&mut self, id: InstanceId, level: f32) -> bool {
        self.with_character(id, "set water level", |m| m.water_level = level)
            .is_some()
    }

    pub fn water_level(&self, id: InstanceId) -> Option<f32> {
        self.character(id).map(|m| m.water_level)
    }

    /// Choose which axis-aligned wall faces this character may climb.
    pub fn set_climb_mask(&mut self, id: InstanceId, mask: ClimbMask) -> bool {
        self.with_character(id, "set climb mask", |m| m.climb_mask = mask)
            .is_some()
    }

    /// Overwrite the status bits. Derived bits are recomputed on the next tick.
    pub fn set_state_flags(&mut self, id: InstanceId, bits: u32) -> bool {
        self.with_character(id, "set state flags", |m| m.flags.bits = bits)
            .is_some()
    }

    pub fn state_flags(&self, id: InstanceId) -> Option<u32> {
        self.character(id).map(|m| m.flags.bits)
    }

    pub fn set_health(&mut self, id: InstanceId, health: i16) -> bool {
        self.with_character(id, "set health", |m| m.health = health)
            .is_some()
    }

    pub fn health(&self, id: InstanceId) -> Option<i16> {
        self.character(id).map(|m| m.health)
    }

    pub fn heal(&mut self, id: InstanceId, wedges: u8) -> bool {
        self.with_character(id, "heal", |m| m.heal(wedges)).is_some()
    }

    /// Apply damage unless the character is still invincible from the last hit.
    pub fn take_damage(&mut self, id: InstanceId, wedges: u8) -> bool {
        self.with_character(id, "take damage", |m| m.take_damage(wedges))
            .unwrap_or(false)
    }

    pub fn kill(&mut self, id: InstanceId) -> bool {
        self.with_character(id, "kill", CharacterState::kill).is_some()
    }

    /// Grab the climbable wall in front of the character, if there is one.
    pub fn request_ladder_grab(&mut self, id: InstanceId) -> bool {
        let Some(ctx) = self.instances.get_mut(id) else {
            log::warn!("Tried to grab a wall with non-existent character {:?}", id);
            return false;
        };
        let Some(view) = self.world.surface_view(ctx.view) else {
            return false;
        };
        request_ladder_grab(&mut ctx.state, &view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim::{ClimbFace, RawSurface, StateFlag, TransformInput, constants::FULL_HEALTH};

    fn floor(y: i32, min: i32, max: i32) -> Vec<RawSurface> {
        vec![
            RawSurface::new([[min, y, min], [min, y, max], [max, y, max]]),
            RawSurface::new([[min, y, min], [max, y, max], [max, y, min]]),
        ]
    }

    /// Vertical wall in the plane `z = z`, facing -Z.
    fn wall_facing_neg_z(z: i32, y0: i32, y1: i32, x0: i32, x1: i32) -> Vec<RawSurface> {
        vec![
            RawSurface::new([[x0, y0, z], [x0, y1, z], [x1, y1, z]]),
            RawSurface::new([[x0, y0, z], [x1, y1, z], [x1, y0, z]]),
        ]
    }

    fn ladder_level() -> (Simulation, InstanceId) {
        let mut sim = Simulation::default();
        sim.init_level(1);
        let mut statics = floor(0, -1000, 1000);
        statics.extend(wall_facing_neg_z(100, 0, 3000, -500, 500));
        sim.load_room(0, &statics, &[]);

        let id = sim.create_character([0.0, 0.0, 50.0], 0).expect("character");
        sim.update_visible_rooms(id, &[0]);
        sim.set_climb_mask(id, ClimbMask::from_flags(&[ClimbFace::PosZ]));
        sim.tick(id, &TickInput::default());
        (sim, id)
    }

    fn stick_up() -> TickInput {
        TickInput {
            stick_y: 1.0,
            cam_look: [0.0, 0.0, 1.0],
            ..Default::default()
        }
    }

    #[test]
    fn climbing_up_gains_four_units_a_tick_and_holds_on_release() {
        let (mut sim, id) = ladder_level();
        let grab = TickInput {
            button_z: true,
            ..Default::default()
        };
        let out = sim.tick(id, &grab).expect("tick");
        assert_eq!(out.action, Action::LadderIdle.id());
        let start_y = out.position[1];

        const N: usize = 10;
        for _ in 0..N {
            let out = sim.tick(id, &stick_up()).expect("tick");
            assert_eq!(out.action, Action::LadderMovingVertical.id());
        }
        let climbed = sim.character(id).expect("live").pos.y;
        assert_eq!(climbed, start_y + 4.0 * N as f32);
        assert!(sim.character(id).expect("live").flags.has(StateFlag::Climbing));

        let out = sim.tick(id, &TickInput::default()).expect("tick");
        assert_eq!(out.action, Action::LadderIdle.id());
        assert_eq!(out.position[1], climbed);
    }

    fn grab_tick(sim: &mut Simulation, id: InstanceId) -> TickOutput {
        let grab = TickInput {
            button_z: true,
            ..Default::default()
        };
        sim.tick(id, &grab).expect("tick")
    }

    #[test]
    fn hiding_the_walls_room_lets_go_of_it() {
        let mut sim = Simulation::default();
        sim.init_level(2);
        sim.load_room(0, &floor(0, -1000, 1000), &[]);
        sim.load_room(1, &wall_facing_neg_z(100, 0, 3000, -500, 500), &[]);
        let id = sim.create_character([0.0, 0.0, 50.0], 0).expect("character");
        sim.update_visible_rooms(id, &[0, 1]);
        sim.set_climb_mask(id, ClimbMask::from_flags(&[ClimbFace::PosZ]));
        sim.tick(id, &TickInput::default());
        assert_eq!(grab_tick(&mut sim, id).action, Action::LadderIdle.id());

        assert!(sim.update_visible_rooms(id, &[0]));
        assert_eq!(sim.character(id).expect("live").wall, None);

        let out = sim.tick(id, &TickInput::default()).expect("tick");
        assert_eq!(out.action, Action::SoftBonk.id());
        assert!(!sim.character(id).expect("live").flags.has(StateFlag::Climbing));
    }

    #[test]
    fn replacing_clippers_drops_a_held_clipper_wall() {
        let mut sim = Simulation::default();
        sim.init_level(1);
        sim.load_room(0, &floor(0, -1000, 1000), &[]);
        let id = sim.create_character([0.0, 0.0, 50.0], 0).expect("character");
        sim.update_visible_rooms_with_clippers(id, &[0], &wall_facing_neg_z(100, 0, 3000, -500, 500));
        sim.set_climb_mask(id, ClimbMask::from_flags(&[ClimbFace::PosZ]));
        sim.tick(id, &TickInput::default());
        assert_eq!(grab_tick(&mut sim, id).action, Action::LadderIdle.id());
        assert!(matches!(
            sim.character(id).and_then(|m| m.wall),
            Some(sim::SurfaceRef::Clipper { .. })
        ));

        // Same number of clippers, so the old indices would still resolve.
        let moved = wall_facing_neg_z(900, 0, 3000, -500, 500);
        assert!(sim.update_visible_rooms_with_clippers(id, &[0], &moved));
        assert_eq!(sim.character(id).expect("live").wall, None);

        let out = sim.tick(id, &TickInput::default()).expect("tick");
        assert_eq!(out.action, Action::SoftBonk.id());
    }

    #[test]
    fn far_off_positions_tick_without_overflow() {
        let (mut sim, id) = ladder_level();
        assert!(sim.set_position(id, [3.0e9, 0.0, -3.0e9]));
        assert!(sim.tick(id, &TickInput::default()).is_some());

        let mut sim = Simulation::default();
        sim.init_level(1);
        let deep = [RawSurface::new([[0, i32::MIN, 0], [0, i32::MIN, 100], [100, i32::MIN, 0]])];
        assert!(sim.load_room(0, &deep, &[]));
    }

    #[test]
    fn explicit_grab_request_uses_the_characters_view() {
        let (mut sim, id) = ladder_level();
        assert!(sim.request_ladder_grab(id));
        assert_eq!(sim.action(id), Some(Action::LadderStartGrab.id()));

        sim.set_face_angle(id, i16::MIN);
        sim.set_action(id, Action::Idle.id());
        assert!(!sim.request_ladder_grab(id));
    }

    #[test]
    fn deleting_the_platform_underfoot_leaves_a_valid_floor() {
        let mut sim = Simulation::default();
        sim.init_level(1);
        sim.load_room(0, &floor(-500, -2000, 2000), &[]);
        let id = sim.create_character([0.0, 0.0, 0.0], 0).expect("character");
        sim.update_visible_rooms(id, &[0]);
        let platform = sim.create_dynamic_object(&TransformInput::default(), &floor(0, -200, 200));

        sim.tick(id, &TickInput::default());
        let m = sim.character(id).expect("live");
        assert_eq!(m.platform, Some(platform));
        assert_eq!(m.floor.and_then(|f| f.object()), Some(platform));

        assert!(sim.delete_dynamic_object(platform));
        let m = sim.character(id).expect("live");
        assert_eq!(m.platform, None);
        assert_eq!(m.floor_height, -500.0);
        let floor = m.floor.expect("room floor");
        assert!(floor.object().is_none());

        let out = sim.tick(id, &TickInput::default()).expect("tick");
        assert_eq!(out.action, Action::Freefall.id());
        assert!(!sim.character(id).expect("live").flags.has(StateFlag::OnPlatform));
    }

    #[test]
    fn deleting_the_only_floor_leaves_an_explicit_none() {
        let mut sim = Simulation::new(HostSettings {
            world_floor_enabled: false,
            ..Default::default()
        });
        sim.init_level(1);
        let id = sim.create_character([0.0, 0.0, 0.0], 0).expect("character");
        let platform = sim.create_dynamic_object(&TransformInput::default(), &floor(0, -200, 200));
        sim.tick(id, &TickInput::default());

        assert!(sim.delete_dynamic_object(platform));
        let m = sim.character(id).expect("live");
        assert_eq!(m.floor, None);
        assert_eq!(m.platform, None);
        assert!(!sim.delete_dynamic_object(platform));
    }

    #[test]
    fn room_count_includes_the_dynamic_pseudo_room() {
        let mut sim = Simulation::default();
        sim.init_level(2);
        sim.load_room(0, &floor(0, -100, 100), &[]);
        sim.load_room(1, &floor(0, 1000, 1200), &[]);
        let id = sim.create_character([0.0, 0.0, 0.0], 0).expect("character");
        sim.update_visible_rooms(id, &[0, 1]);

        let object = sim.create_dynamic_object(&TransformInput::default(), &floor(50, -10, 10));
        assert_eq!(sim.room_count(id), Some(3));
        assert_eq!(sim.room_surface_count(id, 2), Some(2));
        assert_eq!(sim.room_surface(id, 2, 1).map(|s| s.vertex1.y), Some(50));

        sim.delete_dynamic_object(object);
        assert_eq!(sim.room_surface_count(id, 2), Some(0));
    }

    #[test]
    fn unknown_action_ids_fall_back_to_idle() {
        let (mut sim, id) = ladder_level();
        sim.set_action(id, Action::Walking.id());
        assert_eq!(sim.action(id), Some(Action::Walking.id()));

        assert!(sim.set_action_arg(id, 0xDEAD_BEEF, 3));
        assert_eq!(sim.action(id), Some(Action::Idle.id()));
        assert_eq!(sim.character(id).expect("live").action_arg, 3);
    }

    #[test]
    fn control_calls_write_through_and_reject_dead_ids() {
        let (mut sim, id) = ladder_level();
        assert!(sim.set_position(id, [1.0, 2.0, 3.0]));
        assert!(sim.add_position(id, [1.0, 0.0, 0.0]));
        assert!(sim.set_velocity(id, [0.0, 5.0, 0.0]));
        assert!(sim.set_forward_velocity(id, 7.0));
        assert!(sim.set_angle(id, [0, 0x1000, 0]));
        assert!(sim.set_water_level(id, -50.0));
        let m = sim.character(id).expect("live");
        assert_eq!(m.pos, Vec3::new(2.0, 2.0, 3.0));
        assert_eq!(m.vel.y, 5.0);
        assert_eq!(m.forward_vel, 7.0);
        assert_eq!(m.yaw(), 0x1000);
        assert_eq!(sim.water_level(id), Some(-50.0));

        assert!(sim.take_damage(id, 2));
        assert!(!sim.take_damage(id, 2));
        assert!(sim.heal(id, 1));
        assert_eq!(sim.health(id), Some(FULL_HEALTH - 0x100));
        assert!(sim.kill(id));
        assert!(sim.character(id).expect("live").is_dead());

        assert!(sim.delete_character(id));
        assert!(!sim.set_position(id, [0.0; 3]));
        assert!(sim.tick(id, &TickInput::default()).is_none());
        assert_eq!(sim.health(id), None);
        assert_eq!(sim.character_count(), 0);
    }
}
