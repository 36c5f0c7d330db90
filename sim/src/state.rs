//! Per-character simulation state.
//!
//! A [`CharacterState`] is created with its instance, mutated only while that
//! instance is ticked or controlled, and dropped with it. Surface fields hold
//! [`SurfaceRef`]s, never owned surfaces; they are re-resolved through the
//! instance's surface view on every use.

use crate::{
    action::Action,
    bitmask_flags::BitmaskFlags,
    collision::{ClimbMask, SurfaceRef, Vec3, settings::{CEIL_NONE_HEIGHT, FLOOR_LOWER_LIMIT}},
    constants::{DAMAGE_INVINCIBILITY_TICKS, DEAD_HEALTH, DEFAULT_WATER_LEVEL, FULL_HEALTH, HEALTH_PER_WEDGE},
    define_bitmask_flags,
    world::ObjectHandle,
};

define_bitmask_flags!(
    /// Per-tick input and environment bits, rebuilt at the start of every tick.
    InputFlag, u16, {
        NonzeroAnalog,
        APressed,
        ADown,
        BPressed,
        ZPressed,
        ZDown,
        OffFloor,
        InWater,
    }
);

define_bitmask_flags!(
    /// Cosmetic particle requests, cleared at the start of every dispatch.
    ParticleFlag, u32, {
        Dust,
        HorizontalStar,
        Splash,
        WaveTrail,
        Bubble,
    }
);

define_bitmask_flags!(
    /// Status bits reported to the host. The derived bits are refreshed every tick.
    StateFlag, u32, {
        OnPlatform,
        Climbing,
        Submerged,
        Invulnerable,
    }
);

pub type InputFlags = BitmaskFlags<u16>;
pub type ParticleFlags = BitmaskFlags<u32>;
pub type StateFlags = BitmaskFlags<u32>;

/// Animation request for the external skinning stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum Animation {
    #[default]
    Idle = 0,
    Walking = 1,
    Jump = 2,
    SideFlip = 3,
    Falling = 4,
    LandFromFall = 5,
    SoftBonk = 6,
    WaterPlunge = 7,
    WaterIdle = 8,
    IdleOnLedge = 9,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationState {
    pub id: Animation,
    /// Playback rate, 0x10000 = normal.
    pub accel: i32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            id: Animation::Idle,
            accel: 0x10000,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CharacterState {
    pub pos: Vec3,
    pub vel: Vec3,
    pub forward_vel: f32,
    /// Pitch, yaw, roll in turn units.
    pub face_angle: [i16; 3],
    /// Change of `face_angle` over the last tick.
    pub angle_vel: [i16; 3],

    pub action: Action,
    pub action_arg: u32,
    pub action_state: u16,
    pub action_timer: u16,
    pub prev_action: Action,

    pub floor: Option<SurfaceRef>,
    pub floor_height: f32,
    pub ceil: Option<SurfaceRef>,
    pub ceil_height: f32,
    pub wall: Option<SurfaceRef>,
    /// Dynamic object the character stood on at the end of the last tick.
    pub platform: Option<ObjectHandle>,

    pub input: InputFlags,
    pub intended_mag: f32,
    pub intended_yaw: i16,
    /// Stick angle before the camera is applied: 0 is up, negative is right.
    pub raw_yaw: i16,

    pub particles: ParticleFlags,
    pub flags: StateFlags,
    pub water_level: f32,
    pub health: i16,
    pub invinc_timer: i16,
    /// Wedges of damage taken this tick.
    pub damage_taken: u8,
    pub climb_mask: ClimbMask,

    pub tank_left_count: u8,
    pub tank_right_count: u8,
    /// Highest point reached since last leaving the ground, for fall damage.
    pub peak_height: f32,

    pub animation: AnimationState,
}

impl CharacterState {
    pub fn new(pos: Vec3) -> Self {
        Self {
            pos,
            vel: Vec3::zeros(),
            forward_vel: 0.0,
            face_angle: [0; 3],
            angle_vel: [0; 3],
            action: Action::Idle,
            action_arg: 0,
            action_state: 0,
            action_timer: 0,
            prev_action: Action::Idle,
            floor: None,
            floor_height: FLOOR_LOWER_LIMIT,
            ceil: None,
            ceil_height: CEIL_NONE_HEIGHT,
            wall: None,
            platform: None,
            input: InputFlags::default(),
            intended_mag: 0.0,
            intended_yaw: 0,
            raw_yaw: 0,
            particles: ParticleFlags::default(),
            flags: StateFlags::default(),
            water_level: DEFAULT_WATER_LEVEL,
            health: FULL_HEALTH,
            invinc_timer: 0,
            damage_taken: 0,
            climb_mask: ClimbMask::default(),
            tank_left_count: 0,
            tank_right_count: 0,
            peak_height: pos.y,
            animation: AnimationState::default(),
        }
    }

    #[inline]
    pub fn yaw(&self) -> i16 {
        self.face_angle[1]
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= DEAD_HEALTH
    }

    #[inline]
    pub fn has_input(&self, flag: InputFlag) -> bool {
        self.input.has(flag)
    }

    pub fn set_animation(&mut self, id: Animation, accel: i32) {
        self.animation = AnimationState { id, accel };
    }

    /// Restore `wedges` of health, capped at full.
    pub fn heal(&mut self, wedges: u8) {
        if self.is_dead() {
            return;
        }
        let amount = wedges as i32 * HEALTH_PER_WEDGE as i32;
        self.health = (self.health as i32 + amount).min(FULL_HEALTH as i32) as i16;
    }

    /// Remove `wedges` of health unless invincible; starts the invincibility window.
    /// Returns whether damage was applied.
    pub fn take_damage(&mut self, wedges: u8) -> bool {
        if wedges == 0 || self.invinc_timer > 0 || self.is_dead() {
            return false;
        }
        let amount = wedges as i32 * HEALTH_PER_WEDGE as i32;
        self.health = (self.health as i32 - amount).max(DEAD_HEALTH as i32) as i16;
        self.damage_taken = self.damage_taken.saturating_add(wedges);
        self.invinc_timer = DAMAGE_INVINCIBILITY_TICKS;
        true
    }

    pub fn kill(&mut self) {
        self.health = DEAD_HEALTH;
    }

    /// Drop every surface reference. Used when the geometry under the character goes away.
    pub fn clear_surfaces(&mut self) {
        self.floor = None;
        self.floor_height = FLOOR_LOWER_LIMIT;
        self.ceil = None;
        self.ceil_height = CEIL_NONE_HEIGHT;
        self.wall = None;
        self.platform = None;
    }
}
