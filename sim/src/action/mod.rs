/*!
Action state machine.

An action is the character's current movement mode. Actions are grouped into
families that share a set of common cancels:

- `stationary`: standing still.
- `moving`: walking and landing recovery, including the stick-turn gesture
  that leads into a side flip.
- `airborne`: jumps, falls and soft bonks; fall damage is applied on landing.
- `submerged`: plunging into and idling in water.
- `ladder`: grabbing and climbing axis-aligned walls.

Handlers return `true` when they switched action and the rest of their
processing must be skipped. [`execute_action`] then dispatches the new action
in the same tick, up to `MAX_ACTION_PASSES` times.
*/

pub mod airborne;
pub mod ladder;
pub mod moving;
pub mod stationary;
pub mod submerged;

use crate::{
    collision::{SurfaceSource, Vec3},
    constants::{JUMP_VELOCITY, SIDE_FLIP_FORWARD_VELOCITY, SIDE_FLIP_VELOCITY, WATER_PLUNGE_DEPTH},
    state::{CharacterState, InputFlag, ParticleFlag},
};

pub use ladder::request_ladder_grab;

/// Upper bound on action switches resolved within one tick.
const MAX_ACTION_PASSES: usize = 8;

/// Bits of an action id that select its family.
const ACTION_GROUP_MASK: u32 = 0x0000_01C0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Action {
    #[default]
    Idle = 0x0C40_0201,
    FreefallLand = 0x0400_0471,
    Walking = 0x0400_0440,
    Jump = 0x0300_0880,
    SideFlip = 0x0100_0887,
    Freefall = 0x0100_088C,
    SoftBonk = 0x0102_08B8,
    WaterPlunge = 0x3000_22E2,
    WaterIdle = 0x3800_22C0,
    LadderStartGrab = 0x0000_01C0,
    LadderIdle = 0x0000_01C1,
    LadderMovingVertical = 0x0000_01C2,
    LadderMovingHorizontal = 0x0000_01C3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionGroup {
    Stationary,
    Moving,
    Airborne,
    Submerged,
    Ladder,
}

impl Action {
    pub const ALL: [Action; 13] = [
        Action::Idle,
        Action::FreefallLand,
        Action::Walking,
        Action::Jump,
        Action::SideFlip,
        Action::Freefall,
        Action::SoftBonk,
        Action::WaterPlunge,
        Action::WaterIdle,
        Action::LadderStartGrab,
        Action::LadderIdle,
        Action::LadderMovingVertical,
        Action::LadderMovingHorizontal,
    ];

    #[inline]
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Look up a raw action id coming from the host.
    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == id)
    }

    pub fn group(self) -> ActionGroup {
        match self.id() & ACTION_GROUP_MASK {
            0x000 => ActionGroup::Stationary,
            0x040 => ActionGroup::Moving,
            0x080 => ActionGroup::Airborne,
            0x0C0 => ActionGroup::Submerged,
            _ => ActionGroup::Ladder,
        }
    }
}

impl CharacterState {
    /// Switch to `action`, applying its entry adjustments.
    ///
    /// Always returns `true`, so handlers can `return m.set_action(..)` as their cancel.
    pub fn set_action(&mut self, action: Action, arg: u32) -> bool {
        let entering_air = action.group() == ActionGroup::Airborne && self.action.group() != ActionGroup::Airborne;
        if entering_air {
            self.peak_height = self.pos.y;
        }

        match action {
            Action::Jump => {
                self.vel.y = JUMP_VELOCITY + self.forward_vel * 0.25;
                self.forward_vel *= 0.8;
            }
            Action::SideFlip => {
                self.vel.y = SIDE_FLIP_VELOCITY;
                self.forward_vel = SIDE_FLIP_FORWARD_VELOCITY;
                self.face_angle[1] = self.intended_yaw;
            }
            Action::Walking | Action::Idle | Action::FreefallLand => {
                self.vel.y = 0.0;
            }
            Action::LadderStartGrab => {
                self.vel = Vec3::zeros();
                self.forward_vel = 0.0;
            }
            _ => {}
        }

        self.prev_action = self.action;
        self.action = action;
        self.action_arg = arg;
        self.action_state = 0;
        self.action_timer = 0;
        true
    }
}

/// Force the water-plunge action when the character is well below the water level.
pub(crate) fn check_water_plunge(m: &mut CharacterState) -> bool {
    if m.pos.y < m.water_level - WATER_PLUNGE_DEPTH {
        return m.set_action(Action::WaterPlunge, 0);
    }
    false
}

/// Fallback for an action id a family has no handler for.
pub(crate) fn reset_unmapped(m: &mut CharacterState, action: Action) -> bool {
    log::error!(
        "No handler for action {:?} ({:#010x}) in the {:?} family; resetting to idle",
        action,
        action.id(),
        action.group()
    );
    m.set_action(Action::Idle, 0)
}

/// Run the current action for one tick.
///
/// Expects the floor/ceiling refresh and input update to have run already.
pub fn execute_action<S: SurfaceSource + ?Sized>(m: &mut CharacterState, surfaces: &S) {
    m.particles.clear();

    for _ in 0..MAX_ACTION_PASSES {
        let cancel = match m.action.group() {
            ActionGroup::Stationary => stationary::execute(m, surfaces),
            ActionGroup::Moving => moving::execute(m, surfaces),
            ActionGroup::Airborne => airborne::execute(m, surfaces),
            ActionGroup::Submerged => submerged::execute(m, surfaces),
            ActionGroup::Ladder => ladder::execute(m, surfaces),
        };

        if !cancel {
            if m.has_input(InputFlag::InWater) {
                m.particles.add(ParticleFlag::WaveTrail);
                m.particles.remove(ParticleFlag::Dust);
            }
            return;
        }
    }

    log::warn!(
        "Action {:?} still switching after {} passes; stopping for this tick",
        m.action,
        MAX_ACTION_PASSES
    );
}
