//! Character instances: creation, lookup and teardown.
//!
//! Each instance owns its [`CharacterState`], its controller edge state and the
//! handle of its visible-room set inside the shared [`WorldModel`]. Every
//! operation takes the instance id explicitly; nothing is implicitly bound.

use sim::{Arena, CharacterState, Controller, Handle, Vec3, ViewHandle, WorldModel, angle};
use std::sync::OnceLock;

use crate::settings::HostSettings;

/// One-time setup shared by every instance for the life of the process.
static SHARED_SETUP: OnceLock<()> = OnceLock::new();

/// Host-visible id of a character instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceId(Handle);

impl InstanceId {
    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0.to_raw()
    }

    #[inline]
    pub fn from_raw(raw: u64) -> Result<Self, &'static str> {
        Handle::from_raw(raw).map(Self)
    }
}

/// Everything one character carries between ticks.
#[derive(Clone, Debug)]
pub struct CharacterContext {
    pub state: CharacterState,
    pub controller: Controller,
    pub view: ViewHandle,
}

#[derive(Default)]
pub struct InstanceManager {
    instances: Arena<CharacterContext>,
}

impl InstanceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a character at `pos` facing `yaw` with its own visible-room set.
    ///
    /// Returns `None` once `settings.max_instances` are live.
    pub fn create(
        &mut self,
        world: &mut WorldModel,
        settings: &HostSettings,
        pos: Vec3,
        yaw: i16,
    ) -> Option<InstanceId> {
        if self.instances.len() >= settings.max_instances {
            log::warn!(
                "Refusing to create a character: {} instances already live",
                self.instances.len()
            );
            return None;
        }

        SHARED_SETUP.get_or_init(|| {
            angle::warm_tables();
            log::info!("Built shared lookup tables");
        });

        let mut state = CharacterState::new(pos);
        state.face_angle[1] = yaw;
        let view = world.create_view(settings.world_floor_enabled);
        world.recenter_world_floor(view, pos);

        let id = InstanceId(self.instances.insert(CharacterContext {
            state,
            controller: Controller::default(),
            view,
        }));
        log::debug!("Created character {}", id.0.index);
        Some(id)
    }

    /// Drop a character and its visible-room set.
    pub fn delete(&mut self, world: &mut WorldModel, id: InstanceId) -> bool {
        let Some(ctx) = self.instances.remove(id.0) else {
            log::warn!("Tried to delete non-existent character {:?}", id);
            return false;
        };
        world.delete_view(ctx.view);
        log::debug!("Deleted character {}", id.0.index);
        true
    }

    pub fn get(&self, id: InstanceId) -> Option<&CharacterContext> {
        self.instances.get(id.0)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut CharacterContext> {
        self.instances.get_mut(id.0)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (InstanceId, &mut CharacterContext)> {
        self.instances.iter_mut().map(|(handle, ctx)| (InstanceId(handle), ctx))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
