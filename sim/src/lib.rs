pub mod action;
pub mod angle;
pub mod arena;
pub mod bitmask_flags;
pub mod collision;
pub mod constants;
pub mod input;
pub mod motion;
pub mod movement;
pub mod state;
pub mod world;

pub use action::{Action, ActionGroup, execute_action, request_ladder_grab};
pub use arena::{Arena, Handle};
pub use collision::{
    ClimbFace, ClimbMask, PlaneHit, RawSurface, Surface, SurfaceRef, SurfaceSource, Vec3, find_ceiling, find_floor,
    find_wall, find_walls_multi, is_wall_climbable,
};
pub use input::{Controller, ControllerFrame, update_character_inputs};
pub use movement::refresh_floor_and_ceiling;
pub use state::{Animation, CharacterState, InputFlag, ParticleFlag, StateFlag};
pub use world::{ObjectHandle, SurfaceMesh, SurfaceView, TransformInput, ViewHandle, WorldModel};
