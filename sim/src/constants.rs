//! Gameplay tuning constants.
//!
//! Units: distances are world units, speeds are units per tick, angles are
//! turn units (0x10000 = full turn). Geometry query tolerances live in
//! `collision::settings`.

/// Downward acceleration applied every airborne tick.
pub const GRAVITY: f32 = 4.0;

/// Fastest downward speed reachable by falling.
pub const TERMINAL_VELOCITY: f32 = -75.0;

/// Vertical speed given by a single jump.
pub const JUMP_VELOCITY: f32 = 42.0;

/// Vertical speed given by a side flip.
pub const SIDE_FLIP_VELOCITY: f32 = 62.0;

/// Forward speed carried into a side flip.
pub const SIDE_FLIP_FORWARD_VELOCITY: f32 = 8.0;

/// Top walking speed at full stick deflection.
pub const WALK_MAX_SPEED: f32 = 32.0;

/// Per-tick speed gain while walking.
pub const WALK_ACCEL: f32 = 1.1;

/// Per-tick speed loss when the stick is released.
pub const WALK_DECEL: f32 = 2.0;

/// Per-tick facing turn rate while walking.
pub const WALK_TURN_SPEED: i16 = 0x800;

/// Per-tick facing turn rate while airborne.
pub const AIR_TURN_SPEED: i16 = 0x200;

/// Per-tick forward speed change from stick input while airborne.
pub const AIR_STEER_ACCEL: f32 = 1.5;

/// Forward speed cap while airborne.
pub const AIR_MAX_SPEED: f32 = 32.0;

/// Standing height of the character; ceilings closer than this block movement.
pub const CHARACTER_HEIGHT: f32 = 160.0;

/// Water level used until the host sets one (well below any playable floor).
pub const DEFAULT_WATER_LEVEL: f32 = -11000.0;

/// Depth below the water level at which any non-submerged action plunges.
pub const WATER_PLUNGE_DEPTH: f32 = 100.0;

/// Depth below the water level at which a submerged character surfaces.
pub const WATER_SURFACE_DEPTH: f32 = 80.0;

/// Depth below the water level that counts as "in water" for particles.
pub const IN_WATER_DEPTH: f32 = 10.0;

/// Per-tick vertical speed decay while submerged.
pub const WATER_DRAG: f32 = 0.95;

/// Slow sink speed while idle underwater.
pub const WATER_SINK_SPEED: f32 = -2.0;

/// Swim speed toward the stick direction while submerged.
pub const WATER_SWIM_SPEED: f32 = 12.0;

/// Health of a freshly created character (8 wedges).
pub const FULL_HEALTH: i16 = 0x880;

/// At or below this the character is dead.
pub const DEAD_HEALTH: i16 = 0xFF;

/// Health units per damage wedge.
pub const HEALTH_PER_WEDGE: i16 = 0x100;

/// Ticks of invincibility after taking damage.
pub const DAMAGE_INVINCIBILITY_TICKS: i16 = 30;

/// Falls longer than this cost 3 wedges on landing.
pub const FALL_DAMAGE_HEIGHT_LARGE: f32 = 3000.0;

/// Falls longer than this cost 1 wedge on landing.
pub const FALL_DAMAGE_HEIGHT_SMALL: f32 = 1150.0;

/// Raw stick yaw, either side of straight up, past which the stick counts
/// as held to that side for the turn gesture.
pub const TANK_TURN_MIN_ANGLE: i16 = 0x2000;

/// Upper bound for each turn-gesture counter.
pub const TANK_TURN_MAX_COUNT: u8 = 12;

/// Counter value at which a reversal of turning direction triggers a side flip.
pub const TANK_TURN_SIDE_FLIP_COUNT: u8 = 7;

/// Vertical sub-step budget per tick on a ladder.
pub const LADDER_CLIMB_SPEED: i32 = 4;

/// Sideways displacement per tick on a ladder.
pub const LADDER_SIDE_SPEED: f32 = 4.0;

/// Extra lookahead used for the wall search when moving sideways on a ladder.
pub const LADDER_SIDE_LIMIT: f32 = 30.0;

/// Lift applied when grabbing a ladder.
pub const LADDER_GRAB_LIFT: f32 = 120.0;

/// Descending stops when the feet would come within this many units of the floor.
pub const LADDER_FLOOR_MARGIN: f32 = 120.0;

/// Climbing stops when the head would come within this many units of the ceiling.
pub const LADDER_CEILING_MARGIN: f32 = CHARACTER_HEIGHT;

/// Vertical offset and radius of the per-step ladder wall search.
pub const LADDER_STEP_WALL_OFFSET: f32 = 1.0;
pub const LADDER_STEP_WALL_RADIUS: f32 = 10.0;

/// Reach in front of the character when looking for a ladder to grab.
pub const LADDER_GRAB_REACH: f32 = 60.0;
pub const LADDER_GRAB_WALL_OFFSET: f32 = 65.0;
pub const LADDER_GRAB_WALL_RADIUS: f32 = 80.0;

/// Backward nudge and maximum drop when letting go of a ladder.
pub const LADDER_RELEASE_PUSHBACK: f32 = 5.0;
pub const LADDER_RELEASE_DROP: f32 = 100.0;
pub const LADDER_RELEASE_FORWARD_VELOCITY: f32 = -2.0;

/// Animation playback rates (0x10000 = normal speed).
pub const LADDER_IDLE_ANIM_ACCEL: i32 = 0x10000;
pub const LADDER_MOVE_ANIM_ACCEL: i32 = 0x55000;

/// The synthetic world floor sits this far below the character.
pub const WORLD_FLOOR_DEPTH: f32 = 100000.0;

/// Half-width of the synthetic world floor square.
pub const WORLD_FLOOR_HALF_WIDTH: f32 = 1000.0;

/// Analog stick range after scaling host input.
pub const STICK_RANGE: f32 = 64.0;

/// Stick magnitudes below this are treated as centred.
pub const STICK_DEADZONE: f32 = 8.0;
