//! Build-time configuration.
//!
//! Nothing here changes at runtime; the game is picked with the `game-arc` and
//! `game-maze` cargo features and broker identity comes from the build
//! environment.

/// Physical LEDs on the ring.
pub const NUM_LEDS: usize = 28;
/// Positions on the virtual ring. Only the first [`NUM_LEDS`] are lit.
pub const RING_SIZE: usize = 2 * NUM_LEDS;
/// Bytes in a serialised frame (RGB per LED).
pub const FRAME_BYTES: usize = 3 * NUM_LEDS;

/// Cells per side of the occupancy grid.
pub const MAZE_SIZE: usize = 32;
/// World units per grid cell.
pub const TILE_SIZE: i32 = 300;
/// Largest valid world coordinate on either axis.
pub const WORLD_MAX: i32 = MAZE_SIZE as i32 * TILE_SIZE - 1;
/// Ray budget in world units.
pub const MAX_DIST: i32 = 300;
/// Ray march step in world units.
pub const RAY_STEP: usize = 2;

/// World units moved per tick while an input is held.
pub const PLAYER_SPEED: f32 = 30.0;
/// Initial pose, the centre of cell (1, 1).
pub const PLAYER_START: (i32, i32) = (TILE_SIZE + TILE_SIZE / 2, TILE_SIZE + TILE_SIZE / 2);

/// Fixed delay at the end of each tick.
pub const TICK_MS: u32 = 50;

pub const ARC_RADIUS_START: i32 = 300;
/// A round ends once the radius drops below this.
pub const ARC_RADIUS_MIN: i32 = 56;
pub const ARC_RADIUS_DECAY: i32 = 4;
pub const ARC_LENGTH_START: u8 = 3;
/// LED that must be covered by the arc before the round ends.
pub const TRAP_INDEX: usize = 13;
pub const ARC_GAMMA: f32 = 2.5;
pub const MAZE_GAMMA: f32 = 2.6;

pub const FLOURISH_CYCLES: u16 = 5;
/// Ticks spent in each half (on, off) of a flourish cycle, 300 ms at 50 ms a tick.
pub const FLOURISH_HALF_PERIOD_TICKS: u16 = 6;

/// Joystick readings below this count as pushed towards the low end.
pub const JOY_LOW: u16 = 16_384;
/// Joystick readings above this count as pushed towards the high end.
pub const JOY_HIGH: u16 = 49_152;

pub const CLIENT_ID_PREFIX: &str = "RingCompass";
/// Random suffix length appended to [`CLIENT_ID_PREFIX`].
pub const CLIENT_ID_SUFFIX_LEN: usize = 10;

const MQTT_USER: &str = match option_env!("RING_COMPASS_MQTT_USER") {
    Some(value) => value,
    None => "",
};
const MQTT_PASSWORD: &str = match option_env!("RING_COMPASS_MQTT_PASSWORD") {
    Some(value) => value,
    None => "",
};

/// Which game drives the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameKind {
    Compass,
    ArcTimer,
    Maze,
}

impl GameKind {
    /// The game selected by cargo features. `game-maze` wins over `game-arc`.
    pub const fn selected() -> Self {
        if cfg!(feature = "game-maze") {
            GameKind::Maze
        } else if cfg!(feature = "game-arc") {
            GameKind::ArcTimer
        } else {
            GameKind::Compass
        }
    }
}

/// Runtime view of the build-time settings.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub game: GameKind,
    /// Seed for the game PRNG. The firmware replaces it with hardware entropy.
    pub seed: u64,
    pub mqtt_user: &'static str,
    pub mqtt_password: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameKind::selected(),
            seed: 0x5eed_c0de,
            mqtt_user: MQTT_USER,
            mqtt_password: MQTT_PASSWORD,
        }
    }
}

impl Config {
    pub fn with_game(mut self, game: GameKind) -> Self {
        self.game = game;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
