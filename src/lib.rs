//! Flower Farm - A timed grid-clicking arcade game
//!
//! Core modules:
//! - `sim`: Item-lifecycle simulation (grid, spawning, behaviors, scoring, session)
//! - `settings`: Difficulty selection, viewport layout, persisted preferences
//! - `highscores`: Local leaderboard and score-submission wire types
//! - `error`: Typed errors for the fallible operations

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::{GridError, SessionError, SubmissionError};
pub use highscores::{HighScores, ScoreSubmission};
pub use settings::{DifficultyPreset, LayoutClass, Settings};

/// Game tuning constants (all durations in milliseconds)
pub mod consts {
    /// Countdown tick interval (1 Hz)
    pub const COUNTDOWN_INTERVAL_MS: u64 = 1_000;
    /// Combo-timeout poll interval (10 Hz)
    pub const COMBO_POLL_INTERVAL_MS: u64 = 100;
    /// A streak decays if no good click lands within this window
    pub const COMBO_TIMEOUT_MS: u64 = 3_000;
    /// Elapsed time per progressive difficulty level
    pub const DIFFICULTY_STEP_MS: u64 = 10_000;

    /// Butterfly relocation period
    pub const BUTTERFLY_MOVE_INTERVAL_MS: u64 = 2_000;
    /// Weed self-propagation period
    pub const WEED_SPREAD_INTERVAL_MS: u64 = 5_000;
    /// Lifetime window of a weed grown by spreading
    pub const WEED_OFFSHOOT_LIFETIME_MS: (u64, u64) = (8_000, 12_000);
    /// Bomb fuse window (overrides the difficulty lifetime)
    pub const BOMB_FUSE_MS: (u64, u64) = (3_000, 5_000);
    /// Golden items live for a fraction of a normal lifetime
    pub const GOLDEN_LIFETIME_SCALE: (f64, f64) = (0.5, 0.6);
    /// Regular items live longer on small touch screens
    pub const MOBILE_LIFETIME_SCALE: f64 = 1.3;

    /// Progression floors/ceiling
    pub const MIN_SPAWN_DELAY_MS: u64 = 100;
    pub const MIN_LIFETIME_MS: u64 = 500;
    pub const MAX_CATERPILLAR_RATIO: f64 = 0.8;

    /// Weeds stop spreading once they fill this share of the grid
    pub const WEED_POPULATION_CAP_RATIO: f64 = 0.5;

    /// Grid top edge in screen space (px)
    pub const GRID_TOP_PX: f32 = 100.0;
}
