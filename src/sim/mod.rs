//! Simulation module
//!
//! All gameplay logic lives here:
//! - Virtual millisecond clock, advanced only by `tick`
//! - Every scheduled action re-checks item identity before acting
//! - No rendering or platform dependencies; hosts consume `GameEvent`s

pub mod behavior;
pub mod click;
pub mod combo;
pub mod difficulty;
pub mod grid;
pub mod item;
pub mod schedule;
pub mod spawner;
pub mod state;
pub mod tick;

pub use click::{ClickOutcome, GridLayout, HitTest, click_cell, resolve_click};
pub use combo::{ComboState, multiplier_for_streak};
pub use difficulty::{DifficultySettings, MsRange, Progression, level_for_elapsed};
pub use grid::{Cell, Grid};
pub use item::{Item, ItemId, ItemKind, ItemStore};
pub use schedule::{Scheduler, TimerAction, TimerId};
pub use state::{GameEvent, GamePhase, GameState, RemovalReason, SessionSummary};
pub use tick::tick;
