//! Error types for the fallible operations of the game core

use thiserror::Error;

use crate::sim::{Cell, GamePhase};

/// Grid placement failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("slot {cell} is already occupied")]
    SlotOccupied { cell: Cell },
    #[error("slot {cell} is outside the grid")]
    OutOfBounds { cell: Cell },
    #[error("items can only be placed during an active session (currently {phase:?})")]
    Inactive { phase: GamePhase },
}

/// Rejected session commands (state is left untouched)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("unknown difficulty `{0}` (expected easy, normal or hard)")]
    UnknownDifficulty(String),
    #[error("a session can only start from idle (currently {0:?})")]
    NotIdle(GamePhase),
}

/// Invalid leaderboard submissions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("initials must be exactly 3 letters, got `{0}`")]
    InvalidInitials(String),
}
