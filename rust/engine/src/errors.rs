use thiserror::Error;

use crate::player::PlayerAction;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Deck exhausted: requested {requested} card(s), {remaining} remaining")]
    DeckExhausted { requested: usize, remaining: usize },
    #[error("Insufficient stack for seat {seat}: requested {requested}, available {available}")]
    InsufficientStack {
        seat: usize,
        requested: u32,
        available: u32,
    },
    #[error("Illegal action {action:?} by seat {seat}: {reason}")]
    IllegalAction {
        seat: usize,
        action: PlayerAction,
        reason: String,
    },
    #[error("It's not seat {actual}'s turn (expected seat {expected:?})")]
    ActionOutOfTurn {
        expected: Option<usize>,
        actual: usize,
    },
    #[error("Hand evaluation needs 5 to 7 cards, got {0}")]
    InvalidCardCount(usize),
    #[error("Duplicate card {0}")]
    DuplicateCard(String),
    #[error("Invalid card text: {0:?}")]
    InvalidCard(String),
    #[error("No showdown rank for seat {seat} contesting pot {pot_index}")]
    MissingShowdownRank { seat: usize, pot_index: usize },
    #[error("No player sits at seat {0}")]
    UnknownSeat(usize),
    #[error("Need at least 2 funded players, found {found}")]
    NotEnoughPlayers { found: usize },
    #[error("Hand aborted: {reason}")]
    HandAborted { reason: String },
    #[error("Chip total {total} does not fit the table ledger")]
    ChipOverflow { total: u64 },
    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),
}

impl GameError {
    /// Betting errors the decision-maker can recover from by resubmitting.
    /// Everything else leaves the hand in an unusable state.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GameError::InsufficientStack { .. } | GameError::IllegalAction { .. }
        )
    }
}
