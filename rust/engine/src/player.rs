use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Where a player stands within the current hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Dealt in and still able to make decisions
    Active,
    /// Gave up the hand; ineligible for every pot
    Folded,
    /// Committed the whole stack; no further decisions this hand
    AllIn,
    /// Not dealt into this hand
    SittingOut,
}

/// A player decision during a betting round.
///
/// `Raise` carries the total street contribution the player raises *to*.
/// An opening bet is a raise from a bet-to-call of zero.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Pass without committing chips (only when nothing is owed)
    Check,
    /// Match the current bet-to-call, or go all-in trying
    Call,
    /// Raise the bet-to-call to the given street total
    Raise(u32),
}

impl PlayerAction {
    pub fn kind(self) -> ActionKind {
        match self {
            PlayerAction::Fold => ActionKind::Fold,
            PlayerAction::Check => ActionKind::Check,
            PlayerAction::Call => ActionKind::Call,
            PlayerAction::Raise(_) => ActionKind::Raise,
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Fold => write!(f, "fold"),
            PlayerAction::Check => write!(f, "check"),
            PlayerAction::Call => write!(f, "call"),
            PlayerAction::Raise(to) => write!(f, "raise to {}", to),
        }
    }
}

/// Action kinds as they appear in hand records.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
}

/// Represents a seated player for the duration of one hand.
/// Chip movement goes through [`crate::pot::PotManager`]; everything else is
/// read-only from outside the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Seat index around the table (clockwise)
    seat: usize,
    /// Chips not yet committed to the pot
    pub(crate) stack: u32,
    /// Hole cards, once dealt
    hole: Option<[Card; 2]>,
    /// Chips committed on the current street
    pub(crate) street_contribution: u32,
    /// Chips committed over the whole hand, antes included
    pub(crate) hand_contribution: u32,
    pub(crate) status: PlayerStatus,
}

impl Player {
    pub fn new(seat: usize, stack: u32) -> Self {
        Self {
            seat,
            stack,
            hole: None,
            street_contribution: 0,
            hand_contribution: 0,
            status: PlayerStatus::Active,
        }
    }

    pub fn sitting_out(seat: usize, stack: u32) -> Self {
        Self {
            status: PlayerStatus::SittingOut,
            ..Self::new(seat, stack)
        }
    }

    pub fn seat(&self) -> usize {
        self.seat
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn status(&self) -> PlayerStatus {
        self.status
    }
    pub fn street_contribution(&self) -> u32 {
        self.street_contribution
    }
    pub fn hand_contribution(&self) -> u32 {
        self.hand_contribution
    }

    pub fn hole_cards(&self) -> Option<[Card; 2]> {
        self.hole
    }

    pub fn deal_hole(&mut self, cards: [Card; 2]) {
        self.hole = Some(cards);
    }

    /// Still contesting the pot (active or all-in).
    pub fn in_hand(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    /// Still has decisions to make.
    pub fn can_act(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    pub(crate) fn fold(&mut self) {
        self.status = PlayerStatus::Folded;
    }

    pub(crate) fn reset_street(&mut self) {
        self.street_contribution = 0;
    }
}
