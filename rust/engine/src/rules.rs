use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::PlayerAction as A;

/// Represents a betting street in Texas Hold'em poker.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    /// Before flop (hole cards dealt)
    Preflop,
    /// After flop (3 community cards)
    Flop,
    /// After turn (4th community card)
    Turn,
    /// After river (5th community card)
    River,
    /// Hands are compared; no more betting
    Showdown,
}

impl Street {
    /// Next street in order. Showdown stays at Showdown.
    pub fn next(self) -> Street {
        match self {
            Street::Preflop => Street::Flop,
            Street::Flop => Street::Turn,
            Street::Turn => Street::River,
            Street::River | Street::Showdown => Street::Showdown,
        }
    }

    /// Community cards dealt when this street opens.
    pub fn cards_to_deal(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Preflop | Street::Showdown => 0,
        }
    }
}

/// Betting situation of the player about to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetContext {
    /// Highest street contribution at the table (`B`)
    pub bet_to_call: u32,
    /// The player's street contribution so far (`c`)
    pub contribution: u32,
    /// The player's remaining stack (`s`)
    pub stack: u32,
    /// Size of the last full raise this street
    pub last_raise_size: u32,
    /// Set when only a short all-in raise happened since the player last acted
    pub raise_closed: bool,
}

/// Raise-to bounds, both inclusive. `max` is always the all-in amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaiseRange {
    pub min: u32,
    pub max: u32,
}

/// Everything the acting seat may do at a decision point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalActions {
    pub seat: usize,
    /// Always true; folding with nothing to call forfeits voluntarily
    pub fold: bool,
    pub check: bool,
    /// Chips a call would commit (less than owed when it puts the player all-in)
    pub call: Option<u32>,
    pub raise: Option<RaiseRange>,
}

impl LegalActions {
    pub fn allows(&self, action: &A) -> bool {
        match *action {
            A::Fold => self.fold,
            A::Check => self.check,
            A::Call => self.call.is_some(),
            A::Raise(to) => self
                .raise
                .is_some_and(|r| (r.min..=r.max).contains(&to)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips to commit
    Call(u32),
    Raise {
        /// New bet-to-call
        to: u32,
        /// Chips to commit
        commit: u32,
        /// Meets the minimum raise, so it reopens the action
        full: bool,
    },
}

pub fn legal_actions(seat: usize, ctx: &BetContext) -> LegalActions {
    let owed = ctx.bet_to_call.saturating_sub(ctx.contribution);
    let raise = if !ctx.raise_closed && ctx.stack > owed {
        let max = ctx.contribution + ctx.stack;
        let min = ctx.bet_to_call.saturating_add(ctx.last_raise_size).min(max);
        Some(RaiseRange { min, max })
    } else {
        None
    };
    LegalActions {
        seat,
        fold: true,
        check: owed == 0,
        call: (owed > 0).then(|| owed.min(ctx.stack)),
        raise,
    }
}

/// Validates a player action against the betting rules.
///
/// # Errors
///
/// [`GameError::IllegalAction`] with a reason when the action is outside
/// the legal set for `ctx`. Nothing is changed on error.
///
/// # Examples
///
/// ```
/// use holdem_engine::errors::GameError;
/// use holdem_engine::player::PlayerAction;
/// use holdem_engine::rules::{validate_action, BetContext, ValidatedAction};
///
/// let ctx = BetContext {
///     bet_to_call: 20,
///     contribution: 10,
///     stack: 990,
///     last_raise_size: 20,
///     raise_closed: false,
/// };
/// assert_eq!(validate_action(0, PlayerAction::Call, &ctx), Ok(ValidatedAction::Call(10)));
/// assert!(matches!(
///     validate_action(0, PlayerAction::Check, &ctx),
///     Err(GameError::IllegalAction { .. })
/// ));
/// // below the minimum raise of 20 and not all-in
/// assert!(validate_action(0, PlayerAction::Raise(30), &ctx).is_err());
/// ```
pub fn validate_action(
    seat: usize,
    action: A,
    ctx: &BetContext,
) -> Result<ValidatedAction, GameError> {
    let illegal = |reason: String| GameError::IllegalAction {
        seat,
        action,
        reason,
    };
    let owed = ctx.bet_to_call.saturating_sub(ctx.contribution);
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if owed == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(illegal(format!("cannot check facing {} to call", owed)))
            }
        }
        A::Call => {
            if owed == 0 {
                Err(illegal("nothing to call".to_string()))
            } else {
                Ok(ValidatedAction::Call(owed.min(ctx.stack)))
            }
        }
        A::Raise(to) => {
            let all_in_to = ctx.contribution + ctx.stack;
            if ctx.raise_closed {
                Err(illegal(
                    "raising is closed after a short all-in raise".to_string(),
                ))
            } else if ctx.stack <= owed {
                Err(illegal(format!(
                    "stack {} cannot cover more than a call",
                    ctx.stack
                )))
            } else if to <= ctx.bet_to_call {
                Err(illegal(format!(
                    "raise must exceed the bet of {}",
                    ctx.bet_to_call
                )))
            } else if to > all_in_to {
                Err(illegal(format!("cannot raise beyond all-in at {}", all_in_to)))
            } else if to - ctx.bet_to_call < ctx.last_raise_size && to != all_in_to {
                Err(illegal(format!(
                    "minimum raise is to {}",
                    ctx.bet_to_call.saturating_add(ctx.last_raise_size)
                )))
            } else {
                Ok(ValidatedAction::Raise {
                    to,
                    commit: to - ctx.contribution,
                    full: to - ctx.bet_to_call >= ctx.last_raise_size,
                })
            }
        }
    }
}
