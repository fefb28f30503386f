//! Decision callback seam between the engine and whoever picks actions.
//!
//! The engine has no betting intelligence of its own. At every decision
//! point it hands a [`DecisionRequest`] to a [`DecisionPolicy`] and waits for
//! one action back. Rule-based bots, ML models and human front-ends all plug
//! in here.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::Card;
use crate::player::{PlayerAction, PlayerStatus};
use crate::rules::{LegalActions, Street};

/// Public information about one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: usize,
    pub stack: u32,
    pub street_contribution: u32,
    pub hand_contribution: u32,
    pub status: PlayerStatus,
}

/// Snapshot of everything visible to all players at a decision point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub street: Street,
    pub board: Vec<Card>,
    /// Chips committed so far this hand, all pots together
    pub pot: u32,
    pub bet_to_call: u32,
    pub last_raise_size: u32,
    pub button: usize,
    pub seats: Vec<SeatView>,
}

/// What a policy sees when asked to act.
#[derive(Debug, Clone, Copy)]
pub struct DecisionRequest<'a> {
    pub seat: usize,
    pub legal: &'a LegalActions,
    pub view: &'a TableView,
    /// The acting seat's own hole cards
    pub hole_cards: Option<[Card; 2]>,
}

/// Returned by a policy to stop the hand (timeouts, shutdown).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct AbortHand {
    pub reason: String,
}

impl AbortHand {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Chooses one action per decision point.
///
/// An action outside `request.legal` is rejected by the engine and the
/// policy is asked again for the same seat.
///
/// Plain functions and closures with the right signature are policies too:
///
/// ```
/// use holdem_engine::player::PlayerAction;
/// use holdem_engine::policy::{AbortHand, DecisionPolicy, DecisionRequest};
///
/// fn always_fold(_: &DecisionRequest<'_>) -> Result<PlayerAction, AbortHand> {
///     Ok(PlayerAction::Fold)
/// }
/// fn takes_policy(_: &mut dyn DecisionPolicy) {}
/// takes_policy(&mut always_fold);
/// ```
pub trait DecisionPolicy {
    fn decide(&mut self, request: &DecisionRequest<'_>) -> Result<PlayerAction, AbortHand>;
}

impl<F> DecisionPolicy for F
where
    F: FnMut(&DecisionRequest<'_>) -> Result<PlayerAction, AbortHand>,
{
    fn decide(&mut self, request: &DecisionRequest<'_>) -> Result<PlayerAction, AbortHand> {
        self(request)
    }
}

/// Checks when it can, calls otherwise. Never folds or raises.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassivePolicy;

impl DecisionPolicy for PassivePolicy {
    fn decide(&mut self, request: &DecisionRequest<'_>) -> Result<PlayerAction, AbortHand> {
        if request.legal.check {
            Ok(PlayerAction::Check)
        } else {
            Ok(PlayerAction::Call)
        }
    }
}

/// Replays a fixed list of actions in order, whoever is to act.
/// Aborts the hand once the script runs dry.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    script: VecDeque<PlayerAction>,
}

impl ScriptedPolicy {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            script: actions.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DecisionPolicy for ScriptedPolicy {
    fn decide(&mut self, request: &DecisionRequest<'_>) -> Result<PlayerAction, AbortHand> {
        self.script.pop_front().ok_or_else(|| {
            AbortHand::new(format!(
                "script exhausted at seat {} on {:?}",
                request.seat, request.view.street
            ))
        })
    }
}
