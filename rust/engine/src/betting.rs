//! Per-street betting state machine.
//!
//! A [`BettingRound`] owns whose turn it is and which seats still owe a
//! decision. Chips move through the [`PotManager`]; legality comes from
//! [`crate::rules`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::GameError;
use crate::player::{ActionKind, Player, PlayerAction};
use crate::pot::PotManager;
use crate::rules::{legal_actions, validate_action, BetContext, LegalActions, Street, ValidatedAction};

/// An accepted action, as emitted to the hand record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub seat: usize,
    pub kind: ActionKind,
    /// Chips committed by this action
    pub amount: u32,
    pub street: Street,
    /// Street the hand moves to once this action is applied
    pub resulting_street: Street,
    pub all_in: bool,
}

/// State of one betting street.
///
/// `players` passed to every method must be indexed by seat.
#[derive(Debug, Clone)]
pub struct BettingRound {
    street: Street,
    bet_to_call: u32,
    last_raise_size: u32,
    to_act: Option<usize>,
    /// Seats that still owe a decision this street
    pending: BTreeSet<usize>,
    /// Pending seats that may only call or fold
    raise_closed: BTreeSet<usize>,
    last_aggressor: Option<usize>,
    num_seats: usize,
}

impl BettingRound {
    /// Opens a street. Action starts at the first seat after `first_after`
    /// (the big blind preflop, the button afterwards). Street contributions
    /// already on the table, such as blinds, set the bet-to-call.
    pub fn open(street: Street, players: &[Player], first_after: usize, big_blind: u32) -> Self {
        let bet_to_call = players
            .iter()
            .map(Player::street_contribution)
            .max()
            .unwrap_or(0);
        let actors: Vec<&Player> = players.iter().filter(|p| p.can_act()).collect();
        let pending: BTreeSet<usize> = if actors.len() >= 2 {
            actors.iter().map(|p| p.seat()).collect()
        } else {
            // a lone player only acts if still short of the bet
            actors
                .iter()
                .filter(|p| p.street_contribution() < bet_to_call)
                .map(|p| p.seat())
                .collect()
        };
        let mut round = Self {
            street,
            bet_to_call,
            last_raise_size: big_blind,
            to_act: None,
            pending,
            raise_closed: BTreeSet::new(),
            last_aggressor: None,
            num_seats: players.len(),
        };
        round.to_act = round.next_pending_after(first_after);
        debug!(?street, bet_to_call, to_act = ?round.to_act, "betting round opened");
        round
    }

    pub fn street(&self) -> Street {
        self.street
    }
    pub fn bet_to_call(&self) -> u32 {
        self.bet_to_call
    }
    pub fn last_raise_size(&self) -> u32 {
        self.last_raise_size
    }
    pub fn to_act(&self) -> Option<usize> {
        self.to_act
    }
    pub fn last_aggressor(&self) -> Option<usize> {
        self.last_aggressor
    }
    pub fn pending(&self) -> impl Iterator<Item = usize> + '_ {
        self.pending.iter().copied()
    }

    pub fn is_complete(&self) -> bool {
        self.to_act.is_none()
    }

    pub fn context(&self, player: &Player) -> BetContext {
        BetContext {
            bet_to_call: self.bet_to_call,
            contribution: player.street_contribution(),
            stack: player.stack(),
            last_raise_size: self.last_raise_size,
            raise_closed: self.raise_closed.contains(&player.seat()),
        }
    }

    /// Legal set for the seat whose turn it is, if any.
    pub fn legal_actions(&self, players: &[Player]) -> Option<LegalActions> {
        let seat = self.to_act?;
        let player = players.get(seat)?;
        Some(legal_actions(seat, &self.context(player)))
    }

    /// Validates and applies `action` for `seat`.
    ///
    /// On error nothing changes: not the round, not the stacks, not the pot.
    pub fn apply(
        &mut self,
        seat: usize,
        action: PlayerAction,
        players: &mut [Player],
        pot: &mut PotManager,
    ) -> Result<ActionEvent, GameError> {
        if self.to_act != Some(seat) {
            return Err(GameError::ActionOutOfTurn {
                expected: self.to_act,
                actual: seat,
            });
        }
        let ctx = {
            let player = players.get(seat).ok_or(GameError::UnknownSeat(seat))?;
            self.context(player)
        };
        let validated = validate_action(seat, action, &ctx)?;

        let (amount, reopened) = {
            let player = &mut players[seat];
            match validated {
                ValidatedAction::Fold => {
                    player.fold();
                    pot.fold(seat);
                    (0, None)
                }
                ValidatedAction::Check => (0, None),
                ValidatedAction::Call(chips) => {
                    pot.commit(player, chips)?;
                    (chips, None)
                }
                ValidatedAction::Raise { to, commit, full } => {
                    pot.commit(player, commit)?;
                    let raise_by = to - self.bet_to_call;
                    self.bet_to_call = to;
                    self.last_aggressor = Some(seat);
                    if full {
                        self.last_raise_size = raise_by;
                    }
                    (commit, Some(full))
                }
            }
        };

        match reopened {
            Some(true) => {
                self.raise_closed.clear();
                self.pending = players
                    .iter()
                    .filter(|p| p.can_act() && p.seat() != seat)
                    .map(Player::seat)
                    .collect();
            }
            Some(false) => {
                // short all-in: whoever already acted must answer, but cannot re-raise
                for p in players.iter().filter(|p| p.can_act() && p.seat() != seat) {
                    if self.pending.insert(p.seat()) {
                        self.raise_closed.insert(p.seat());
                    }
                }
            }
            None => {}
        }
        self.pending.remove(&seat);
        self.raise_closed.remove(&seat);
        self.prune(players);
        self.to_act = self.next_pending_after(seat);

        let player = &players[seat];
        let resulting_street = if self.is_complete() {
            self.next_street(players)
        } else {
            self.street
        };
        let event = ActionEvent {
            seat,
            kind: action.kind(),
            amount,
            street: self.street,
            resulting_street,
            all_in: amount > 0 && player.stack() == 0,
        };
        debug!(seat, %action, amount, to_act = ?self.to_act, "action applied");
        Ok(event)
    }

    /// Street that follows this one once it is complete. Skips straight to
    /// Showdown when nobody is left to bet against.
    pub fn next_street(&self, players: &[Player]) -> Street {
        let in_hand = players.iter().filter(|p| p.in_hand()).count();
        let can_act = players.iter().filter(|p| p.can_act()).count();
        if in_hand <= 1 || can_act <= 1 {
            Street::Showdown
        } else {
            self.street.next()
        }
    }

    /// Drops decisions that can no longer change anything.
    fn prune(&mut self, players: &[Player]) {
        let in_hand = players.iter().filter(|p| p.in_hand()).count();
        if in_hand <= 1 {
            self.pending.clear();
            return;
        }
        let lone_actor = players.iter().filter(|p| p.can_act()).count() <= 1;
        let bet = self.bet_to_call;
        self.pending.retain(|&s| {
            players.get(s).is_some_and(|p| {
                p.can_act() && (!lone_actor || p.street_contribution() < bet)
            })
        });
        self.raise_closed.retain(|s| self.pending.contains(s));
    }

    fn next_pending_after(&self, from: usize) -> Option<usize> {
        let n = self.num_seats.max(1);
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|s| self.pending.contains(s))
    }
}
