//! Chip ledger for one hand: commitments, side-pot layering and settlement.
//!
//! Pots are never stored. They are rebuilt from per-seat contributions and
//! a sorted list of contribution thresholds, so any number of all-ins at
//! different amounts on the same street layers correctly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::hand::HandRank;
use crate::player::{Player, PlayerStatus};

/// One pot layer: its chips and the seats that can win them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: u32,
    pub eligible: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub seat: usize,
    pub amount: u32,
    pub pot_index: usize,
}

/// Outcome of [`PotManager::settle`], already credited to the stacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settlement {
    pub pots: Vec<Pot>,
    pub payouts: Vec<Payout>,
}

impl Settlement {
    pub fn total_paid(&self) -> u32 {
        self.payouts.iter().map(|p| p.amount).sum()
    }

    pub fn won_by(&self, seat: usize) -> u32 {
        self.payouts
            .iter()
            .filter(|p| p.seat == seat)
            .map(|p| p.amount)
            .sum()
    }
}

#[derive(Debug, Clone)]
pub struct PotManager {
    contributions: Vec<u32>,
    folded: Vec<bool>,
    button: usize,
}

impl PotManager {
    pub fn new(num_seats: usize, button: usize) -> Self {
        Self {
            contributions: vec![0; num_seats],
            folded: vec![false; num_seats],
            button,
        }
    }

    /// Moves `amount` from the player's stack into the pot as a live bet.
    pub fn commit(&mut self, player: &mut Player, amount: u32) -> Result<(), GameError> {
        self.transfer(player, amount)?;
        player.street_contribution += amount;
        Ok(())
    }

    /// Like [`commit`](Self::commit) but the chips do not count toward the
    /// street's bet (antes).
    pub fn commit_dead(&mut self, player: &mut Player, amount: u32) -> Result<(), GameError> {
        self.transfer(player, amount)
    }

    fn transfer(&mut self, player: &mut Player, amount: u32) -> Result<(), GameError> {
        let seat = player.seat();
        if amount > player.stack {
            return Err(GameError::InsufficientStack {
                seat,
                requested: amount,
                available: player.stack,
            });
        }
        // every later pot sum is bounded by this total
        let total = u64::from(self.total()) + u64::from(amount);
        if total > u64::from(u32::MAX) {
            return Err(GameError::ChipOverflow { total });
        }
        if seat >= self.contributions.len() {
            self.contributions.resize(seat + 1, 0);
            self.folded.resize(seat + 1, false);
        }
        player.stack -= amount;
        player.hand_contribution += amount;
        self.contributions[seat] += amount;

        if player.stack == 0 && player.status == PlayerStatus::Active {
            player.status = PlayerStatus::AllIn;
        }
        Ok(())
    }

    pub fn fold(&mut self, seat: usize) {
        if let Some(f) = self.folded.get_mut(seat) {
            *f = true;
        }
    }

    pub fn total(&self) -> u32 {
        self.contributions.iter().sum()
    }

    pub fn contribution(&self, seat: usize) -> u32 {
        self.contributions.get(seat).copied().unwrap_or(0)
    }

    /// Main pot first, then side pots in ascending all-in order.
    ///
    /// Thresholds are the distinct contribution levels of players still in
    /// the hand, rebuilt on every call. Layer `(prev, t]` collects what each
    /// player put in between the two levels and is eligible to the live
    /// players who reached `t`. Chips folded above the highest live level
    /// join the last pot.
    pub fn pots(&self) -> Vec<Pot> {
        let live: Vec<usize> = (0..self.contributions.len())
            .filter(|&s| !self.folded[s])
            .collect();
        let mut levels: Vec<u32> = live
            .iter()
            .map(|&s| self.contributions[s])
            .filter(|&c| c > 0)
            .collect();
        levels.sort_unstable();
        levels.dedup();

        let mut pots: Vec<Pot> = Vec::new();
        let mut prev = 0u32;
        for level in levels {
            let amount: u32 = self
                .contributions
                .iter()
                .map(|&c| c.min(level) - c.min(prev))
                .sum();
            let eligible: Vec<usize> = live
                .iter()
                .copied()
                .filter(|&s| self.contributions[s] >= level)
                .collect();
            prev = level;
            match pots.last_mut() {
                Some(last) if last.eligible == eligible => last.amount += amount,
                _ => pots.push(Pot { amount, eligible }),
            }
        }

        let layered: u32 = pots.iter().map(|p| p.amount).sum();
        let leftover = self.total() - layered;
        if leftover > 0 {
            match pots.last_mut() {
                Some(last) => last.amount += leftover,
                None => pots.push(Pot {
                    amount: leftover,
                    eligible: live,
                }),
            }
        }
        pots
    }

    /// Awards every pot to its best eligible hand(s) and credits the stacks.
    ///
    /// A pot with a single eligible seat needs no rank. Ties split evenly and
    /// the odd chips go to the tied seat closest clockwise to the button's
    /// left. Stacks are only touched once every payout is known.
    pub fn settle(
        &self,
        players: &mut [Player],
        showdown_ranks: &BTreeMap<usize, HandRank>,
    ) -> Result<Settlement, GameError> {
        let pots = self.pots();
        let mut payouts = Vec::new();

        for (pot_index, pot) in pots.iter().enumerate() {
            if pot.eligible.is_empty() {
                return Err(GameError::NotEnoughPlayers { found: 0 });
            }
            let mut winners = if pot.eligible.len() == 1 {
                pot.eligible.clone()
            } else {
                let mut best: Option<HandRank> = None;
                let mut winners = Vec::new();
                for &seat in &pot.eligible {
                    let rank = *showdown_ranks
                        .get(&seat)
                        .ok_or(GameError::MissingShowdownRank { seat, pot_index })?;
                    match best {
                        Some(b) if rank < b => {}
                        Some(b) if rank == b => winners.push(seat),
                        _ => {
                            best = Some(rank);
                            winners = vec![seat];
                        }
                    }
                }
                winners
            };
            winners.sort_by_key(|&seat| self.distance_from_button(seat));

            let count = winners.len() as u32;
            let share = pot.amount / count;
            let odd = pot.amount % count;
            for (i, &seat) in winners.iter().enumerate() {
                let amount = if i == 0 { share + odd } else { share };
                if amount > 0 {
                    payouts.push(Payout {
                        seat,
                        amount,
                        pot_index,
                    });
                }
            }
        }

        let mut credited: BTreeMap<usize, u32> = BTreeMap::new();
        for p in &payouts {
            let current = match credited.get(&p.seat) {
                Some(&stack) => stack,
                None => players
                    .iter()
                    .find(|pl| pl.seat() == p.seat)
                    .ok_or(GameError::UnknownSeat(p.seat))?
                    .stack,
            };
            let stack = current
                .checked_add(p.amount)
                .ok_or(GameError::ChipOverflow {
                    total: u64::from(current) + u64::from(p.amount),
                })?;
            credited.insert(p.seat, stack);
        }
        for player in players.iter_mut() {
            if let Some(&stack) = credited.get(&player.seat()) {
                player.stack = stack;
            }
        }

        Ok(Settlement { pots, payouts })
    }

    /// 0 for the seat left of the button, increasing clockwise.
    fn distance_from_button(&self, seat: usize) -> usize {
        let n = self.contributions.len().max(1);
        (seat + n - (self.button % n) - 1) % n
    }
}
