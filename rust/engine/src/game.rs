use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::errors::GameError;
use crate::logger::{format_hand_id, today_utc, HandRecord};
use crate::policy::DecisionPolicy;

/// A chair at the table and the chips in front of it between hands.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub stack: u32,
    pub sitting_out: bool,
}

impl Seat {
    pub fn new(stack: u32) -> Self {
        Self {
            stack,
            sitting_out: false,
        }
    }

    /// Will be dealt into the next hand.
    pub fn is_funded(&self) -> bool {
        !self.sitting_out && self.stack > 0
    }
}

/// Carries stacks and the button from one hand to the next.
///
/// Each hand gets its deck seed from the table's own ChaCha stream, so a
/// session replays exactly from the table seed.
#[derive(Debug, Clone)]
pub struct Table {
    seats: Vec<Seat>,
    button: usize,
    rng: ChaCha20Rng,
    date: String,
    hands_played: u32,
}

impl Table {
    pub fn new(stacks: impl IntoIterator<Item = u32>, seed: u64) -> Self {
        Self {
            seats: stacks.into_iter().map(Seat::new).collect(),
            button: 0,
            rng: ChaCha20Rng::seed_from_u64(seed),
            date: today_utc(),
            hands_played: 0,
        }
    }

    pub fn with_button(mut self, button: usize) -> Self {
        self.button = button;
        self
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn stacks(&self) -> Vec<u32> {
        self.seats.iter().map(|s| s.stack).collect()
    }
    pub fn button(&self) -> usize {
        self.button
    }
    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }

    pub fn funded_seats(&self) -> usize {
        self.seats.iter().filter(|s| s.is_funded()).count()
    }

    pub fn set_sitting_out(&mut self, seat: usize, sitting_out: bool) -> Result<(), GameError> {
        let s = self.seats.get_mut(seat).ok_or(GameError::UnknownSeat(seat))?;
        s.sitting_out = sitting_out;
        Ok(())
    }

    /// Plays the next hand and, only if it completes, stores the new stacks
    /// and moves the button. A failed or aborted hand leaves the table as it
    /// was, seed stream included.
    pub fn play_hand(
        &mut self,
        engine: &Engine,
        policy: &mut dyn DecisionPolicy,
    ) -> Result<HandRecord, GameError> {
        let mut rng = self.rng.clone();
        let seed: u64 = rng.random();
        let mut record = engine.play_hand(&self.seats, self.button, seed, policy)?;

        self.rng = rng;
        self.hands_played += 1;
        record.hand_id = format_hand_id(&self.date, self.hands_played);
        for (seat, &stack) in self.seats.iter_mut().zip(&record.final_stacks) {
            seat.stack = stack;
        }
        self.rotate_button();
        Ok(record)
    }

    /// Moves the button to the next funded seat clockwise.
    pub fn rotate_button(&mut self) {
        let n = self.seats.len();
        if let Some(next) = (1..=n)
            .map(|k| (self.button + k) % n)
            .find(|&s| self.seats[s].is_funded())
        {
            self.button = next;
        }
    }
}
