use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// A 52-card deck consumed front to back.
///
/// The order is fixed by the seed: the shuffle is a Fisher–Yates pass driven
/// by a ChaCha20 stream, so the same seed always deals the same cards.
///
/// ```
/// use holdem_engine::deck::Deck;
///
/// let mut a = Deck::new(42);
/// let mut b = Deck::new(42);
/// assert_eq!(a.deal(5).unwrap(), b.deal(5).unwrap());
/// assert_eq!(a.remaining(), 47);
/// ```
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
}

/// Shorthand for [`Deck::new`].
pub fn new_deck(seed: u64) -> Deck {
    Deck::new(seed)
}

impl Deck {
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut cards = full_deck();
        cards.shuffle(&mut rng);
        Self { cards, position: 0 }
    }

    /// Builds a deck that deals `cards` in the given order.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, GameError> {
        let mut seen = HashSet::with_capacity(cards.len());
        for c in &cards {
            if !seen.insert(*c) {
                return Err(GameError::DuplicateCard(c.to_string()));
            }
        }
        Ok(Self { cards, position: 0 })
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Removes `n` cards from the front. Nothing is consumed on failure.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(GameError::DeckExhausted {
                requested: n,
                remaining,
            });
        }
        let out = self.cards[self.position..self.position + n].to_vec();
        self.position += n;
        Ok(out)
    }

    pub fn burn(&mut self) -> Result<(), GameError> {
        self.deal(1).map(|_| ())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}
