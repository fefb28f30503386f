use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{rank_letter, Card};
use crate::errors::GameError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    /// Number of significant tie-break ranks for this category.
    pub fn tiebreak_len(self) -> usize {
        match self {
            Category::StraightFlush | Category::Straight => 1,
            Category::FourOfAKind | Category::FullHouse => 2,
            Category::ThreeOfAKind | Category::TwoPair => 3,
            Category::OnePair => 4,
            Category::Flush | Category::HighCard => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

/// Totally ordered strength of a hand.
///
/// The derived ordering compares `category` first, then `kickers`
/// lexicographically. Kickers are ordered high to low and zero-padded past
/// [`Category::tiebreak_len`], so padding never decides a comparison.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct HandRank {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

impl HandRank {
    fn new(category: Category, key: &[u8]) -> Self {
        let mut kickers = [0u8; 5];
        for (slot, &r) in kickers.iter_mut().zip(key) {
            *slot = r;
        }
        Self { category, kickers }
    }

    pub fn tiebreak(&self) -> &[u8] {
        &self.kickers[..self.category.tiebreak_len()]
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.category.name())?;
        for (i, &r) in self.tiebreak().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", rank_letter(r))?;
        }
        write!(f, ")")
    }
}

/// Ranks the best five-card hand contained in 5 to 7 distinct cards.
///
/// ```
/// use holdem_engine::cards::parse_cards;
/// use holdem_engine::hand::{evaluate, Category};
///
/// let wheel = evaluate(&parse_cards("As 2d 3c 4h 5s Kd 9c").unwrap()).unwrap();
/// assert_eq!(wheel.category, Category::Straight);
/// assert_eq!(wheel.tiebreak(), &[5]);
/// ```
pub fn evaluate(cards: &[Card]) -> Result<HandRank, GameError> {
    check_card_set(cards)?;

    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut rank_mask: u16 = 0;
    let mut suit_masks = [0u16; 4];
    for c in cards {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        suit_masks[c.suit.index()] |= 1 << r;
    }

    let flush_mask = suit_masks.iter().copied().find(|m| m.count_ones() >= 5);

    if let Some(mask) = flush_mask {
        if let Some(high) = straight_high_from_mask(mask) {
            return Ok(HandRank::new(Category::StraightFlush, &[high]));
        }
    }

    let ranks_with = |n: u8| -> Vec<u8> {
        (2..=14u8)
            .rev()
            .filter(|&r| rank_counts[r as usize] == n)
            .collect()
    };
    let quads = ranks_with(4);
    let trips = ranks_with(3);
    let pairs = ranks_with(2);

    if let Some(&quad) = quads.first() {
        let kicker = top_ranks(&rank_counts, &[quad], 1);
        return Ok(HandRank::new(Category::FourOfAKind, &[quad, kicker[0]]));
    }

    if let Some(&trip) = trips.first() {
        // a second set of trips plays as the pair
        let pair = trips.get(1).copied().max(pairs.first().copied());
        if let Some(pair) = pair {
            return Ok(HandRank::new(Category::FullHouse, &[trip, pair]));
        }
    }

    if let Some(mask) = flush_mask {
        let top: Vec<u8> = (2..=14u8)
            .rev()
            .filter(|&r| mask & (1 << r) != 0)
            .take(5)
            .collect();
        return Ok(HandRank::new(Category::Flush, &top));
    }

    if let Some(high) = straight_high_from_mask(rank_mask) {
        return Ok(HandRank::new(Category::Straight, &[high]));
    }

    if let Some(&trip) = trips.first() {
        let mut key = vec![trip];
        key.extend(top_ranks(&rank_counts, &[trip], 2));
        return Ok(HandRank::new(Category::ThreeOfAKind, &key));
    }

    if pairs.len() >= 2 {
        let (high, low) = (pairs[0], pairs[1]);
        let mut key = vec![high, low];
        key.extend(top_ranks(&rank_counts, &[high, low], 1));
        return Ok(HandRank::new(Category::TwoPair, &key));
    }

    if let Some(&pair) = pairs.first() {
        let mut key = vec![pair];
        key.extend(top_ranks(&rank_counts, &[pair], 3));
        return Ok(HandRank::new(Category::OnePair, &key));
    }

    Ok(HandRank::new(
        Category::HighCard,
        &top_ranks(&rank_counts, &[], 5),
    ))
}

pub fn compare_hands(a: &HandRank, b: &HandRank) -> Ordering {
    a.cmp(b)
}

/// Reference evaluator: classifies every 5-card subset directly and keeps the
/// best. Much slower than [`evaluate`] but shares none of its logic.
pub fn evaluate_exhaustive(cards: &[Card]) -> Result<HandRank, GameError> {
    check_card_set(cards)?;
    let n = cards.len();
    let mut best: Option<HandRank> = None;
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    for e in d + 1..n {
                        let hand = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let rank = evaluate_five(&hand);
                        match best {
                            Some(b) if b >= rank => {}
                            _ => best = Some(rank),
                        }
                    }
                }
            }
        }
    }
    best.ok_or(GameError::InvalidCardCount(n))
}

fn evaluate_five(cards: &[Card; 5]) -> HandRank {
    let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));
    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);

    let mut unique = ranks.clone();
    unique.dedup();
    let straight_high = if unique.len() == 5 && ranks[0] - ranks[4] == 4 {
        Some(ranks[0])
    } else if ranks == [14, 5, 4, 3, 2] {
        Some(5)
    } else {
        None
    };

    // (count, rank) groups, biggest group first, then highest rank
    let mut groups: Vec<(u8, u8)> = unique
        .iter()
        .map(|&r| (ranks.iter().filter(|&&x| x == r).count() as u8, r))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));
    let by_group: Vec<u8> = groups.iter().map(|g| g.1).collect();

    match (is_flush, straight_high, groups[0].0, groups.get(1).map(|g| g.0)) {
        (true, Some(high), _, _) => HandRank::new(Category::StraightFlush, &[high]),
        (_, _, 4, _) => HandRank::new(Category::FourOfAKind, &by_group),
        (_, _, 3, Some(2)) => HandRank::new(Category::FullHouse, &by_group),
        (true, None, _, _) => HandRank::new(Category::Flush, &ranks),
        (false, Some(high), _, _) => HandRank::new(Category::Straight, &[high]),
        (_, _, 3, _) => HandRank::new(Category::ThreeOfAKind, &by_group),
        (_, _, 2, Some(2)) => HandRank::new(Category::TwoPair, &by_group),
        (_, _, 2, _) => HandRank::new(Category::OnePair, &by_group),
        _ => HandRank::new(Category::HighCard, &ranks),
    }
}

fn check_card_set(cards: &[Card]) -> Result<(), GameError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(GameError::InvalidCardCount(cards.len()));
    }
    let mut seen: u64 = 0;
    for c in cards {
        let bit = 1u64 << (c.suit.index() * 16 + c.rank.value() as usize);
        if seen & bit != 0 {
            return Err(GameError::DuplicateCard(c.to_string()));
        }
        seen |= bit;
    }
    Ok(())
}

/// Highest `n` ranks present, skipping `exclude`, high to low.
fn top_ranks(rank_counts: &[u8; 15], exclude: &[u8], n: usize) -> Vec<u8> {
    (2..=14u8)
        .rev()
        .filter(|r| rank_counts[*r as usize] > 0 && !exclude.contains(r))
        .take(n)
        .collect()
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    let mut m = mask;
    // Ace also plays low
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    // Sliding 5-bit window from Ace(14) down to 5
    (5..=14u8).rev().find(|&high| {
        let window = 0b1_1111u16 << (high - 4);
        m & window == window
    })
}
