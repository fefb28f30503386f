use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::betting::BettingRound;
use crate::cards::Card;
use crate::config::TableConfig;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::game::Seat;
use crate::hand::{evaluate, HandRank};
use crate::logger::{HandEvent, HandRecord, PostKind, ShowdownInfo};
use crate::player::{Player, PlayerStatus};
use crate::policy::{DecisionPolicy, DecisionRequest, SeatView, TableView};
use crate::pot::PotManager;
use crate::rules::Street;

/// Runs complete hands: forced bets, dealing, four betting streets,
/// showdown and payout.
///
/// The engine only holds configuration. Every hand builds its own deck,
/// players and pot, so one engine can drive hands on many threads at once.
///
/// # Examples
///
/// ```
/// use holdem_engine::config::TableConfig;
/// use holdem_engine::engine::Engine;
/// use holdem_engine::game::Seat;
/// use holdem_engine::policy::PassivePolicy;
///
/// let engine = Engine::new(TableConfig::with_blinds(10, 20)).unwrap();
/// let seats = [Seat::new(1_000), Seat::new(1_000)];
/// let record = engine.play_hand(&seats, 0, 7, &mut PassivePolicy).unwrap();
///
/// assert_eq!(record.board.len(), 5);
/// assert_eq!(record.final_stacks.iter().sum::<u32>(), 2_000);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: TableConfig,
}

impl Engine {
    pub fn new(config: TableConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Plays one hand from a deck shuffled with `seed`.
    ///
    /// `seats` is never modified; the resulting stacks are in
    /// [`HandRecord::final_stacks`]. An error (abort included) therefore
    /// leaves the caller's stacks exactly as they were.
    pub fn play_hand(
        &self,
        seats: &[Seat],
        button: usize,
        seed: u64,
        policy: &mut dyn DecisionPolicy,
    ) -> Result<HandRecord, GameError> {
        let hand = Hand::start(&self.config, seats, button, Deck::new(seed), Some(seed))?;
        hand.run(policy)
    }

    /// Plays one hand from a prepared deck, dealt front to back.
    pub fn play_hand_with_deck(
        &self,
        seats: &[Seat],
        button: usize,
        deck: Deck,
        policy: &mut dyn DecisionPolicy,
    ) -> Result<HandRecord, GameError> {
        let hand = Hand::start(&self.config, seats, button, deck, None)?;
        hand.run(policy)
    }
}

/// Per-hand arena. Dropped when the hand ends, finished or not.
struct Hand<'a> {
    config: &'a TableConfig,
    seed: Option<u64>,
    button: usize,
    deck: Deck,
    players: Vec<Player>,
    pot: PotManager,
    board: Vec<Card>,
    events: Vec<HandEvent>,
    starting_stacks: Vec<u32>,
}

impl<'a> Hand<'a> {
    fn start(
        config: &'a TableConfig,
        seats: &[Seat],
        button: usize,
        deck: Deck,
        seed: Option<u64>,
    ) -> Result<Self, GameError> {
        if button >= seats.len() {
            return Err(GameError::UnknownSeat(button));
        }
        let total: u64 = seats.iter().map(|s| u64::from(s.stack)).sum();
        if total > u64::from(u32::MAX) {
            return Err(GameError::ChipOverflow { total });
        }
        let players: Vec<Player> = seats
            .iter()
            .enumerate()
            .map(|(i, s)| {
                if s.is_funded() {
                    Player::new(i, s.stack)
                } else {
                    Player::sitting_out(i, s.stack)
                }
            })
            .collect();
        let found = players.iter().filter(|p| p.can_act()).count();
        if found < 2 {
            return Err(GameError::NotEnoughPlayers { found });
        }
        Ok(Self {
            config,
            seed,
            button,
            deck,
            pot: PotManager::new(players.len(), button),
            starting_stacks: seats.iter().map(|s| s.stack).collect(),
            players,
            board: Vec::with_capacity(5),
            events: Vec::new(),
        })
    }

    fn run(mut self, policy: &mut dyn DecisionPolicy) -> Result<HandRecord, GameError> {
        info!(
            seed = ?self.seed,
            button = self.button,
            seats = self.players.len(),
            "hand started"
        );
        self.post_antes()?;
        let big_blind_seat = self.post_blinds()?;
        self.deal_hole_cards()?;

        let mut round = BettingRound::open(
            Street::Preflop,
            &self.players,
            big_blind_seat,
            self.config.big_blind,
        );
        loop {
            self.run_round(&mut round, policy)?;
            let next = round.next_street(&self.players);
            for p in &mut self.players {
                p.reset_street();
            }
            if next == Street::Showdown {
                break;
            }
            self.deal_street(next)?;
            round = BettingRound::open(next, &self.players, self.button, self.config.big_blind);
        }
        self.finish()
    }

    /// Seats dealt into the hand, clockwise starting after `from`.
    fn dealt_after(&self, from: usize) -> Vec<usize> {
        let n = self.players.len();
        (1..=n)
            .map(|k| (from + k) % n)
            .filter(|&s| self.players[s].status() != PlayerStatus::SittingOut)
            .collect()
    }

    fn post(&mut self, seat: usize, kind: PostKind, amount: u32) -> Result<(), GameError> {
        let player = &mut self.players[seat];
        let amount = amount.min(player.stack());
        if amount == 0 {
            return Ok(());
        }
        match kind {
            PostKind::Ante => self.pot.commit_dead(player, amount)?,
            PostKind::SmallBlind | PostKind::BigBlind => self.pot.commit(player, amount)?,
        }
        self.events.push(HandEvent::Post { seat, kind, amount });
        Ok(())
    }

    fn post_antes(&mut self) -> Result<(), GameError> {
        if self.config.ante == 0 {
            return Ok(());
        }
        for seat in self.dealt_after(self.button) {
            self.post(seat, PostKind::Ante, self.config.ante)?;
        }
        Ok(())
    }

    /// Heads-up the button posts the small blind; otherwise the two seats
    /// after it post. Returns the big blind's seat.
    fn post_blinds(&mut self) -> Result<usize, GameError> {
        let order = self.dealt_after(self.button);
        let (sb, bb) = if order.len() == 2 {
            // the last seat in clockwise order from button+1 is the button itself
            (order[1], order[0])
        } else {
            (order[0], order[1])
        };
        self.post(sb, PostKind::SmallBlind, self.config.small_blind)?;
        self.post(bb, PostKind::BigBlind, self.config.big_blind)?;
        Ok(bb)
    }

    fn draw(&mut self) -> Result<Card, GameError> {
        self.deck.deal_card().ok_or(GameError::DeckExhausted {
            requested: 1,
            remaining: 0,
        })
    }

    fn deal_hole_cards(&mut self) -> Result<(), GameError> {
        let order = self.dealt_after(self.button);
        let mut first = Vec::with_capacity(order.len());
        for _ in &order {
            first.push(self.draw()?);
        }
        for (i, &seat) in order.iter().enumerate() {
            let cards = [first[i], self.draw()?];
            self.players[seat].deal_hole(cards);
            self.events.push(HandEvent::Deal { seat, cards });
        }
        Ok(())
    }

    fn deal_street(&mut self, street: Street) -> Result<(), GameError> {
        if street.cards_to_deal() == 0 {
            return Ok(());
        }
        if self.config.burn_cards {
            self.deck.burn()?;
        }
        for card in self.deck.deal(street.cards_to_deal())? {
            self.board.push(card);
            self.events.push(HandEvent::CommunityCard { card, street });
        }
        debug!(?street, board = ?self.board, "community cards dealt");
        Ok(())
    }

    fn view(&self, round: &BettingRound) -> TableView {
        TableView {
            street: round.street(),
            board: self.board.clone(),
            pot: self.pot.total(),
            bet_to_call: round.bet_to_call(),
            last_raise_size: round.last_raise_size(),
            button: self.button,
            seats: self
                .players
                .iter()
                .map(|p| SeatView {
                    seat: p.seat(),
                    stack: p.stack(),
                    street_contribution: p.street_contribution(),
                    hand_contribution: p.hand_contribution(),
                    status: p.status(),
                })
                .collect(),
        }
    }

    fn run_round(
        &mut self,
        round: &mut BettingRound,
        policy: &mut dyn DecisionPolicy,
    ) -> Result<(), GameError> {
        while let Some(seat) = round.to_act() {
            let legal = round
                .legal_actions(&self.players)
                .ok_or(GameError::UnknownSeat(seat))?;
            let view = self.view(round);
            let hole_cards = self.players[seat].hole_cards();
            let mut rejections = 0;
            loop {
                let request = DecisionRequest {
                    seat,
                    legal: &legal,
                    view: &view,
                    hole_cards,
                };
                let action = policy.decide(&request).map_err(|abort| {
                    warn!(seat, reason = %abort.reason, "hand aborted by policy");
                    GameError::HandAborted {
                        reason: abort.reason,
                    }
                })?;
                match round.apply(seat, action, &mut self.players, &mut self.pot) {
                    Ok(event) => {
                        self.events.push(HandEvent::Action(event));
                        break;
                    }
                    Err(err) if err.is_recoverable() => {
                        warn!(seat, %action, error = %err, "action rejected");
                        self.events.push(HandEvent::Rejected {
                            seat,
                            action,
                            reason: err.to_string(),
                            street: round.street(),
                        });
                        rejections += 1;
                        if rejections >= self.config.max_rejections {
                            return Err(err);
                        }
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<HandRecord, GameError> {
        let contenders: Vec<usize> = self
            .dealt_after(self.button)
            .into_iter()
            .filter(|&s| self.players[s].in_hand())
            .collect();

        let mut ranks: BTreeMap<usize, HandRank> = BTreeMap::new();
        if contenders.len() >= 2 {
            // all-in runout
            while self.board.len() < 5 {
                let street = match self.board.len() {
                    0 => Street::Flop,
                    3 => Street::Turn,
                    _ => Street::River,
                };
                self.deal_street(street)?;
            }
            for &seat in &contenders {
                let Some(hole) = self.players[seat].hole_cards() else {
                    continue;
                };
                let mut cards = self.board.clone();
                cards.extend_from_slice(&hole);
                let rank = evaluate(&cards)?;
                ranks.insert(seat, rank);
                self.events.push(HandEvent::Showdown {
                    seat,
                    cards: hole,
                    rank,
                });
            }
        }

        let settlement = self.pot.settle(&mut self.players, &ranks)?;
        for payout in &settlement.payouts {
            debug!(seat = payout.seat, amount = payout.amount, pot = payout.pot_index, "payout");
            self.events.push(HandEvent::Payout(payout.clone()));
        }

        let mut winners: Vec<usize> = settlement.payouts.iter().map(|p| p.seat).collect();
        winners.sort_unstable();
        winners.dedup();
        let notes = ranks
            .values()
            .max()
            .map(|best| format!("best hand: {}", best));

        let final_stacks: Vec<u32> = self.players.iter().map(Player::stack).collect();
        let deltas: Vec<i64> = final_stacks
            .iter()
            .zip(&self.starting_stacks)
            .map(|(&f, &s)| i64::from(f) - i64::from(s))
            .collect();
        debug_assert_eq!(deltas.iter().sum::<i64>(), 0, "chips created or destroyed");

        info!(seed = ?self.seed, winners = ?winners, pot = self.pot.total(), "hand finished");
        Ok(HandRecord {
            hand_id: match self.seed {
                Some(seed) => format!("seed-{:016x}", seed),
                None => "stacked".to_string(),
            },
            seed: self.seed,
            button: self.button,
            board: self.board,
            events: self.events,
            starting_stacks: self.starting_stacks,
            final_stacks,
            deltas,
            pots: settlement.pots,
            showdown: Some(ShowdownInfo { winners, notes }),
            ts: None,
        })
    }
}
