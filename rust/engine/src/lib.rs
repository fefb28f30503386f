//! # holdem-engine: No-Limit Hold'em Game Core
//!
//! A deterministic Texas Hold'em engine for heads-up and multi-way
//! simulation. It ranks hands, enforces betting legality, tracks main and
//! side pots, and drives complete hands from the deal to the payout. Given the
//! same seed and the same decisions, every hand replays bit for bit.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and text parsing
//! - [`deck`] - Deterministic deck shuffling with ChaCha20 RNG
//! - [`hand`] - Hand evaluation and strength comparison
//! - [`player`] - Per-hand player state and actions
//! - [`pot`] - Chip ledger, side pots and settlement
//! - [`rules`] - Streets, legal actions and action validation
//! - [`betting`] - Betting-round state machine
//! - [`policy`] - Decision callback interface
//! - [`engine`] - Hand orchestration
//! - [`game`] - Multi-hand table with stack persistence
//! - [`logger`] - Hand events, HandRecord and JSONL output
//! - [`config`] - Table configuration
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::cards::parse_cards;
//! use holdem_engine::hand::{evaluate, Category};
//!
//! let cards = parse_cards("Ah Kh Qh Jh Th 2c 3d").unwrap();
//! let rank = evaluate(&cards).unwrap();
//! assert_eq!(rank.category, Category::StraightFlush);
//! ```
//!
//! ## Playing Hands
//!
//! ```rust
//! use holdem_engine::config::TableConfig;
//! use holdem_engine::engine::Engine;
//! use holdem_engine::game::Table;
//! use holdem_engine::policy::PassivePolicy;
//!
//! let engine = Engine::new(TableConfig::with_blinds(5, 10)).unwrap();
//! let mut table = Table::new([500, 500, 500], 42);
//! for _ in 0..3 {
//!     table.play_hand(&engine, &mut PassivePolicy).unwrap();
//! }
//! assert_eq!(table.stacks().iter().sum::<u32>(), 1_500);
//! ```

pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod policy;
pub mod pot;
pub mod rules;
