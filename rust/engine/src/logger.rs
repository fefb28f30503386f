use std::io::Write;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::betting::ActionEvent;
use crate::cards::Card;
use crate::hand::HandRank;
use crate::player::PlayerAction;
use crate::pot::{Payout, Pot};
use crate::rules::Street;

/// Forced bets posted before any decision.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    Ante,
    SmallBlind,
    BigBlind,
}

/// One entry of the hand history, in the order it happened.
///
/// Serialized with a `"type"` tag. Variant and field names are read by
/// downstream feature extraction, so renaming any of them is a breaking change.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HandEvent {
    /// Hole cards dealt to a seat
    Deal { seat: usize, cards: [Card; 2] },
    /// Ante or blind
    Post {
        seat: usize,
        kind: PostKind,
        amount: u32,
    },
    /// Accepted betting action
    Action(ActionEvent),
    /// Action refused by the rules; the seat was asked again
    Rejected {
        seat: usize,
        action: PlayerAction,
        reason: String,
        street: Street,
    },
    CommunityCard { card: Card, street: Street },
    Showdown {
        seat: usize,
        cards: [Card; 2],
        rank: HandRank,
    },
    Payout(Payout),
}

/// Summary of who won, for quick filtering without replaying events.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    /// Seats that received at least one payout
    pub winners: Vec<usize>,
    /// Optional notes about the showdown (e.g., the winning hand)
    #[serde(default)]
    pub notes: Option<String>,
}

/// Complete record of one hand: every event, the board, and stack changes.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Identifier (format: YYYYMMDD-NNNNNN when assigned by a table)
    pub hand_id: String,
    /// Deck seed; `None` when the hand was dealt from a stacked deck
    pub seed: Option<u64>,
    pub button: usize,
    pub board: Vec<Card>,
    pub events: Vec<HandEvent>,
    pub starting_stacks: Vec<u32>,
    pub final_stacks: Vec<u32>,
    /// `final - starting` per seat
    pub deltas: Vec<i64>,
    pub pots: Vec<Pot>,
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
    /// Timestamp (RFC3339), filled in by [`HandLogger`] when missing
    #[serde(default)]
    pub ts: Option<String>,
}

impl HandRecord {
    pub fn actions(&self) -> impl Iterator<Item = &ActionEvent> {
        self.events.iter().filter_map(|e| match e {
            HandEvent::Action(a) => Some(a),
            _ => None,
        })
    }

    pub fn payouts(&self) -> impl Iterator<Item = &Payout> {
        self.events.iter().filter_map(|e| match e {
            HandEvent::Payout(p) => Some(p),
            _ => None,
        })
    }

    pub fn rejections(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, HandEvent::Rejected { .. }))
            .count()
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

pub fn today_utc() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

/// Writes hand records as JSON lines (LF only) to any writer.
pub struct HandLogger<W: Write> {
    writer: W,
    date: String,
    seq: u32,
}

impl<W: Write> HandLogger<W> {
    pub fn new(writer: W) -> Self {
        Self::with_date(writer, &today_utc())
    }

    pub fn with_date(writer: W, date: &str) -> Self {
        Self {
            writer,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if needs_table_id(&rec.hand_id) {
            rec.hand_id = self.next_id();
        }
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = rec.to_json_line().map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Ids the engine hands out on its own (`seed-...`, `stacked`) are replaced
/// with the logger's dated sequence.
fn needs_table_id(hand_id: &str) -> bool {
    hand_id.is_empty() || hand_id == "stacked" || hand_id.starts_with("seed-")
}
