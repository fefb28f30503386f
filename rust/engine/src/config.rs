use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Stakes and house rules for a table.
///
/// Missing TOML keys fall back to [`TableConfig::default`].
///
/// ```
/// use holdem_engine::config::TableConfig;
///
/// let cfg = TableConfig::from_toml_str("small_blind = 10\nbig_blind = 20\nante = 2").unwrap();
/// assert_eq!((cfg.small_blind, cfg.big_blind, cfg.ante), (10, 20, 2));
/// assert!(cfg.burn_cards);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    pub small_blind: u32,
    pub big_blind: u32,
    /// Dead chips every dealt player posts before the blinds
    pub ante: u32,
    /// Burn one card before the flop, turn and river
    pub burn_cards: bool,
    /// Rejected actions tolerated at one decision point before the hand fails
    pub max_rejections: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: 1,
            big_blind: 2,
            ante: 0,
            burn_cards: true,
            max_rejections: 8,
        }
    }
}

impl TableConfig {
    pub fn with_blinds(small_blind: u32, big_blind: u32) -> Self {
        Self {
            small_blind,
            big_blind,
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, GameError> {
        let cfg: TableConfig =
            toml::from_str(s).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.big_blind == 0 {
            return Err(GameError::InvalidConfig("big_blind must be positive".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(GameError::InvalidConfig(format!(
                "small_blind {} exceeds big_blind {}",
                self.small_blind, self.big_blind
            )));
        }
        if self.max_rejections == 0 {
            return Err(GameError::InvalidConfig(
                "max_rejections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
