//! Content tables for the tycoon: businesses, upgrades, unlocks and prestige
//! upgrades, plus the tuning constants of the prestige formula.
//!
//! The tables are data, not code. They are loaded once at startup and handed
//! to [`GameState::new`](super::state::GameState::new) by reference.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Built-in content table.
const BUILTIN_CONFIG: &str = include_str!("../../assets/default_config.json");

/// Errors produced while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which production line(s) an effect applies to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Every business.
    All,
    /// A single business, by index into [`GameConfig::businesses`].
    Business(usize),
}

/// Which multiplier a boost feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostKind {
    Profit,
    Speed,
}

/// A multiplicative boost, e.g. `{ "kind": "speed", "factor": 2.0 }`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    pub kind: BoostKind,
    pub factor: f64,
}

/// Effect of a prestige upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrestigeEffect {
    /// `global_profit_mult *= factor`
    GlobalProfit(f64),
    /// `global_speed_mult *= factor`
    GlobalSpeed(f64),
    /// Flat number of owned units for one business.
    GrantUnits { business: usize, units: u32 },
    /// Unlock every business.
    UnlockAll,
}

/// One production line.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BusinessDef {
    pub name: String,
    /// Price of the first unit. Also the one-time unlock price.
    pub base_cost: f64,
    /// Geometric cost growth per unit owned (>= 1).
    pub cost_coefficient: f64,
    /// Seconds per cycle before multipliers.
    pub base_time: f64,
    /// Payout per unit per cycle before multipliers.
    pub base_payout: f64,
    #[serde(default)]
    pub manager_cost: f64,
}

/// Cash upgrade, bought once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub name: String,
    pub cost: f64,
    pub target: Target,
    pub boost: Boost,
}

/// Threshold-triggered unlock. `business: None` means every business must
/// reach the threshold.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnlockDef {
    #[serde(default)]
    pub business: Option<usize>,
    pub threshold: u32,
    pub boost: Boost,
}

/// Prestige upgrade, bought once with prestige currency.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrestigeUpgradeDef {
    pub name: String,
    pub cost: u64,
    pub effect: PrestigeEffect,
}

/// Tuning constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Money on a fresh game and after every prestige.
    pub starting_money: f64,
    /// Payout bonus per unit of prestige currency held (0.02 = +2%).
    pub prestige_bonus_per_unit: f64,
    /// `award = floor(award_scale * sqrt(lifetime / award_divisor)) - spent`
    pub award_scale: f64,
    pub award_divisor: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_money: 0.0,
            prestige_bonus_per_unit: 0.02,
            award_scale: 150.0,
            award_divisor: 1e15,
        }
    }
}

/// The full content table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub rules: Rules,
    pub businesses: Vec<BusinessDef>,
    #[serde(default)]
    pub upgrades: Vec<UpgradeDef>,
    #[serde(default)]
    pub unlocks: Vec<UnlockDef>,
    #[serde(default)]
    pub prestige_upgrades: Vec<PrestigeUpgradeDef>,
}

impl GameConfig {
    /// Parse and validate a JSON content table.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The table shipped with the game.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_CONFIG)
    }

    /// Check every numeric guard and cross-reference.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.businesses.is_empty() {
            return Err(invalid("at least one business is required"));
        }
        let rules = &self.rules;
        if !(rules.award_divisor.is_finite() && rules.award_divisor > 0.0) {
            return Err(invalid("rules.award_divisor must be > 0"));
        }
        if !(rules.starting_money.is_finite() && rules.starting_money >= 0.0) {
            return Err(invalid("rules.starting_money must be >= 0"));
        }

        for (i, b) in self.businesses.iter().enumerate() {
            if !(b.base_time.is_finite() && b.base_time > 0.0) {
                return Err(invalid(format!("business {i} ({}): base_time must be > 0", b.name)));
            }
            if !(b.base_cost.is_finite() && b.base_cost > 0.0) {
                return Err(invalid(format!("business {i} ({}): base_cost must be > 0", b.name)));
            }
            if !(b.cost_coefficient.is_finite() && b.cost_coefficient >= 1.0) {
                return Err(invalid(format!(
                    "business {i} ({}): cost_coefficient must be >= 1",
                    b.name
                )));
            }
            if !(b.base_payout.is_finite() && b.base_payout >= 0.0) {
                return Err(invalid(format!("business {i} ({}): base_payout must be >= 0", b.name)));
            }
            if !(b.manager_cost.is_finite() && b.manager_cost >= 0.0) {
                return Err(invalid(format!("business {i} ({}): manager_cost must be >= 0", b.name)));
            }
        }

        let n = self.businesses.len();
        for u in &self.upgrades {
            self.check_target(&u.name, u.target)?;
            check_boost(&u.name, u.boost)?;
            if !(u.cost.is_finite() && u.cost >= 0.0) {
                return Err(invalid(format!("upgrade {}: cost must be >= 0", u.name)));
            }
        }
        for (i, u) in self.unlocks.iter().enumerate() {
            if let Some(b) = u.business {
                if b >= n {
                    return Err(invalid(format!("unlock {i}: business {b} out of range")));
                }
            }
            check_boost(&format!("unlock {i}"), u.boost)?;
        }
        for p in &self.prestige_upgrades {
            match p.effect {
                PrestigeEffect::GlobalProfit(f) | PrestigeEffect::GlobalSpeed(f) => {
                    if !(f.is_finite() && f >= 1.0) {
                        return Err(invalid(format!("prestige upgrade {}: factor must be >= 1", p.name)));
                    }
                }
                PrestigeEffect::GrantUnits { business, .. } => {
                    self.check_target(&p.name, Target::Business(business))?;
                }
                PrestigeEffect::UnlockAll => {}
            }
        }
        Ok(())
    }

    fn check_target(&self, name: &str, target: Target) -> Result<(), ConfigError> {
        match target {
            Target::Business(b) if b >= self.businesses.len() => {
                Err(invalid(format!("{name}: business {b} out of range")))
            }
            _ => Ok(()),
        }
    }
}

fn check_boost(name: &str, boost: Boost) -> Result<(), ConfigError> {
    if boost.factor.is_finite() && boost.factor >= 1.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name}: boost factor must be >= 1")))
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}
