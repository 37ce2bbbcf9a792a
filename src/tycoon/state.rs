//! Tycoon game state definitions.

use std::collections::BTreeSet;

use super::config::{
    Boost, BoostKind, GameConfig, PrestigeEffect, Rules, Target, UnlockDef,
};

/// Maximum number of entries kept in the message feed.
const LOG_CAPACITY: usize = 50;

/// One production line.
#[derive(Clone, Debug, PartialEq)]
pub struct Business {
    pub name: String,
    /// Units purchased.
    pub owned: u32,
    pub base_time: f64,
    pub speed_mult: f64,
    pub base_payout: f64,
    pub profit_mult: f64,
    pub base_cost: f64,
    pub cost_coefficient: f64,
    pub manager_cost: f64,
    /// Seconds remaining in the current cycle. Only meaningful while running.
    pub timer: f64,
    pub in_progress: bool,
    /// Completed cycles re-arm automatically.
    pub has_manager: bool,
    pub unlocked: bool,
}

impl Business {
    pub fn from_def(def: &super::config::BusinessDef) -> Self {
        Self {
            name: def.name.clone(),
            owned: 0,
            base_time: def.base_time,
            speed_mult: 1.0,
            base_payout: def.base_payout,
            profit_mult: 1.0,
            base_cost: def.base_cost,
            cost_coefficient: def.cost_coefficient,
            manager_cost: def.manager_cost,
            timer: 0.0,
            in_progress: false,
            has_manager: false,
            unlocked: false,
        }
    }

    /// `base_time / speed_mult / global_speed_mult`, or `None` when that is
    /// not a positive finite duration.
    pub fn effective_cycle_time(&self, global_speed_mult: f64) -> Option<f64> {
        let t = self.base_time / self.speed_mult / global_speed_mult;
        if t.is_finite() && t > 0.0 {
            Some(t)
        } else {
            None
        }
    }

    /// Money credited for one completed cycle, floored.
    pub fn cycle_payout(&self, m: Multipliers) -> f64 {
        let raw = self.base_payout
            * self.owned as f64
            * self.profit_mult
            * m.profit
            * m.prestige_bonus;
        if raw.is_finite() && raw > 0.0 {
            raw.floor()
        } else {
            0.0
        }
    }

    /// Fraction of the current cycle already done, in `[0, 1]`.
    pub fn progress(&self, global_speed_mult: f64) -> f64 {
        match self.effective_cycle_time(global_speed_mult) {
            Some(t) if self.in_progress => (1.0 - self.timer / t).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Keep `timer <= effective_cycle_time` after a speed change.
    pub fn clamp_timer(&mut self, global_speed_mult: f64) {
        if let Some(t) = self.effective_cycle_time(global_speed_mult) {
            self.timer = self.timer.clamp(0.0, t);
        }
    }

    /// Unlock, and own at least the first unit.
    pub fn force_unlock(&mut self) {
        self.unlocked = true;
        self.owned = self.owned.max(1);
    }

    /// Back to the pre-unlock defaults. Base values stay.
    pub fn reset(&mut self) {
        self.owned = 0;
        self.speed_mult = 1.0;
        self.profit_mult = 1.0;
        self.unlocked = false;
        self.has_manager = false;
        self.in_progress = false;
        self.timer = 0.0;
    }
}

/// Global multipliers read by every business in a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Multipliers {
    pub speed: f64,
    pub profit: f64,
    /// `1 + prestige_bonus_per_unit * prestige_currency_total`
    pub prestige_bonus: f64,
}

/// A cash upgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub name: String,
    pub cost: f64,
    pub target: Target,
    pub boost: Boost,
    pub purchased: bool,
}

/// A threshold unlock. Whether it fired lives in [`GameState::unlocked_shown`].
#[derive(Clone, Debug, PartialEq)]
pub struct Unlock {
    pub business: Option<usize>,
    pub threshold: u32,
    pub boost: Boost,
}

impl From<&UnlockDef> for Unlock {
    fn from(def: &UnlockDef) -> Self {
        Self {
            business: def.business,
            threshold: def.threshold,
            boost: def.boost,
        }
    }
}

/// A prestige upgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct PrestigeUpgrade {
    pub name: String,
    pub cost: u64,
    pub effect: PrestigeEffect,
    pub purchased: bool,
}

/// Message feed entry for the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// Full state of a tycoon run.
#[derive(Clone, Debug)]
pub struct GameState {
    pub money: f64,
    /// Earned since the last prestige. Never decreases within a run.
    pub lifetime_earnings: f64,
    pub global_speed_mult: f64,
    pub global_profit_mult: f64,
    /// Prestige currency on hand. Drops when prestige upgrades are bought.
    pub prestige_currency_total: u64,
    /// Cumulative prestige currency claimed. Only ever grows.
    pub prestige_currency_spent: u64,
    /// Wall-clock Unix seconds of the last simulated moment.
    pub last_timestamp: f64,
    pub businesses: Vec<Business>,
    pub upgrades: Vec<Upgrade>,
    pub unlocks: Vec<Unlock>,
    pub prestige_upgrades: Vec<PrestigeUpgrade>,
    /// Indices into `unlocks` that have already fired.
    pub unlocked_shown: BTreeSet<usize>,
    pub rules: Rules,
    pub log: Vec<LogEntry>,
}

impl GameState {
    /// A fresh game built from the content table. The first business starts
    /// unlocked with one unit.
    pub fn new(config: &GameConfig, now: f64) -> Self {
        let mut businesses: Vec<Business> =
            config.businesses.iter().map(Business::from_def).collect();
        if let Some(first) = businesses.first_mut() {
            first.force_unlock();
        }

        let upgrades = config
            .upgrades
            .iter()
            .map(|u| Upgrade {
                name: u.name.clone(),
                cost: u.cost,
                target: u.target,
                boost: u.boost,
                purchased: false,
            })
            .collect();

        let prestige_upgrades = config
            .prestige_upgrades
            .iter()
            .map(|p| PrestigeUpgrade {
                name: p.name.clone(),
                cost: p.cost,
                effect: p.effect,
                purchased: false,
            })
            .collect();

        Self {
            money: config.rules.starting_money,
            lifetime_earnings: 0.0,
            global_speed_mult: 1.0,
            global_profit_mult: 1.0,
            prestige_currency_total: 0,
            prestige_currency_spent: 0,
            last_timestamp: now,
            businesses,
            upgrades,
            unlocks: config.unlocks.iter().map(Unlock::from).collect(),
            prestige_upgrades,
            unlocked_shown: BTreeSet::new(),
            rules: config.rules,
            log: vec![LogEntry {
                text: "Welcome, tycoon!".into(),
                is_important: true,
            }],
        }
    }

    pub fn multipliers(&self) -> Multipliers {
        Multipliers {
            speed: self.global_speed_mult,
            profit: self.global_profit_mult,
            prestige_bonus: 1.0
                + self.rules.prestige_bonus_per_unit * self.prestige_currency_total as f64,
        }
    }

    /// Credit money earned by production.
    pub fn earn(&mut self, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self.money += amount;
            self.lifetime_earnings += amount;
        }
    }

    /// Apply a boost to one business or to every business.
    pub fn apply_boost(&mut self, target: Target, boost: Boost) {
        let global_speed = self.global_speed_mult;
        let apply = |b: &mut Business| match boost.kind {
            BoostKind::Profit => b.profit_mult *= boost.factor,
            BoostKind::Speed => {
                b.speed_mult *= boost.factor;
                b.clamp_timer(global_speed);
            }
        };
        match target {
            Target::All => self.businesses.iter_mut().for_each(apply),
            Target::Business(i) => {
                if let Some(b) = self.businesses.get_mut(i) {
                    apply(b);
                }
            }
        }
    }

    /// Apply a boost to the global multipliers.
    pub fn apply_global_boost(&mut self, boost: Boost) {
        match boost.kind {
            BoostKind::Profit => self.global_profit_mult *= boost.factor,
            BoostKind::Speed => {
                self.global_speed_mult *= boost.factor;
                let global_speed = self.global_speed_mult;
                for b in &mut self.businesses {
                    b.clamp_timer(global_speed);
                }
            }
        }
    }

    /// Record the wall-clock time of the last simulated moment.
    pub fn touch(&mut self, now: f64) {
        if now.is_finite() {
            self.last_timestamp = now;
        }
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > LOG_CAPACITY {
            self.log.remove(0);
        }
    }
}
