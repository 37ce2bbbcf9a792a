//! Read-only snapshot of a [`GameState`] for the renderer.

use crate::format::format_money;

use super::config::{BoostKind, PrestigeEffect, Target};
use super::economy;
use super::prestige;
use super::state::{GameState, LogEntry};

/// Upgrade keys `a`..`f` address the first six unpurchased upgrades.
pub const UPGRADE_SLOTS: usize = 6;

#[derive(Clone, Debug, PartialEq)]
pub struct BusinessView {
    pub id: usize,
    pub name: String,
    pub owned: u32,
    pub unlocked: bool,
    pub in_progress: bool,
    pub has_manager: bool,
    /// `[0, 1]`
    pub progress: f64,
    pub cycle_time: Option<f64>,
    /// Money the next completed cycle credits.
    pub payout: f64,
    pub next_cost: f64,
    pub can_afford: bool,
    pub unlock_cost: f64,
    pub manager_cost: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeView {
    /// Index into `GameState::upgrades`.
    pub id: usize,
    pub name: String,
    pub description: String,
    pub cost: f64,
    pub can_afford: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrestigeUpgradeView {
    pub id: usize,
    pub name: String,
    pub description: String,
    pub cost: u64,
    pub purchased: bool,
    pub can_afford: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameView {
    pub money: String,
    pub lifetime: String,
    pub prestige_total: u64,
    pub prestige_bonus_pct: f64,
    pub available_award: u64,
    pub businesses: Vec<BusinessView>,
    /// Unpurchased upgrades in table order, at most [`UPGRADE_SLOTS`].
    pub upgrades: Vec<UpgradeView>,
    pub prestige_upgrades: Vec<PrestigeUpgradeView>,
    pub log: Vec<LogEntry>,
    /// Business row under the cursor, if the front-end has one.
    pub selected: Option<usize>,
}

impl GameView {
    pub fn from_state(state: &GameState) -> Self {
        let m = state.multipliers();

        let businesses = state
            .businesses
            .iter()
            .enumerate()
            .map(|(id, b)| {
                let next_cost = economy::cost_of_next(b, 1);
                BusinessView {
                    id,
                    name: b.name.clone(),
                    owned: b.owned,
                    unlocked: b.unlocked,
                    in_progress: b.in_progress,
                    has_manager: b.has_manager,
                    progress: b.progress(m.speed),
                    cycle_time: b.effective_cycle_time(m.speed),
                    payout: b.cycle_payout(m),
                    next_cost,
                    can_afford: if b.unlocked {
                        state.money >= next_cost
                    } else {
                        state.money >= b.base_cost
                    },
                    unlock_cost: b.base_cost,
                    manager_cost: b.manager_cost,
                }
            })
            .collect();

        let upgrades = state
            .upgrades
            .iter()
            .enumerate()
            .filter(|(_, u)| !u.purchased)
            .take(UPGRADE_SLOTS)
            .map(|(id, u)| UpgradeView {
                id,
                name: u.name.clone(),
                description: format!(
                    "{} {} x{}",
                    target_name(state, u.target),
                    kind_name(u.boost.kind),
                    u.boost.factor
                ),
                cost: u.cost,
                can_afford: state.money >= u.cost,
            })
            .collect();

        let prestige_upgrades = state
            .prestige_upgrades
            .iter()
            .enumerate()
            .map(|(id, u)| PrestigeUpgradeView {
                id,
                name: u.name.clone(),
                description: effect_description(state, u.effect),
                cost: u.cost,
                purchased: u.purchased,
                can_afford: !u.purchased && state.prestige_currency_total >= u.cost,
            })
            .collect();

        Self {
            money: format_money(state.money),
            lifetime: format_money(state.lifetime_earnings),
            prestige_total: state.prestige_currency_total,
            prestige_bonus_pct: (m.prestige_bonus - 1.0) * 100.0,
            available_award: prestige::available_award(state),
            businesses,
            upgrades,
            prestige_upgrades,
            log: state.log.clone(),
            selected: None,
        }
    }
}

fn target_name(state: &GameState, target: Target) -> String {
    match target {
        Target::All => "All".to_string(),
        Target::Business(i) => state
            .businesses
            .get(i)
            .map_or_else(|| format!("#{}", i), |b| b.name.clone()),
    }
}

fn kind_name(kind: BoostKind) -> &'static str {
    match kind {
        BoostKind::Profit => "profit",
        BoostKind::Speed => "speed",
    }
}

fn effect_description(state: &GameState, effect: PrestigeEffect) -> String {
    match effect {
        PrestigeEffect::GlobalProfit(f) => format!("All profit x{}", f),
        PrestigeEffect::GlobalSpeed(f) => format!("All speed x{}", f),
        PrestigeEffect::GrantUnits { business, units } => format!(
            "+{} {} every run",
            units,
            target_name(state, Target::Business(business))
        ),
        PrestigeEffect::UnlockAll => "Every business open from the start".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tycoon::config::tests::small_config;

    #[test]
    fn fresh_view() {
        let state = GameState::new(&small_config(), 0.0);
        let view = GameView::from_state(&state);
        assert_eq!(view.money, "$100");
        assert_eq!(view.available_award, 0);
        assert_eq!(view.businesses.len(), 2);

        let stand = &view.businesses[0];
        assert!(stand.unlocked);
        assert_eq!(stand.owned, 1);
        assert!((stand.next_cost - 4.0).abs() < 1e-9);
        assert!(stand.can_afford);
        assert_eq!(stand.progress, 0.0);
        assert!((stand.payout - 1.0).abs() < 1e-9);

        let paper = &view.businesses[1];
        assert!(!paper.unlocked);
        // Affordability of a locked business is about its unlock price.
        assert!(paper.can_afford);
    }

    #[test]
    fn purchased_upgrades_are_hidden() {
        let mut state = GameState::new(&small_config(), 0.0);
        state.upgrades[0].purchased = true;
        let view = GameView::from_state(&state);
        assert_eq!(view.upgrades.len(), 1);
        assert_eq!(view.upgrades[0].id, 1);
        assert_eq!(view.upgrades[0].description, "All profit x2");
    }

    #[test]
    fn progress_and_prestige_are_reported() {
        let mut state = GameState::new(&small_config(), 0.0);
        state.businesses[0].in_progress = true;
        state.businesses[0].timer = 2.5;
        state.prestige_currency_total = 10;
        let view = GameView::from_state(&state);
        assert!((view.businesses[0].progress - 0.75).abs() < 1e-9);
        assert!((view.prestige_bonus_pct - 20.0).abs() < 1e-9);
        assert!(view.prestige_upgrades[0].can_afford);
        assert_eq!(view.prestige_upgrades[2].description, "+10 Paper every run");
    }
}
