//! Prestige: trade lifetime earnings for permanent currency, then reset.

use tracing::{debug, info};

use super::config::{Boost, BoostKind, PrestigeEffect};
use super::error::{CommandResult, Rejected};
use super::state::GameState;

/// Prestige currency a claim would award right now.
///
/// `floor(award_scale * sqrt(lifetime / award_divisor)) - spent`, never
/// negative. `spent` counts every award claimed so far, so the formula
/// yields only the increment over previous claims.
pub fn available_award(state: &GameState) -> u64 {
    let rules = &state.rules;
    let lifetime = state.lifetime_earnings.max(0.0);
    let gross = (rules.award_scale * (lifetime / rules.award_divisor).sqrt()).floor();
    if !gross.is_finite() || gross <= 0.0 {
        return 0;
    }
    let gross = gross.min(u64::MAX as f64) as u64;
    gross.saturating_sub(state.prestige_currency_spent)
}

/// Claim the available award and reset the run. Returns the amount awarded.
pub fn claim(state: &mut GameState) -> CommandResult<u64> {
    let award = available_award(state);
    if award == 0 {
        state.add_log("Not enough lifetime earnings to prestige yet", false);
        return Err(Rejected::NothingToClaim);
    }

    state.prestige_currency_total += award;
    state.prestige_currency_spent += award;
    reset(state);

    info!(
        award,
        total = state.prestige_currency_total,
        "prestige claimed"
    );
    state.add_log(
        &format!(
            "✦ Prestige! +{} (holding {}, payout +{:.0}%)",
            award,
            state.prestige_currency_total,
            (state.multipliers().prestige_bonus - 1.0) * 100.0
        ),
        true,
    );
    Ok(award)
}

/// Roll back everything but prestige currency and prestige upgrades, then
/// re-derive what those permanent upgrades grant.
pub fn reset(state: &mut GameState) {
    state.money = state.rules.starting_money;
    state.lifetime_earnings = 0.0;
    state.global_speed_mult = 1.0;
    state.global_profit_mult = 1.0;
    for business in &mut state.businesses {
        business.reset();
    }
    if let Some(first) = state.businesses.first_mut() {
        first.force_unlock();
    }
    for upgrade in &mut state.upgrades {
        upgrade.purchased = false;
    }
    state.unlocked_shown.clear();
    state.log.clear();

    let effects: Vec<PrestigeEffect> = state
        .prestige_upgrades
        .iter()
        .filter(|u| u.purchased)
        .map(|u| u.effect)
        .collect();
    for effect in effects {
        apply_effect(state, effect);
    }
}

/// Buy a prestige upgrade with prestige currency.
///
/// The cost comes out of `prestige_currency_total` only;
/// `prestige_currency_spent` tracks claimed awards, not purchases.
pub fn buy_upgrade(state: &mut GameState, index: usize) -> CommandResult {
    let upgrade = state
        .prestige_upgrades
        .get(index)
        .ok_or(Rejected::InvalidTarget)?;
    if upgrade.purchased {
        return Err(Rejected::AlreadyPurchased);
    }
    if state.prestige_currency_total < upgrade.cost {
        return Err(Rejected::InsufficientFunds);
    }
    let cost = upgrade.cost;
    let effect = upgrade.effect;
    let name = upgrade.name.clone();

    state.prestige_currency_total -= cost;
    state.prestige_upgrades[index].purchased = true;
    apply_effect(state, effect);

    debug!(index, cost, ?effect, "prestige upgrade bought");
    state.add_log(&format!("✦ {} purchased", name), true);
    Ok(())
}

fn apply_effect(state: &mut GameState, effect: PrestigeEffect) {
    match effect {
        PrestigeEffect::GlobalProfit(factor) => state.apply_global_boost(Boost {
            kind: BoostKind::Profit,
            factor,
        }),
        PrestigeEffect::GlobalSpeed(factor) => state.apply_global_boost(Boost {
            kind: BoostKind::Speed,
            factor,
        }),
        PrestigeEffect::GrantUnits { business, units } => {
            if let Some(b) = state.businesses.get_mut(business) {
                b.unlocked = true;
                b.owned = b.owned.saturating_add(units);
            }
        }
        PrestigeEffect::UnlockAll => {
            for b in &mut state.businesses {
                b.force_unlock();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tycoon::config::tests::small_config;

    fn rich_state() -> GameState {
        let mut state = GameState::new(&small_config(), 0.0);
        // sqrt(4e15 / 1e15) * 150 = 300
        state.lifetime_earnings = 4e15;
        state.money = 1e12;
        state.businesses[0].owned = 80;
        state.businesses[0].speed_mult = 4.0;
        state.businesses[0].has_manager = true;
        state.businesses[0].in_progress = true;
        state.businesses[0].timer = 1.0;
        state.businesses[1].unlocked = true;
        state.businesses[1].owned = 30;
        state.businesses[1].profit_mult = 3.0;
        state.upgrades[0].purchased = true;
        state.unlocked_shown.insert(0);
        state.global_profit_mult = 2.0;
        state.global_speed_mult = 2.0;
        state
    }

    #[test]
    fn award_formula() {
        let state = rich_state();
        assert_eq!(available_award(&state), 300);
    }

    #[test]
    fn award_subtracts_previous_claims() {
        let mut state = rich_state();
        state.prestige_currency_spent = 120;
        assert_eq!(available_award(&state), 180);
        state.prestige_currency_spent = 500;
        assert_eq!(available_award(&state), 0);
    }

    #[test]
    fn award_is_zero_for_small_earnings() {
        let mut state = GameState::new(&small_config(), 0.0);
        state.lifetime_earnings = 1e9;
        assert_eq!(available_award(&state), 0);
    }

    #[test]
    fn claim_without_award_is_rejected() {
        let mut state = GameState::new(&small_config(), 0.0);
        state.money = 42.0;
        assert_eq!(claim(&mut state), Err(Rejected::NothingToClaim));
        assert!((state.money - 42.0).abs() < 1e-9);
    }

    #[test]
    fn claim_resets_the_run() {
        let mut state = rich_state();
        assert_eq!(claim(&mut state), Ok(300));

        assert_eq!(state.prestige_currency_total, 300);
        assert_eq!(state.prestige_currency_spent, 300);
        assert_eq!(state.lifetime_earnings, 0.0);
        assert!((state.money - 100.0).abs() < 1e-9);
        assert!((state.global_profit_mult - 1.0).abs() < 1e-9);
        assert!((state.global_speed_mult - 1.0).abs() < 1e-9);
        assert!(state.unlocked_shown.is_empty());
        assert!(state.upgrades.iter().all(|u| !u.purchased));

        let first = &state.businesses[0];
        assert!(first.unlocked);
        assert_eq!(first.owned, 1);
        assert!(!first.has_manager);
        assert!(!first.in_progress);
        assert_eq!(first.timer, 0.0);
        assert!((first.speed_mult - 1.0).abs() < 1e-9);

        let second = &state.businesses[1];
        assert!(!second.unlocked);
        assert_eq!(second.owned, 0);
        assert!((second.profit_mult - 1.0).abs() < 1e-9);
    }

    #[test]
    fn second_claim_only_awards_the_increment() {
        let mut state = rich_state();
        claim(&mut state).unwrap();
        // sqrt(9e15 / 1e15) * 150 = 450, minus 300 already claimed.
        state.lifetime_earnings = 9e15;
        assert_eq!(claim(&mut state), Ok(150));
        assert_eq!(state.prestige_currency_total, 450);
        assert_eq!(state.prestige_currency_spent, 450);
    }

    #[test]
    fn buying_prestige_upgrade_spends_total_not_spent() {
        let mut state = GameState::new(&small_config(), 0.0);
        state.prestige_currency_total = 10;
        state.prestige_currency_spent = 10;
        assert_eq!(buy_upgrade(&mut state, 0), Ok(()));
        assert_eq!(state.prestige_currency_total, 5);
        assert_eq!(state.prestige_currency_spent, 10);
        assert!((state.global_profit_mult - 2.0).abs() < 1e-9);
        assert_eq!(buy_upgrade(&mut state, 0), Err(Rejected::AlreadyPurchased));
    }

    #[test]
    fn buying_prestige_upgrade_needs_currency() {
        let mut state = GameState::new(&small_config(), 0.0);
        state.prestige_currency_total = 4;
        assert_eq!(buy_upgrade(&mut state, 0), Err(Rejected::InsufficientFunds));
        assert_eq!(buy_upgrade(&mut state, 99), Err(Rejected::InvalidTarget));
        assert_eq!(state.prestige_currency_total, 4);
    }

    #[test]
    fn grant_units_and_unlock_all() {
        let mut state = GameState::new(&small_config(), 0.0);
        state.prestige_currency_total = 2;
        buy_upgrade(&mut state, 2).unwrap();
        assert!(state.businesses[1].unlocked);
        assert_eq!(state.businesses[1].owned, 10);

        let mut state = GameState::new(&small_config(), 0.0);
        state.prestige_currency_total = 1;
        buy_upgrade(&mut state, 3).unwrap();
        assert!(state.businesses.iter().all(|b| b.unlocked && b.owned >= 1));
    }

    #[test]
    fn prestige_upgrades_survive_reset_and_reapply() {
        let mut state = rich_state();
        state.prestige_currency_total = 20;
        buy_upgrade(&mut state, 0).unwrap(); // global profit x2
        buy_upgrade(&mut state, 1).unwrap(); // global speed x2
        buy_upgrade(&mut state, 2).unwrap(); // +10 units of business 1
        claim(&mut state).unwrap();

        assert!(state.prestige_upgrades[..3].iter().all(|u| u.purchased));
        assert!((state.global_profit_mult - 2.0).abs() < 1e-9);
        assert!((state.global_speed_mult - 2.0).abs() < 1e-9);
        assert_eq!(state.businesses[1].owned, 10);
        assert_eq!(state.businesses[0].owned, 1);
    }
}
