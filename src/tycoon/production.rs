//! Per-business production cycle: `Idle → Running → (Idle | Running)`.

use super::error::{CommandResult, Rejected};
use super::state::GameState;

/// Arm an idle business: `timer = effective_cycle_time`.
pub fn start(state: &mut GameState, id: usize) -> CommandResult {
    let global_speed = state.global_speed_mult;
    let business = state.businesses.get_mut(id).ok_or(Rejected::InvalidTarget)?;
    if !business.unlocked {
        return Err(Rejected::Locked);
    }
    if business.owned == 0 {
        return Err(Rejected::NotOwned);
    }
    if business.in_progress {
        return Err(Rejected::Busy);
    }
    let cycle = business
        .effective_cycle_time(global_speed)
        .ok_or(Rejected::InvalidTarget)?;
    business.timer = cycle;
    business.in_progress = true;
    Ok(())
}

/// Advance every running business by `dt` seconds and credit completed
/// cycles. Returns the amount credited.
///
/// The timer drains at `dt * speed_mult * global_speed_mult`, on top of the
/// cycle itself being `base_time / speed_mult / global_speed_mult` long, so
/// speed multipliers count twice. At most one cycle completes per call; any
/// overshoot past zero is dropped.
pub fn advance(state: &mut GameState, dt: f64) -> f64 {
    if !(dt.is_finite() && dt > 0.0) {
        return 0.0;
    }
    let m = state.multipliers();
    let mut credited = 0.0;

    for business in state.businesses.iter_mut().filter(|b| b.in_progress) {
        business.timer -= dt * business.speed_mult * m.speed;
        if business.timer > 0.0 {
            continue;
        }
        business.timer = 0.0;
        credited += business.cycle_payout(m);

        // Recomputed here: multipliers may have changed mid-cycle.
        match business.effective_cycle_time(m.speed) {
            Some(cycle) if business.has_manager => business.timer = cycle,
            _ => business.in_progress = false,
        }
    }

    state.earn(credited);
    credited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tycoon::config::tests::small_config;
    use proptest::prelude::*;

    /// Business 0 of the small config: base_time 10, base_payout 1.
    fn running_stand(owned: u32, manager: bool) -> GameState {
        let mut state = GameState::new(&small_config(), 0.0);
        state.money = 0.0;
        state.businesses[0].owned = owned;
        state.businesses[0].has_manager = manager;
        start(&mut state, 0).unwrap();
        state
    }

    #[test]
    fn start_arms_full_cycle() {
        let state = running_stand(1, false);
        assert!(state.businesses[0].in_progress);
        assert!((state.businesses[0].timer - 10.0).abs() < 1e-9);
    }

    #[test]
    fn start_rejects_locked_unowned_and_busy() {
        let mut state = GameState::new(&small_config(), 0.0);
        assert_eq!(start(&mut state, 1), Err(Rejected::Locked));
        state.businesses[1].unlocked = true;
        assert_eq!(start(&mut state, 1), Err(Rejected::NotOwned));
        assert_eq!(start(&mut state, 0), Ok(()));
        assert_eq!(start(&mut state, 0), Err(Rejected::Busy));
        assert_eq!(start(&mut state, 9), Err(Rejected::InvalidTarget));
    }

    #[test]
    fn partial_tick_only_drains_timer() {
        let mut state = running_stand(1, false);
        assert_eq!(advance(&mut state, 4.0), 0.0);
        assert!((state.businesses[0].timer - 6.0).abs() < 1e-9);
        assert!(state.businesses[0].in_progress);
    }

    #[test]
    fn completion_without_manager_goes_idle() {
        let mut state = running_stand(3, false);
        let credited = advance(&mut state, 10.0);
        assert!((credited - 3.0).abs() < 1e-9);
        assert!((state.money - 3.0).abs() < 1e-9);
        assert!((state.lifetime_earnings - 3.0).abs() < 1e-9);
        assert!(!state.businesses[0].in_progress);
        assert_eq!(state.businesses[0].timer, 0.0);
    }

    #[test]
    fn completion_with_manager_rearms() {
        let mut state = running_stand(1, true);
        advance(&mut state, 12.0);
        assert!((state.money - 1.0).abs() < 1e-9);
        assert!(state.businesses[0].in_progress);
        assert!((state.businesses[0].timer - 10.0).abs() < 1e-9);
    }

    #[test]
    fn drain_rate_scales_with_speed() {
        let mut state = running_stand(1, false);
        state.businesses[0].speed_mult = 2.0;
        state.global_speed_mult = 1.5;
        state.businesses[0].timer = 10.0 / 3.0;
        // 1 second drains 1 * 2 * 1.5 = 3 seconds of timer.
        advance(&mut state, 1.0);
        assert!((state.businesses[0].timer - (10.0 / 3.0 - 3.0)).abs() < 1e-9);
    }

    #[test]
    fn rearm_uses_current_multipliers() {
        let mut state = running_stand(1, true);
        state.businesses[0].timer = 1.0;
        state.businesses[0].speed_mult = 4.0;
        advance(&mut state, 1.0);
        assert!((state.businesses[0].timer - 2.5).abs() < 1e-9);
    }

    #[test]
    fn payout_applies_global_and_prestige_multipliers() {
        let mut state = running_stand(10, false);
        state.global_profit_mult = 2.0;
        state.prestige_currency_total = 50; // +100%
        state.businesses[0].profit_mult = 3.0;
        let credited = advance(&mut state, 10.0);
        assert!((credited - 120.0).abs() < 1e-9);
    }

    #[test]
    fn idle_businesses_do_not_produce() {
        let mut state = GameState::new(&small_config(), 0.0);
        state.money = 0.0;
        state.businesses[0].owned = 50;
        assert_eq!(advance(&mut state, 100.0), 0.0);
        assert_eq!(state.money, 0.0);
    }

    #[test]
    fn invalid_dt_is_ignored() {
        let mut state = running_stand(1, false);
        assert_eq!(advance(&mut state, -1.0), 0.0);
        assert_eq!(advance(&mut state, f64::NAN), 0.0);
        assert!((state.businesses[0].timer - 10.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn tick_splitting_is_invariant(first in 0u32..20, second in 0u32..20,
                                       owned in 1u32..100) {
            let total = (first + second) as f64;

            let mut whole = running_stand(owned, false);
            advance(&mut whole, total);

            let mut split = running_stand(owned, false);
            advance(&mut split, first as f64);
            advance(&mut split, second as f64);

            prop_assert_eq!(whole.money, split.money);
            prop_assert_eq!(whole.businesses[0].in_progress, split.businesses[0].in_progress);
            prop_assert_eq!(whole.businesses[0].timer, split.businesses[0].timer);
        }
    }

    #[test]
    fn managed_splits_on_cycle_boundaries_match() {
        let mut whole = running_stand(2, true);
        advance(&mut whole, 10.0);
        advance(&mut whole, 10.0);

        let mut split = running_stand(2, true);
        for dt in [4.0, 6.0, 2.5, 7.5] {
            advance(&mut split, dt);
        }
        assert_eq!(whole.money, split.money);
        assert_eq!(whole.businesses[0].timer, split.businesses[0].timer);
    }
}
