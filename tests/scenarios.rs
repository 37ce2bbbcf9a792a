//! End-to-end scenarios through the public API.

use idle_tycoon::tycoon::config::GameConfig;
use idle_tycoon::tycoon::economy::{cost_of_next, max_affordable};
use idle_tycoon::tycoon::error::Rejected;
use idle_tycoon::tycoon::logic::{self, Command};
use idle_tycoon::tycoon::save::{self, MemoryStore};
use idle_tycoon::tycoon::state::GameState;
use idle_tycoon::tycoon::{offline, prestige, production};

/// Two businesses; the first runs a 10s cycle paying $1 per unit.
fn config() -> GameConfig {
    GameConfig::from_json(
        r#"{
            "rules": { "starting_money": 0.0 },
            "businesses": [
                { "name": "Lemonade", "base_cost": 4.0, "cost_coefficient": 1.07,
                  "base_time": 10.0, "base_payout": 1.0, "manager_cost": 10.0 },
                { "name": "Newspaper", "base_cost": 60.0, "cost_coefficient": 1.15,
                  "base_time": 3.0, "base_payout": 60.0, "manager_cost": 1000.0 }
            ],
            "upgrades": [
                { "name": "Fresh lemons", "cost": 50.0,
                  "target": { "business": 0 }, "boost": { "kind": "profit", "factor": 3.0 } }
            ],
            "unlocks": [
                { "business": 0, "threshold": 25, "boost": { "kind": "speed", "factor": 2.0 } }
            ],
            "prestige_upgrades": [
                { "name": "Angel investors", "cost": 10, "effect": { "global_profit": 2.0 } }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn cost_scenario() {
    let state = GameState::new(&config(), 0.0);
    let mut lemonade = state.businesses[0].clone();
    lemonade.owned = 0;
    assert_eq!(cost_of_next(&lemonade, 0), 0.0);
    assert_eq!(cost_of_next(&lemonade, 1), 4.0);
    let expected = (4.0 * (1.07f64.powi(10) - 1.0) / 0.07).floor();
    assert_eq!(cost_of_next(&lemonade, 10), expected);
}

#[test]
fn affordability_inverse() {
    let state = GameState::new(&config(), 0.0);
    let lemonade = &state.businesses[0];
    for budget in [0.0, 3.0, 4.0, 100.0, 12_345.0, 1e9] {
        let n = max_affordable(lemonade, budget);
        assert!(cost_of_next(lemonade, n) <= budget);
        assert!(budget < cost_of_next(lemonade, n + 1));
    }
}

#[test]
fn offline_matches_online_without_manager() {
    let mut state = GameState::new(&config(), 1_000.0);
    production::start(&mut state, 0).unwrap();
    let report = offline::catch_up(&mut state, 1_025.0);

    assert!((report.credited - 2.0).abs() < 1e-9);
    assert!(!state.businesses[0].in_progress);
    assert_eq!(state.businesses[0].timer, 0.0);
}

#[test]
fn offline_matches_online_with_manager() {
    let mut state = GameState::new(&config(), 1_000.0);
    state.money = 10.0;
    logic::hire_manager(&mut state, 0).unwrap();
    let report = offline::catch_up(&mut state, 1_025.0);

    assert!((report.credited - 2.0).abs() < 1e-9);
    assert!(state.businesses[0].in_progress);
    assert!((state.businesses[0].timer - 5.0).abs() < 1e-9);
}

#[test]
fn tick_splitting_conserves_production() {
    let run = |steps: &[f64]| {
        let mut state = GameState::new(&config(), 0.0);
        state.businesses[0].owned = 7;
        production::start(&mut state, 0).unwrap();
        for &dt in steps {
            logic::tick(&mut state, dt);
        }
        state.money
    };
    assert_eq!(run(&[12.0]), run(&[5.0, 7.0]));
}

#[test]
fn unlock_applies_once() {
    let mut state = GameState::new(&config(), 0.0);
    state.businesses[0].owned = 25;
    let first = logic::tick(&mut state, 0.0);
    let second = logic::tick(&mut state, 0.0);
    assert_eq!(first.unlocks_fired, vec![0]);
    assert!(second.unlocks_fired.is_empty());
    assert!((state.businesses[0].speed_mult - 2.0).abs() < 1e-9);
}

#[test]
fn full_run_then_prestige() {
    let mut state = GameState::new(&config(), 0.0);
    state.money = 1e6;
    logic::apply(&mut state, Command::BuyUnits { business: 0, count: 30 }).unwrap();
    logic::apply(&mut state, Command::UnlockBusiness(1)).unwrap();
    logic::apply(&mut state, Command::BuyUpgrade(0)).unwrap();
    logic::apply(&mut state, Command::HireManager(0)).unwrap();
    assert_eq!(
        logic::apply(&mut state, Command::BuyUpgrade(0)),
        Err(Rejected::AlreadyPurchased)
    );

    // 150 * sqrt(1e15 / 1e15) = 150
    state.lifetime_earnings = 1e15;
    let award = prestige::claim(&mut state).unwrap();
    assert_eq!(award, 150);
    assert_eq!(state.prestige_currency_total, 150);
    assert_eq!(state.lifetime_earnings, 0.0);
    assert!(state.upgrades.iter().all(|u| !u.purchased));
    assert_eq!(state.businesses[0].owned, 1);
    assert_eq!(state.businesses[1].owned, 0);

    logic::apply(&mut state, Command::BuyPrestigeUpgrade(0)).unwrap();
    assert_eq!(state.prestige_currency_total, 140);
    assert_eq!(state.prestige_currency_spent, 150);
    assert!((state.global_profit_mult - 2.0).abs() < 1e-9);
}

#[test]
fn save_load_round_trip() {
    let mut state = GameState::new(&config(), 1_700_000_000.0);
    state.money = 500.0;
    logic::buy_units(&mut state, 0, 5).unwrap();
    production::start(&mut state, 0).unwrap();
    logic::tick(&mut state, 4.0);

    let store = MemoryStore::default();
    save::save_game(&state, &store).unwrap();
    let restored = save::load_or_new(&config(), &store, 1_700_000_000.0);

    assert_eq!(save::extract_save(&restored), save::extract_save(&state));
}

#[test]
fn corrupt_snapshot_starts_fresh() {
    let store = MemoryStore::with_contents(r#"{"version": 2, "game": {"money": "lots"}}"#);
    let state = save::load_or_new(&config(), &store, 10.0);
    assert_eq!(state.money, 0.0);
    assert!(state.businesses[0].unlocked);
    assert_eq!(store.contents(), None);
}
