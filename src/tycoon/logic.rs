//! Tycoon commands: pure functions over [`GameState`], fully testable.

use tracing::{debug, warn};

use crate::format::format_money;

use super::economy;
use super::error::{CommandResult, Rejected};
use super::prestige;
use super::production;
use super::state::{Business, GameState};
use super::unlocks;

/// Everything the front-end may ask of the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    StartProduction(usize),
    BuyUnits { business: usize, count: u32 },
    BuyMax(usize),
    UnlockBusiness(usize),
    HireManager(usize),
    BuyUpgrade(usize),
    ClaimPrestige,
    BuyPrestigeUpgrade(usize),
}

/// Result of one simulation tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub credited: f64,
    /// Unlock ids that fired this tick.
    pub unlocks_fired: Vec<usize>,
}

/// Advance the simulation by `dt` seconds: production first, then unlock
/// thresholds, so units bought or granted this tick are seen immediately.
pub fn tick(state: &mut GameState, dt: f64) -> TickReport {
    let credited = production::advance(state, dt);
    let unlocks_fired = unlocks::check(state);
    TickReport {
        credited,
        unlocks_fired,
    }
}

/// Dispatch a command.
pub fn apply(state: &mut GameState, command: Command) -> CommandResult {
    let result = match command {
        Command::StartProduction(id) => production::start(state, id),
        Command::BuyUnits { business, count } => buy_units(state, business, count).map(drop),
        Command::BuyMax(id) => buy_max(state, id).map(drop),
        Command::UnlockBusiness(id) => unlock_business(state, id),
        Command::HireManager(id) => hire_manager(state, id),
        Command::BuyUpgrade(id) => buy_upgrade(state, id),
        Command::ClaimPrestige => prestige::claim(state).map(drop),
        Command::BuyPrestigeUpgrade(id) => prestige::buy_upgrade(state, id),
    };
    match result {
        Err(Rejected::InvalidTarget) => warn!(?command, "command targets nothing"),
        Err(reason) => debug!(?command, %reason, "command rejected"),
        Ok(()) => debug!(?command, "command applied"),
    }
    result
}

fn business_mut(state: &mut GameState, id: usize) -> CommandResult<&mut Business> {
    state.businesses.get_mut(id).ok_or(Rejected::InvalidTarget)
}

/// Arm a managed business that is sitting idle with units.
fn arm_if_managed(state: &mut GameState, id: usize) {
    let ready = state
        .businesses
        .get(id)
        .is_some_and(|b| b.has_manager && !b.in_progress && b.owned > 0);
    if ready {
        let _ = production::start(state, id);
    }
}

/// Buy `count` more units. Returns the price paid.
pub fn buy_units(state: &mut GameState, id: usize, count: u32) -> CommandResult<f64> {
    let money = state.money;
    let business = business_mut(state, id)?;
    if !business.unlocked {
        return Err(Rejected::Locked);
    }
    if count == 0 {
        return Ok(0.0);
    }
    let cost = economy::cost_of_next(business, count);
    if money < cost {
        return Err(Rejected::InsufficientFunds);
    }
    business.owned = business.owned.saturating_add(count);
    let (name, owned) = (business.name.clone(), business.owned);
    state.money -= cost;
    arm_if_managed(state, id);

    state.add_log(
        &format!("Bought {} {} ({} owned) for {}", count, name, owned, format_money(cost)),
        false,
    );
    Ok(cost)
}

/// Buy as many units as the current money allows. Returns how many.
pub fn buy_max(state: &mut GameState, id: usize) -> CommandResult<u32> {
    let business = state.businesses.get(id).ok_or(Rejected::InvalidTarget)?;
    if !business.unlocked {
        return Err(Rejected::Locked);
    }
    let count = economy::max_affordable(business, state.money);
    if count == 0 {
        return Err(Rejected::InsufficientFunds);
    }
    buy_units(state, id, count)?;
    Ok(count)
}

/// Pay `base_cost` once to open a business. Comes with its first unit.
pub fn unlock_business(state: &mut GameState, id: usize) -> CommandResult {
    let money = state.money;
    let business = business_mut(state, id)?;
    if business.unlocked {
        return Err(Rejected::AlreadyPurchased);
    }
    let cost = business.base_cost;
    if money < cost {
        return Err(Rejected::InsufficientFunds);
    }
    business.force_unlock();
    let name = business.name.clone();
    state.money -= cost;
    arm_if_managed(state, id);

    state.add_log(&format!("Opened {}!", name), true);
    Ok(())
}

/// Hire a manager so completed cycles restart on their own.
pub fn hire_manager(state: &mut GameState, id: usize) -> CommandResult {
    let money = state.money;
    let business = business_mut(state, id)?;
    if !business.unlocked {
        return Err(Rejected::Locked);
    }
    if business.has_manager {
        return Err(Rejected::AlreadyPurchased);
    }
    let cost = business.manager_cost;
    if money < cost {
        return Err(Rejected::InsufficientFunds);
    }
    business.has_manager = true;
    let name = business.name.clone();
    state.money -= cost;
    arm_if_managed(state, id);

    state.add_log(&format!("Hired a manager for {}", name), true);
    Ok(())
}

/// Buy a cash upgrade.
pub fn buy_upgrade(state: &mut GameState, index: usize) -> CommandResult {
    let upgrade = state.upgrades.get(index).ok_or(Rejected::InvalidTarget)?;
    if upgrade.purchased {
        return Err(Rejected::AlreadyPurchased);
    }
    if state.money < upgrade.cost {
        return Err(Rejected::InsufficientFunds);
    }
    let (cost, target, boost) = (upgrade.cost, upgrade.target, upgrade.boost);
    let name = upgrade.name.clone();

    state.money -= cost;
    state.upgrades[index].purchased = true;
    state.apply_boost(target, boost);

    state.add_log(&format!("✦ {} applied!", name), true);
    Ok(())
}
