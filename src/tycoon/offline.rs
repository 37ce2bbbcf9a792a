//! Offline catch-up: fast-forward the wall-clock time that passed while the
//! game was closed (or the tab was in the background).

use tracing::info;

use crate::format::format_money;

use super::state::GameState;

/// Outcome of one catch-up pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OfflineReport {
    /// Seconds between `last_timestamp` and `now`, floored at zero.
    pub elapsed: f64,
    pub credited: f64,
    /// Completed cycles across all businesses.
    pub cycles: f64,
}

/// Credit production for the gap between `state.last_timestamp` and `now`
/// and leave every timer as if the game had kept running.
///
/// Every business with units progresses. Two cases per business:
/// - the gap covers at least one full cycle: credit `floor(elapsed / t)`
///   cycles from a cold start; a managed business keeps running with the
///   leftover time taken off its next cycle, an unmanaged one ends idle;
/// - it does not: drain a running timer by the gap, crediting one cycle if
///   it runs out. An idle business has no timer to drain.
pub fn catch_up(state: &mut GameState, now: f64) -> OfflineReport {
    let elapsed = (now - state.last_timestamp).max(0.0);
    let elapsed = if elapsed.is_finite() { elapsed } else { 0.0 };
    let m = state.multipliers();
    let mut report = OfflineReport {
        elapsed,
        ..OfflineReport::default()
    };

    for business in &mut state.businesses {
        if business.owned == 0 {
            continue;
        }
        let Some(cycle) = business.effective_cycle_time(m.speed) else {
            continue;
        };
        let one_cycle = business.cycle_payout(m);
        let cycles = (elapsed / cycle).floor();

        if cycles > 0.0 {
            let mut completed = cycles;
            let remainder = elapsed - cycles * cycle;
            if business.has_manager {
                business.in_progress = true;
                if remainder >= cycle {
                    completed += 1.0;
                    business.timer = cycle - (remainder - cycle);
                } else {
                    business.timer = cycle - remainder;
                }
            } else {
                business.in_progress = false;
                business.timer = 0.0;
            }
            report.credited += one_cycle * completed;
            report.cycles += completed;
        } else if business.in_progress {
            let timer = business.timer - elapsed;
            if timer <= 0.0 {
                report.credited += one_cycle;
                report.cycles += 1.0;
                if business.has_manager {
                    business.in_progress = true;
                    business.timer = cycle;
                } else {
                    business.in_progress = false;
                    business.timer = 0.0;
                }
            } else {
                business.in_progress = true;
                business.timer = timer;
            }
        }
    }

    state.earn(report.credited);
    state.last_timestamp = now;

    if report.credited > 0.0 {
        info!(
            elapsed = report.elapsed,
            credited = report.credited,
            cycles = report.cycles,
            "offline catch-up"
        );
        state.add_log(
            &format!(
                "While you were away ({:.0}s) you earned {}",
                report.elapsed,
                format_money(report.credited)
            ),
            true,
        );
    }
    report
}
