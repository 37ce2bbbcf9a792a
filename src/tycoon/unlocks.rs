//! Owned-unit threshold unlocks. Each fires at most once per run.

use tracing::debug;

use super::config::Target;
use super::state::GameState;

/// Fire every unlock whose threshold is met and that has not fired yet.
/// Returns the ids that fired on this call.
pub fn check(state: &mut GameState) -> Vec<usize> {
    let ready: Vec<usize> = state
        .unlocks
        .iter()
        .enumerate()
        .filter(|(id, _)| !state.unlocked_shown.contains(id))
        .filter(|(_, u)| match u.business {
            Some(b) => state
                .businesses
                .get(b)
                .is_some_and(|biz| biz.owned >= u.threshold),
            None => state.businesses.iter().all(|biz| biz.owned >= u.threshold),
        })
        .map(|(id, _)| id)
        .collect();

    for &id in &ready {
        let unlock = state.unlocks[id].clone();
        match unlock.business {
            Some(b) => state.apply_boost(Target::Business(b), unlock.boost),
            None => state.apply_global_boost(unlock.boost),
        }
        state.unlocked_shown.insert(id);

        let who = match unlock.business {
            Some(b) => state.businesses[b].name.clone(),
            None => "All businesses".to_string(),
        };
        debug!(id, threshold = unlock.threshold, boost = ?unlock.boost, "unlock fired");
        state.add_log(
            &format!(
                "★ {} reached {}: {:?} x{}",
                who, unlock.threshold, unlock.boost.kind, unlock.boost.factor
            ),
            true,
        );
    }
    ready
}
