//! Idle Tycoon: buy businesses, run them, hire managers, prestige.
pub mod config;
pub mod economy;
pub mod error;
pub mod logic;
pub mod offline;
pub mod prestige;
pub mod production;
pub mod render;
pub mod save;
pub mod simulator;
pub mod state;
pub mod unlocks;
pub mod view;

use config::GameConfig;
use logic::Command;
use state::GameState;
use view::{GameView, UPGRADE_SLOTS};

/// A running game plus the front-end's cursor.
pub struct TycoonGame {
    pub state: GameState,
    /// Business row under the cursor.
    pub selected: usize,
}

impl TycoonGame {
    pub fn new(config: &GameConfig, now: f64) -> Self {
        Self::from_state(GameState::new(config, now))
    }

    pub fn from_state(state: GameState) -> Self {
        Self { state, selected: 0 }
    }

    pub fn view(&self) -> GameView {
        let mut view = GameView::from_state(&self.state);
        view.selected = Some(self.selected);
        view
    }

    /// Map a key to a command and apply it. Returns whether the key was
    /// recognised; a recognised key whose command is rejected still counts.
    pub fn handle_key(&mut self, key: char) -> bool {
        let count = self.state.businesses.len();
        let id = self.selected;
        let command = match key {
            'j' => {
                if count > 0 {
                    self.selected = (self.selected + 1) % count;
                }
                return true;
            }
            'k' => {
                if count > 0 {
                    self.selected = (self.selected + count - 1) % count;
                }
                return true;
            }
            'b' => Command::BuyUnits { business: id, count: 1 },
            'm' => Command::BuyMax(id),
            'u' => Command::UnlockBusiness(id),
            'h' => Command::HireManager(id),
            'r' | ' ' => Command::StartProduction(id),
            'P' => Command::ClaimPrestige,
            'a'..='f' => {
                // Map 'a'..'f' to available upgrade indices
                let slot = (key as u8 - b'a') as usize;
                let real_idx = self
                    .state
                    .upgrades
                    .iter()
                    .enumerate()
                    .filter(|(_, u)| !u.purchased)
                    .take(UPGRADE_SLOTS)
                    .nth(slot)
                    .map(|(i, _)| i);
                match real_idx {
                    Some(i) => Command::BuyUpgrade(i),
                    None => return true,
                }
            }
            '1'..='9' => Command::BuyPrestigeUpgrade((key as u8 - b'1') as usize),
            _ => return false,
        };
        // Rejections are logged by apply.
        logic::apply(&mut self.state, command).ok();
        true
    }
}
