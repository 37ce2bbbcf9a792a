//! Idle Tycoon セーブ/ロード機能。
//!
//! ## バージョニング方針
//!
//! - `SNAPSHOT_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   新フィールドの追加のみの場合はこの値を変えない（旧データを維持できる）。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//!
//! 旧バージョンのセーブデータは、`MIN_COMPATIBLE_VERSION` 以上であれば
//! 不足フィールドにデフォルト値を補完して読み込む。
//!
//! | version | 変更内容 |
//! |---------|----------|
//! | 1 | 初版 |
//! | 2 | `prestige_upgrades_purchased` を追加 |

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::GameConfig;
use super::error::SaveError;
use super::state::GameState;

/// セーブデータのフォーマットバージョン。
/// フィールド追加時にインクリメントすること。
pub const SNAPSHOT_VERSION: u32 = 2;

/// 互換性を維持できる最小バージョン。
/// この値以上のセーブデータは、不足フィールドをデフォルト値で補完して読み込む。
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage のキー。
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "idle_tycoon_save";

/// オートセーブの間隔 (秒)。
pub const AUTOSAVE_INTERVAL_SECS: f64 = 30.0;

/// シリアライズ用のセーブデータ構造体。
/// メッセージログなど一時的な UI 状態は含まない。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub game: GameSave,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSave {
    pub money: f64,
    pub lifetime_earnings: f64,
    pub global_speed_mult: f64,
    pub global_profit_mult: f64,
    /// Unix 秒。オフライン進行の基準。
    /// 欠けている場合や 0 以下の場合は読み込み時刻を使う。
    pub last_timestamp: Option<f64>,
    pub prestige_currency_total: u64,
    pub prestige_currency_spent: u64,

    /// 各ビジネスの状態。GameConfig::businesses の順。
    pub businesses: Vec<BusinessSave>,
    /// 各アップグレードの購入状態。GameConfig::upgrades の順。
    pub upgrades_purchased: Vec<bool>,
    /// 各転生アップグレードの購入状態 (v2 から)。
    pub prestige_upgrades_purchased: Vec<bool>,
    /// 発動済みアンロックの id。
    pub unlocked_shown: Vec<usize>,
}

// 倍率のデフォルトは 1。
impl Default for GameSave {
    fn default() -> Self {
        Self {
            money: 0.0,
            lifetime_earnings: 0.0,
            global_speed_mult: 1.0,
            global_profit_mult: 1.0,
            last_timestamp: None,
            prestige_currency_total: 0,
            prestige_currency_spent: 0,
            businesses: Vec::new(),
            upgrades_purchased: Vec::new(),
            prestige_upgrades_purchased: Vec::new(),
            unlocked_shown: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessSave {
    pub owned: u32,
    pub speed_mult: f64,
    pub profit_mult: f64,
    pub unlocked: bool,
    pub has_manager: bool,
    pub timer: f64,
    pub in_progress: bool,
    /// 省略時は設定ファイルの値を使う。
    pub base_time: Option<f64>,
    pub base_payout: Option<f64>,
}

impl Default for BusinessSave {
    fn default() -> Self {
        Self {
            owned: 0,
            speed_mult: 1.0,
            profit_mult: 1.0,
            unlocked: false,
            has_manager: false,
            timer: 0.0,
            in_progress: false,
            base_time: None,
            base_payout: None,
        }
    }
}

/// GameState からセーブ用データを抽出する。
pub fn extract_save(state: &GameState) -> Snapshot {
    Snapshot {
        version: SNAPSHOT_VERSION,
        game: GameSave {
            money: state.money,
            lifetime_earnings: state.lifetime_earnings,
            global_speed_mult: state.global_speed_mult,
            global_profit_mult: state.global_profit_mult,
            last_timestamp: Some(state.last_timestamp),
            prestige_currency_total: state.prestige_currency_total,
            prestige_currency_spent: state.prestige_currency_spent,
            businesses: state
                .businesses
                .iter()
                .map(|b| BusinessSave {
                    owned: b.owned,
                    speed_mult: b.speed_mult,
                    profit_mult: b.profit_mult,
                    unlocked: b.unlocked,
                    has_manager: b.has_manager,
                    timer: b.timer,
                    in_progress: b.in_progress,
                    base_time: Some(b.base_time),
                    base_payout: Some(b.base_payout),
                })
                .collect(),
            upgrades_purchased: state.upgrades.iter().map(|u| u.purchased).collect(),
            prestige_upgrades_purchased: state
                .prestige_upgrades
                .iter()
                .map(|u| u.purchased)
                .collect(),
            unlocked_shown: state.unlocked_shown.iter().copied().collect(),
        },
    }
}

/// 有限でない値や下限未満の値はデフォルトに置き換える。
fn sane(value: f64, min: f64, default: f64) -> f64 {
    if value.is_finite() && value >= min {
        value
    } else {
        default
    }
}

/// セーブデータを GameState に復元する。
/// 定義の個数が合わない場合は無視して新規データの方を使う。
pub fn apply_save(state: &mut GameState, save: &GameSave) {
    state.money = sane(save.money, 0.0, 0.0);
    state.lifetime_earnings = sane(save.lifetime_earnings, 0.0, 0.0);
    state.global_speed_mult = sane(save.global_speed_mult, 1.0, 1.0);
    state.global_profit_mult = sane(save.global_profit_mult, 1.0, 1.0);
    if let Some(t) = save.last_timestamp.filter(|t| t.is_finite() && *t > 0.0) {
        state.last_timestamp = t;
    }
    state.prestige_currency_total = save.prestige_currency_total;
    state.prestige_currency_spent = save.prestige_currency_spent;

    // ビジネス復元
    for (b, s) in state.businesses.iter_mut().zip(&save.businesses) {
        b.owned = s.owned;
        b.speed_mult = sane(s.speed_mult, 1.0, 1.0);
        b.profit_mult = sane(s.profit_mult, 1.0, 1.0);
        b.unlocked = s.unlocked;
        b.has_manager = s.has_manager;
        b.in_progress = s.in_progress;
        b.timer = sane(s.timer, 0.0, 0.0);
        if let Some(t) = s.base_time.filter(|t| t.is_finite() && *t > 0.0) {
            b.base_time = t;
        }
        if let Some(p) = s.base_payout.filter(|p| p.is_finite() && *p >= 0.0) {
            b.base_payout = p;
        }
    }
    let global_speed = state.global_speed_mult;
    for b in &mut state.businesses {
        b.clamp_timer(global_speed);
    }

    // アップグレード復元
    for (u, &purchased) in state.upgrades.iter_mut().zip(&save.upgrades_purchased) {
        u.purchased = purchased;
    }
    for (u, &purchased) in state
        .prestige_upgrades
        .iter_mut()
        .zip(&save.prestige_upgrades_purchased)
    {
        u.purchased = purchased;
    }

    // アンロック復元 (範囲外の id は捨てる)
    let unlock_count = state.unlocks.len();
    state.unlocked_shown = save
        .unlocked_shown
        .iter()
        .copied()
        .filter(|&id| id < unlock_count)
        .collect();
}

/// GameState を JSON 文字列にする。
pub fn to_json(state: &GameState) -> Result<String, SaveError> {
    serde_json::to_string(&extract_save(state)).map_err(SaveError::Serialize)
}

/// JSON 文字列から GameState を復元する。
/// `now` 時点の新規状態を作ってからセーブデータを上書きする。
pub fn restore(config: &GameConfig, json: &str, now: f64) -> Result<GameState, SaveError> {
    let snapshot: Snapshot = serde_json::from_str(json).map_err(SaveError::Parse)?;

    if snapshot.version < MIN_COMPATIBLE_VERSION {
        return Err(SaveError::TooOld {
            saved: snapshot.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(SaveError::FutureVersion(snapshot.version));
    }
    if snapshot.version < SNAPSHOT_VERSION {
        info!(
            saved = snapshot.version,
            current = SNAPSHOT_VERSION,
            "migrating snapshot"
        );
    }

    let mut state = GameState::new(config, now);
    apply_save(&mut state, &snapshot.game);
    Ok(state)
}

/// セーブデータの保存先。
pub trait SaveStore {
    fn read(&self) -> Result<Option<String>, SaveError>;
    fn write(&self, json: &str) -> Result<(), SaveError>;
    fn clear(&self) -> Result<(), SaveError>;
}

/// メモリ上の保存先。テストとネイティブ実行用。
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn with_contents(json: &str) -> Self {
        Self {
            slot: RefCell::new(Some(json.to_string())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, SaveError> {
        Ok(self.slot.borrow().clone())
    }

    fn write(&self, json: &str) -> Result<(), SaveError> {
        *self.slot.borrow_mut() = Some(json.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SaveError> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

/// ブラウザの localStorage。WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, SaveError> {
        let window =
            web_sys::window().ok_or_else(|| SaveError::Storage("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| SaveError::Storage(format!("{e:?}")))?
            .ok_or_else(|| SaveError::Storage("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStorage {
    fn read(&self) -> Result<Option<String>, SaveError> {
        self.storage
            .get_item(STORAGE_KEY)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn write(&self, json: &str) -> Result<(), SaveError> {
        self.storage
            .set_item(STORAGE_KEY, json)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn clear(&self) -> Result<(), SaveError> {
        self.storage
            .remove_item(STORAGE_KEY)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }
}

/// ゲーム状態を保存する。
pub fn save_game(state: &GameState, store: &dyn SaveStore) -> Result<(), SaveError> {
    let json = to_json(state)?;
    store.write(&json)?;
    debug!(bytes = json.len(), "game saved");
    Ok(())
}

/// 保存先からゲーム状態を復元する。
/// セーブがない、壊れている、バージョンが合わない場合は新規ゲームになる。
/// 壊れたデータは削除する。オフライン進行は呼び出し側で行う。
pub fn load_or_new(config: &GameConfig, store: &dyn SaveStore, now: f64) -> GameState {
    let json = match store.read() {
        Ok(Some(json)) => json,
        Ok(None) => return GameState::new(config, now),
        Err(e) => {
            warn!(error = %e, "could not read save, starting fresh");
            return GameState::new(config, now);
        }
    };

    match restore(config, &json, now) {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "discarding unusable save, starting fresh");
            if let Err(e) = store.clear() {
                warn!(error = %e, "could not clear save");
            }
            let mut state = GameState::new(config, now);
            state.add_log("Save data was unreadable; starting a new game", true);
            state
        }
    }
}
