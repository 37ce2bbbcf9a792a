//! Why a command was refused, or a snapshot could not be used.

use thiserror::Error;

/// A command that could not be carried out. Rejections never mutate state;
/// the front-end is expected to have greyed the control out already.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("not enough money")]
    InsufficientFunds,
    #[error("already purchased")]
    AlreadyPurchased,
    #[error("no such business or upgrade")]
    InvalidTarget,
    #[error("business is locked")]
    Locked,
    #[error("business has no units")]
    NotOwned,
    #[error("production already running")]
    Busy,
    #[error("nothing to claim")]
    NothingToClaim,
}

pub type CommandResult<T = ()> = Result<T, Rejected>;

/// Why a snapshot could not be written or read back.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("snapshot version {saved} is older than the oldest supported ({min})")]
    TooOld { saved: u32, min: u32 },
    #[error("snapshot version {0} was written by a newer build")]
    FutureVersion(u32),
    #[error("storage unavailable: {0}")]
    Storage(String),
}
