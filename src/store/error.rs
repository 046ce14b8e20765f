use super::machine::{HydrationEvent, HydrationState};
use crate::tokens::{ColorName, SpacingKey};
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid hydration transition: from {from:?} using event {event:?}")]
    InvalidTransition {
        from: HydrationState,
        event: HydrationEvent,
    },
    #[error("unknown {set} key `{key}`")]
    UnknownKey { set: &'static str, key: String },
    #[error("invalid {set} entry `{key}`: {reason}")]
    InvalidEntry {
        set: &'static str,
        key: String,
        reason: String,
    },
    #[error("invalid hex color for {name}: {value:?}")]
    InvalidColor { name: ColorName, value: String },
    #[error("patch does not fit spacing entry `{key}`")]
    PatchMismatch { key: SpacingKey },
}
