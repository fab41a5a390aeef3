//! Errors surfaced by the runtime API.
//!
//! Failures inside a tick never reach the caller (they are logged and end
//! up clearing the affected queue); these cover the host-facing calls.
use thiserror::Error;

use action_core::{ActorId, EngineError, ErrorSeverity, FlagParseError, WorldError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no action catalogue loaded")]
    ActionsNotLoaded,

    #[error("unknown action prototype '{0}'")]
    UnknownAction(String),

    #[error("actor {actor} cannot emit action '{action}'")]
    CannotEmit { actor: ActorId, action: String },

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("invalid action type in save data")]
    ActionType(#[from] FlagParseError),

    #[error("save data is not valid JSON")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to access save file")]
    Io(#[from] std::io::Error),
}

impl EngineError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ActionsNotLoaded => ErrorSeverity::Recoverable,
            Self::UnknownAction(_) | Self::CannotEmit { .. } => ErrorSeverity::Validation,
            Self::World(err) => err.severity(),
            Self::ActionType(err) => err.severity(),
            Self::Serialization(_) => ErrorSeverity::Validation,
            Self::Io(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActionsNotLoaded => "RUNTIME_ACTIONS_NOT_LOADED",
            Self::UnknownAction(_) => "RUNTIME_UNKNOWN_ACTION",
            Self::CannotEmit { .. } => "RUNTIME_CANNOT_EMIT",
            Self::World(err) => err.error_code(),
            Self::ActionType(err) => err.error_code(),
            Self::Serialization(_) => "RUNTIME_SAVE_FORMAT",
            Self::Io(_) => "RUNTIME_SAVE_IO",
        }
    }
}
