//! Collaborator access errors.
use crate::error::{EngineError, ErrorSeverity};

/// A collaborator required by an action is not wired into the [`ExecEnv`](super::ExecEnv).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    #[error("script host not available")]
    ScriptsNotAvailable,

    #[error("movement driver not available")]
    MovementNotAvailable,
}

impl EngineError for EnvError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ScriptsNotAvailable => "ENV_SCRIPTS_NOT_AVAILABLE",
            Self::MovementNotAvailable => "ENV_MOVEMENT_NOT_AVAILABLE",
        }
    }
}
