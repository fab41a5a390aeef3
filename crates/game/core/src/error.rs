//! Common error infrastructure for action-core.
//!
//! Domain-specific errors (e.g. [`FlagParseError`](crate::flags::FlagParseError),
//! [`FilterError`](crate::filter::FilterError)) live next to the code that raises
//! them. This module provides the severity classification they all share.
//!
//! Errors raised while the executor advances a queue never leave
//! [`ActionExecutor::update`](crate::executor::ActionExecutor::update); they are
//! logged and turned into a local outcome (queue clear, finish, retry). The
//! severity tells the host how loudly to report the ones that do surface, such
//! as configuration and world-registry errors.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: may succeed on a later tick without changes
/// - **Validation**: invalid input, reject without retry
/// - **Internal**: unexpected state inconsistency, investigate
/// - **Fatal**: cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition, e.g. a collaborator that is not wired up yet.
    Recoverable,

    /// Invalid input, e.g. an unknown flag token in a catalogue.
    Validation,

    /// Unexpected state inconsistency, e.g. a queue on an actor that vanished.
    Internal,

    /// Unrecoverable, e.g. a corrupted save.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all action-core errors.
///
/// All error enums derive `thiserror::Error` for `Display`/`Error` and
/// implement this trait for classification.
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Internal.as_str(), "internal");
    }
}
