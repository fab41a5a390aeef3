//! Boolean predicates over actors.
//!
//! An [`ActorFilter`] combines a selection-status mask with an optional
//! [`LogicFilter`] tree whose leaves compare a property ([`PropertyFilter`])
//! or require a set of components. Filters are built once from content and
//! evaluated many times against an [`ObjectView`](crate::state::ObjectView).
mod actor;
mod logic;
mod property;

pub use actor::{ActorFilter, ActorLeaf, RequiredMode};
pub use logic::{LogicFilter, LogicOperator};
pub use property::{Comparison, PropertyFilter, ValueType};

use crate::error::{EngineError, ErrorSeverity};

/// Errors raised while building filters from content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("comparison {comparison} is not supported for {value_type} values")]
    UnsupportedComparison {
        value_type: ValueType,
        comparison: Comparison,
    },

    #[error("'{text}' is not a valid {value_type} value")]
    InvalidValue { value_type: ValueType, text: String },

    #[error("invalid regex '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("unknown value type '{0}'")]
    UnknownValueType(String),

    #[error("unknown comparison '{0}'")]
    UnknownComparison(String),

    #[error("unknown logic operator '{0}'")]
    UnknownOperator(String),
}

impl EngineError for FilterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedComparison { .. } => "FILTER_UNSUPPORTED_COMPARISON",
            Self::InvalidValue { .. } => "FILTER_INVALID_VALUE",
            Self::InvalidRegex { .. } => "FILTER_INVALID_REGEX",
            Self::UnknownValueType(_) => "FILTER_UNKNOWN_VALUE_TYPE",
            Self::UnknownComparison(_) => "FILTER_UNKNOWN_COMPARISON",
            Self::UnknownOperator(_) => "FILTER_UNKNOWN_OPERATOR",
        }
    }
}
