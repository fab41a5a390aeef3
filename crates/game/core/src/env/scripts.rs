//! Scripting collaborator.
use crate::action::Action;
use crate::error::{EngineError, ErrorSeverity};
use crate::state::ActorId;

/// Arguments of a script call: the acting actor, the action being run and,
/// for per-tick scripts, the elapsed simulation time.
#[derive(Debug)]
pub struct ScriptCall<'a> {
    pub actor: ActorId,
    pub action: &'a mut Action,
    pub elapsed: Option<f32>,
}

/// Value returned by a script.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptValue {
    Unit,
    Bool(bool),
    Int(i64),
}

impl ScriptValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            Self::Int(v) => Some(*v != 0),
            Self::Unit => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Bool(v) => Some(i64::from(*v)),
            Self::Unit => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("script '{0}' is not registered")]
    NotFound(String),

    #[error("script '{name}' failed: {reason}")]
    Failed { name: String, reason: String },

    #[error("script '{name}' returned {found}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: String,
    },
}

impl EngineError for ScriptError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound(_) => ErrorSeverity::Validation,
            Self::Failed { .. } | Self::TypeMismatch { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "SCRIPT_NOT_FOUND",
            Self::Failed { .. } => "SCRIPT_FAILED",
            Self::TypeMismatch { .. } => "SCRIPT_TYPE_MISMATCH",
        }
    }
}

/// Invokes named callbacks.
pub trait ScriptHost {
    fn invoke(&mut self, name: &str, call: ScriptCall<'_>) -> Result<ScriptValue, ScriptError>;

    /// Invokes a script expected to answer yes or no.
    fn invoke_bool(&mut self, name: &str, call: ScriptCall<'_>) -> Result<bool, ScriptError> {
        let value = self.invoke(name, call)?;
        value.as_bool().ok_or_else(|| ScriptError::TypeMismatch {
            name: name.to_owned(),
            expected: "bool",
            found: format!("{value:?}"),
        })
    }

    /// Invokes a script expected to return an integer code.
    fn invoke_int(&mut self, name: &str, call: ScriptCall<'_>) -> Result<i64, ScriptError> {
        let value = self.invoke(name, call)?;
        value.as_int().ok_or_else(|| ScriptError::TypeMismatch {
            name: name.to_owned(),
            expected: "int",
            found: format!("{value:?}"),
        })
    }
}
