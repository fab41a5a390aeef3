//! Script host backed by Rust closures.

use std::collections::HashMap;
use std::fmt;

use action_core::{ScriptCall, ScriptError, ScriptHost, ScriptValue};

type ScriptFn = Box<dyn FnMut(ScriptCall<'_>) -> Result<ScriptValue, ScriptError> + Send>;

/// Named callbacks invoked by the executor.
///
/// Start scripts return an init code (`Int`), action scripts a completion
/// flag (`Bool`), end scripts anything.
#[derive(Default)]
pub struct ScriptRegistry {
    scripts: HashMap<String, ScriptFn>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fallible script, replacing any previous one of that name.
    pub fn register<F>(&mut self, name: impl Into<String>, script: F)
    where
        F: FnMut(ScriptCall<'_>) -> Result<ScriptValue, ScriptError> + Send + 'static,
    {
        let name = name.into();
        if self.scripts.insert(name.clone(), Box::new(script)).is_some() {
            tracing::debug!(script = %name, "script replaced");
        }
    }

    /// Registers a script answering whether the action is done.
    pub fn register_bool<F>(&mut self, name: impl Into<String>, mut script: F)
    where
        F: FnMut(ScriptCall<'_>) -> bool + Send + 'static,
    {
        self.register(name, move |call| Ok(ScriptValue::Bool(script(call))));
    }

    /// Registers a start script returning an init code.
    pub fn register_init<F>(&mut self, name: impl Into<String>, mut script: F)
    where
        F: FnMut(ScriptCall<'_>) -> i64 + Send + 'static,
    {
        self.register(name, move |call| Ok(ScriptValue::Int(script(call))));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.scripts.keys().collect();
        names.sort();
        f.debug_struct("ScriptRegistry").field("scripts", &names).finish()
    }
}

impl ScriptHost for ScriptRegistry {
    fn invoke(&mut self, name: &str, call: ScriptCall<'_>) -> Result<ScriptValue, ScriptError> {
        let script = self
            .scripts
            .get_mut(name)
            .ok_or_else(|| ScriptError::NotFound(name.to_owned()))?;
        tracing::trace!(script = name, actor = %call.actor, "invoking script");
        script(call)
    }
}
