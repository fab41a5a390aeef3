//! Collaborators the executor calls out to.
//!
//! The engine never owns a script interpreter, path finder or renderer. The
//! host lends them for the duration of a tick through an [`ExecEnv`]; any of
//! them may be absent, in which case the actions needing it fail locally.
mod error;
mod movement;
mod scripts;

pub use error::EnvError;
pub use movement::{Animator, MoveReadiness, MoveStep, MovementDriver, PathStatus, SpatialQuery};
pub use scripts::{ScriptCall, ScriptError, ScriptHost, ScriptValue};

/// Collaborators borrowed for one executor pass.
#[derive(Default)]
pub struct ExecEnv<'a> {
    scripts: Option<&'a mut dyn ScriptHost>,
    movement: Option<&'a mut dyn MovementDriver>,
    spatial: Option<&'a dyn SpatialQuery>,
    animator: Option<&'a mut dyn Animator>,
}

impl<'a> ExecEnv<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_scripts(mut self, scripts: &'a mut dyn ScriptHost) -> Self {
        self.scripts = Some(scripts);
        self
    }

    pub fn with_movement(mut self, movement: &'a mut dyn MovementDriver) -> Self {
        self.movement = Some(movement);
        self
    }

    pub fn with_spatial(mut self, spatial: &'a dyn SpatialQuery) -> Self {
        self.spatial = Some(spatial);
        self
    }

    pub fn with_animator(mut self, animator: &'a mut dyn Animator) -> Self {
        self.animator = Some(animator);
        self
    }

    /// Returns the script host, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::ScriptsNotAvailable` if no script host was provided.
    pub fn scripts(&mut self) -> Result<&mut (dyn ScriptHost + 'a), EnvError> {
        self.scripts
            .as_deref_mut()
            .ok_or(EnvError::ScriptsNotAvailable)
    }

    /// Returns the movement driver, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::MovementNotAvailable` if no movement driver was provided.
    pub fn movement(&mut self) -> Result<&mut (dyn MovementDriver + 'a), EnvError> {
        self.movement
            .as_deref_mut()
            .ok_or(EnvError::MovementNotAvailable)
    }

    pub fn spatial(&self) -> Option<&'a dyn SpatialQuery> {
        self.spatial
    }

    /// Triggers an animation if an animator is wired in.
    pub fn animate(&mut self, actor: crate::state::ActorId, animation: &str) {
        if let Some(animator) = self.animator.as_deref_mut() {
            animator.set_animation(actor, animation);
        }
    }
}
