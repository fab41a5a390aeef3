//! Host-side orchestration for the action engine.
//!
//! [`ActionRuntime`] bundles a [`World`](action_core::World), the action
//! catalogue and the executor behind one API, publishes engine events on a
//! topic-based [`EventBus`], and reads and writes JSON save files.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and its builder
//! - [`events`] provides the broadcast event bus
//! - [`persistence`] captures and restores queues and ledgers
//! - [`scripts`] and [`movement`] are stock collaborators for hosts without
//!   their own script engine or path finder
pub mod error;
pub mod events;
pub mod movement;
pub mod persistence;
pub mod runtime;
pub mod scripts;

pub use error::{Result, RuntimeError};
pub use events::{EventBus, Topic};
pub use movement::LinearMovement;
pub use persistence::{ActionRecord, ActorRecord, OwnedRecord, SAVE_VERSION, SaveFile};
pub use runtime::{ActionRuntime, ActionRuntimeBuilder, Placement};
pub use scripts::ScriptRegistry;
