//! Action execution engine: queued behaviors for game actors.
//!
//! `action-core` holds the scheduling rules and their data model. Actors live
//! in a [`World`]; each actor able to act carries an [`ActionQueue`]; the
//! [`ActionExecutor`] advances the front action of every non-empty queue once
//! per tick, reading and writing [`ObjectOwner`] ledgers and calling out to
//! the collaborators lent through an [`ExecEnv`]. [`ActionPrototype`]s and
//! [`ActorFilter`]s decide which actions an actor may emit or be targeted by.
//!
//! The crate performs no I/O; content loading and persistence live in
//! `action-content` and `action-runtime`.
pub mod action;
pub mod config;
pub mod env;
pub mod error;
pub mod events;
pub mod executor;
pub mod filter;
pub mod flags;
pub mod ledger;
pub mod property;
pub mod queue;
pub mod state;

pub use action::{Action, ActionPrototype, ActionPrototypeBuilder, InitState, LocalizedText, SubAction};
pub use config::{EngineConfig, ExecutorConfig};
pub use env::{
    Animator, EnvError, ExecEnv, MoveReadiness, MoveStep, MovementDriver, PathStatus, ScriptCall,
    ScriptError, ScriptHost, ScriptValue, SpatialQuery,
};
pub use error::{EngineError, ErrorSeverity};
pub use events::ActionEvent;
pub use executor::{ActionError, ActionExecutor, PauseState};
pub use filter::{
    ActorFilter, ActorLeaf, Comparison, FilterError, LogicFilter, LogicOperator, PropertyFilter,
    RequiredMode, ValueType,
};
pub use flags::{
    ActionFlags, ActionKind, ActionType, FlagParseError, NeedMask, SelectionStatus,
    parse_flag_list,
};
pub use ledger::{Holding, ObjectOwner, reserve_transfer};
pub use property::{PropertySet, PropertyValue};
pub use queue::ActionQueue;
pub use state::{
    ActorId, ActorPrototype, ActorState, ComponentKind, ObjectRef, ObjectView, Point3,
    PrototypeId, World, WorldError,
};
