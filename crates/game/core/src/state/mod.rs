//! Actor registry the engine operates on.
//!
//! Actors and actor prototypes live in a [`World`] arena and are referred to
//! by handle everywhere else: queued actions, ledgers and filters never hold
//! the actor itself.
mod actor;
mod component;
mod types;
mod view;
mod world;

pub use actor::{ActorPrototype, ActorState};
pub use component::ComponentKind;
pub use types::{ActorId, ObjectRef, Point3, PrototypeId};
pub use view::ObjectView;
pub use world::{World, WorldError};
