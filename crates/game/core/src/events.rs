//! Notifications produced while queues change and actions run.
use crate::state::{ActorId, PrototypeId};

/// Observable engine event, collected by the executor and drained by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionEvent {
    /// The actor's queue was mutated.
    QueueUpdated { actor: ActorId },
    /// The actor started or stopped walking.
    ActorMoving { actor: ActorId, moving: bool },
    /// The actor was rebuilt from another prototype; its queue is gone.
    ActorRecreated { actor: ActorId, prototype: PrototypeId },
    /// A new actor was spawned from a carried prototype.
    ActorSpawned { actor: ActorId, from: PrototypeId },
}

impl ActionEvent {
    pub fn actor(&self) -> ActorId {
        match self {
            Self::QueueUpdated { actor }
            | Self::ActorMoving { actor, .. }
            | Self::ActorRecreated { actor, .. }
            | Self::ActorSpawned { actor, .. } => *actor,
        }
    }
}
