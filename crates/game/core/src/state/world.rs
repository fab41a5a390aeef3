use std::collections::BTreeMap;

use super::{
    ActorId, ActorPrototype, ActorState, ComponentKind, ObjectRef, ObjectView, Point3, PrototypeId,
};
use crate::error::{EngineError, ErrorSeverity};
use crate::flags::SelectionStatus;
use crate::ledger::ObjectOwner;
use crate::property::PropertySet;
use crate::queue::ActionQueue;

/// Errors raised by [`World`] lookups and lifecycle operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    #[error("prototype {0} not found")]
    PrototypeNotFound(PrototypeId),

    #[error("no prototype named '{0}'")]
    UnknownPrototype(String),

    #[error("{object} has no {component} component")]
    MissingComponent {
        object: ObjectRef,
        component: ComponentKind,
    },
}

impl EngineError for WorldError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownPrototype(_) => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActorNotFound(_) => "WORLD_ACTOR_NOT_FOUND",
            Self::PrototypeNotFound(_) => "WORLD_PROTOTYPE_NOT_FOUND",
            Self::UnknownPrototype(_) => "WORLD_UNKNOWN_PROTOTYPE",
            Self::MissingComponent { .. } => "WORLD_MISSING_COMPONENT",
        }
    }
}

/// Arena of actors and actor prototypes, addressed by handle.
#[derive(Clone, Debug, Default)]
pub struct World {
    actors: BTreeMap<ActorId, ActorState>,
    prototypes: BTreeMap<PrototypeId, ActorPrototype>,
    next_actor: u32,
    next_prototype: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Prototypes
    // ========================================================================

    /// Registers a prototype and returns its freshly assigned handle.
    pub fn add_prototype(&mut self, mut prototype: ActorPrototype) -> PrototypeId {
        let id = PrototypeId(self.next_prototype);
        self.next_prototype += 1;
        prototype.id = id;
        self.prototypes.insert(id, prototype);
        id
    }

    pub fn prototype(&self, id: PrototypeId) -> Option<&ActorPrototype> {
        self.prototypes.get(&id)
    }

    pub fn prototype_mut(&mut self, id: PrototypeId) -> Option<&mut ActorPrototype> {
        self.prototypes.get_mut(&id)
    }

    pub fn find_prototype(&self, name: &str) -> Option<PrototypeId> {
        self.prototypes
            .values()
            .find(|proto| proto.name == name)
            .map(|proto| proto.id)
    }

    pub fn prototypes(&self) -> impl Iterator<Item = &ActorPrototype> {
        self.prototypes.values()
    }

    // ========================================================================
    // Actors
    // ========================================================================

    /// Inserts an actor and returns its freshly assigned handle.
    pub fn insert_actor(&mut self, mut actor: ActorState) -> ActorId {
        let id = ActorId(self.next_actor);
        self.next_actor += 1;
        actor.assign_id(id);
        self.actors.insert(id, actor);
        id
    }

    pub fn spawn(
        &mut self,
        prototype: PrototypeId,
        name: impl Into<String>,
        position: Point3,
    ) -> Result<ActorId, WorldError> {
        let proto = self
            .prototypes
            .get(&prototype)
            .ok_or(WorldError::PrototypeNotFound(prototype))?;
        let actor = ActorState::from_prototype(proto, name, position);
        Ok(self.insert_actor(actor))
    }

    /// Rebuilds an actor from another prototype in place.
    ///
    /// The handle, name and position survive; everything else comes from the
    /// prototype. The replaced state is returned so the caller can dispose of
    /// its queue.
    pub fn recreate_actor(
        &mut self,
        id: ActorId,
        prototype: PrototypeId,
    ) -> Result<ActorState, WorldError> {
        let proto = self
            .prototypes
            .get(&prototype)
            .ok_or(WorldError::PrototypeNotFound(prototype))?;
        let slot = self.actors.get_mut(&id).ok_or(WorldError::ActorNotFound(id))?;
        let mut fresh = ActorState::from_prototype(proto, slot.name.clone(), slot.position);
        fresh.assign_id(id);
        Ok(std::mem::replace(slot, fresh))
    }

    pub fn remove_actor(&mut self, id: ActorId) -> Option<ActorState> {
        self.actors.remove(&id)
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut ActorState> {
        self.actors.get_mut(&id)
    }

    pub fn find_actor(&self, name: &str) -> Option<ActorId> {
        self.actors
            .values()
            .find(|actor| actor.name == name)
            .map(|actor| actor.id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorState> {
        self.actors.values()
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn set_available(&mut self, id: ActorId, available: bool) -> Result<(), WorldError> {
        self.actor_mut(id)
            .ok_or(WorldError::ActorNotFound(id))?
            .set_available(available);
        Ok(())
    }

    pub fn queue_mut(&mut self, id: ActorId) -> Result<&mut ActionQueue, WorldError> {
        self.actor_mut(id)
            .ok_or(WorldError::ActorNotFound(id))?
            .action_queue
            .as_mut()
            .ok_or(WorldError::MissingComponent {
                object: ObjectRef::Actor(id),
                component: ComponentKind::ActionQueue,
            })
    }

    /// Ledger of an actor or prototype.
    pub fn ledger_mut(&mut self, object: ObjectRef) -> Result<&mut ObjectOwner, WorldError> {
        let missing = || WorldError::MissingComponent {
            object,
            component: ComponentKind::ObjectOwner,
        };
        match object {
            ObjectRef::Actor(id) => self
                .actor_mut(id)
                .ok_or(WorldError::ActorNotFound(id))?
                .object_owner
                .as_mut()
                .ok_or_else(missing),
            ObjectRef::Prototype(id) => self
                .prototype_mut(id)
                .ok_or(WorldError::PrototypeNotFound(id))?
                .object_owner
                .as_mut()
                .ok_or_else(missing),
        }
    }
}

impl ObjectView for World {
    fn properties(&self, object: ObjectRef) -> Option<&PropertySet> {
        match object {
            ObjectRef::Actor(id) => self.actor(id).map(|a| &a.properties),
            ObjectRef::Prototype(id) => self.prototype(id).map(|p| &p.properties),
        }
    }

    fn has_component(&self, object: ObjectRef, kind: ComponentKind) -> bool {
        match object {
            ObjectRef::Actor(id) => self.actor(id).is_some_and(|a| a.has_component(kind)),
            ObjectRef::Prototype(id) => self.prototype(id).is_some_and(|p| {
                p.components.contains(&kind)
                    || (kind == ComponentKind::ObjectOwner && p.object_owner.is_some())
            }),
        }
    }

    fn selection(&self, object: ObjectRef) -> Option<SelectionStatus> {
        object
            .as_actor()
            .and_then(|id| self.actor(id))
            .and_then(|a| a.selection)
    }

    fn object_owner(&self, object: ObjectRef) -> Option<&ObjectOwner> {
        match object {
            ObjectRef::Actor(id) => self.actor(id).and_then(|a| a.object_owner.as_ref()),
            ObjectRef::Prototype(id) => self.prototype(id).and_then(|p| p.object_owner.as_ref()),
        }
    }
}
