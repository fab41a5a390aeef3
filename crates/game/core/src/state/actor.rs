use std::collections::BTreeSet;

use super::{ActorId, ComponentKind, Point3, PrototypeId};
use crate::flags::SelectionStatus;
use crate::ledger::ObjectOwner;
use crate::property::PropertySet;
use crate::queue::ActionQueue;

/// Template an actor is spawned from.
#[derive(Clone, Debug, Default)]
pub struct ActorPrototype {
    pub id: PrototypeId,
    pub name: String,
    pub properties: PropertySet,
    pub components: BTreeSet<ComponentKind>,
    /// Status given to spawned actors that carry [`ComponentKind::Selectable`].
    pub selection: SelectionStatus,
    /// Objects held by the prototype itself (e.g. a container's default load).
    pub object_owner: Option<ObjectOwner>,
}

impl ActorPrototype {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selection: SelectionStatus::IS_SELECTABLE | SelectionStatus::IS_ACTION_TARGET,
            ..Self::default()
        }
    }

    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_component(mut self, kind: ComponentKind) -> Self {
        self.components.insert(kind);
        self
    }

    pub fn with_selection(mut self, selection: SelectionStatus) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_object_owner(mut self, owner: ObjectOwner) -> Self {
        self.object_owner = Some(owner);
        self
    }
}

/// A live actor.
#[derive(Clone, Debug, Default)]
pub struct ActorState {
    pub id: ActorId,
    pub name: String,
    pub prototype: Option<PrototypeId>,
    pub position: Point3,
    pub properties: PropertySet,
    /// Marker components; data-backed components are the `Option` fields.
    pub components: BTreeSet<ComponentKind>,
    pub selection: Option<SelectionStatus>,
    pub object_owner: Option<ObjectOwner>,
    pub action_queue: Option<ActionQueue>,
}

impl ActorState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds a fresh actor from a prototype. The id is assigned by the world.
    pub fn from_prototype(prototype: &ActorPrototype, name: impl Into<String>, position: Point3) -> Self {
        let mut actor = Self::new(name);
        actor.prototype = Some(prototype.id);
        actor.position = position;
        actor.properties = prototype.properties.clone();
        for kind in &prototype.components {
            actor.add_component(*kind);
        }
        if let Some(selection) = actor.selection.as_mut() {
            *selection = prototype.selection;
        }
        actor
    }

    pub fn with_position(mut self, position: Point3) -> Self {
        self.position = position;
        self
    }

    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_component(mut self, kind: ComponentKind) -> Self {
        self.add_component(kind);
        self
    }

    pub fn with_selection(mut self, selection: SelectionStatus) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Attaches a component, instantiating its data if it has any.
    pub fn add_component(&mut self, kind: ComponentKind) {
        match kind {
            ComponentKind::Selectable => {
                self.selection.get_or_insert(
                    SelectionStatus::IS_SELECTABLE | SelectionStatus::IS_ACTION_TARGET,
                );
            }
            ComponentKind::ObjectOwner => {
                self.object_owner.get_or_insert_with(ObjectOwner::new);
            }
            ComponentKind::ActionQueue => {
                let id = self.id;
                self.action_queue.get_or_insert_with(|| ActionQueue::new(id));
            }
            marker => {
                self.components.insert(marker);
            }
        }
    }

    pub fn has_component(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Selectable => self.selection.is_some(),
            ComponentKind::ObjectOwner => self.object_owner.is_some(),
            ComponentKind::ActionQueue => self.action_queue.is_some(),
            marker => self.components.contains(&marker),
        }
    }

    /// Hides the actor from selection and targeting, or reverses that.
    pub fn set_available(&mut self, available: bool) {
        if let Some(selection) = self.selection.as_mut() {
            selection.set(
                SelectionStatus::IS_HIDDEN | SelectionStatus::IS_UNAVAILABLE,
                !available,
            );
        }
    }

    pub fn is_available(&self) -> bool {
        self.selection.is_none_or(|s| {
            !s.intersects(SelectionStatus::IS_HIDDEN | SelectionStatus::IS_UNAVAILABLE)
        })
    }

    pub(crate) fn assign_id(&mut self, id: ActorId) {
        self.id = id;
        if let Some(queue) = self.action_queue.as_mut() {
            queue.set_owner(id);
        }
    }
}
