//! Registry of named action prototypes.

use std::collections::HashMap;
use std::sync::Arc;

use action_core::{ActionPrototype, ActorId, ObjectRef, ObjectView};

/// Outcome of [`ActionFactory::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    Inserted,
    /// A lower-priority prototype of the same name was dropped.
    Replaced { previous: i32 },
    /// A prototype of the same name with equal or higher priority is kept.
    Ignored { existing: i32 },
}

/// Action prototypes by unique name.
///
/// Prototypes are shared with every action instantiated from them, so the
/// registry hands out `Arc`s; dropping the registry does not invalidate
/// queued actions.
#[derive(Clone, Debug, Default)]
pub struct ActionFactory {
    actions: HashMap<String, Arc<ActionPrototype>>,
}

impl ActionFactory {
    /// Name that always resolves to "no prototype" (hidden actions in saves).
    pub const NULL_NAME: &'static str = "NULL";

    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a prototype under its name.
    ///
    /// On a name clash the prototype with the strictly higher priority wins;
    /// on a tie the one registered first stays.
    pub fn register(&mut self, prototype: ActionPrototype) -> Registration {
        let name = prototype.name().to_owned();
        let priority = prototype.priority();

        let outcome = match self.actions.get(&name) {
            None => Registration::Inserted,
            Some(existing) if existing.priority() < priority => Registration::Replaced {
                previous: existing.priority(),
            },
            Some(existing) => {
                tracing::info!(
                    action = %name,
                    priority,
                    existing = existing.priority(),
                    "ignoring action prototype with lower or equal priority"
                );
                return Registration::Ignored {
                    existing: existing.priority(),
                };
            }
        };

        if let Registration::Replaced { previous } = outcome {
            tracing::info!(action = %name, priority, previous, "replacing action prototype");
        }
        tracing::debug!(
            action = %name,
            action_type = %prototype.action_type(),
            need = ?prototype.need_mask(),
            "registered action prototype"
        );
        self.actions.insert(name, Arc::new(prototype));
        outcome
    }

    /// Looks up a prototype. `"NULL"` and unknown names yield `None`.
    pub fn get_action(&self, name: &str) -> Option<Arc<ActionPrototype>> {
        if name == Self::NULL_NAME {
            return None;
        }
        let found = self.actions.get(name).cloned();
        if found.is_none() {
            tracing::debug!(action = name, "action prototype not found");
        }
        found
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Prototypes sorted by name.
    pub fn prototypes(&self) -> Vec<&Arc<ActionPrototype>> {
        let mut all: Vec<_> = self.actions.values().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    /// Whether `actor` lists `name` in its possible-actions property.
    ///
    /// With `full_check` the prototype's executor filter must also accept
    /// the actor; a listed but unregistered action then fails.
    pub fn actor_can_emit_action<V: ObjectView + ?Sized>(
        &self,
        view: &V,
        actor: ActorId,
        name: &str,
        full_check: bool,
        possible_actions_property: &str,
    ) -> bool {
        let subject = ObjectRef::Actor(actor);
        let listed = view
            .properties(subject)
            .is_some_and(|props| props.list_contains(possible_actions_property, name));
        if !listed {
            return false;
        }
        if !full_check {
            return true;
        }
        self.get_action(name)
            .is_some_and(|proto| proto.executor_filter().full_check(view, subject))
    }
}
