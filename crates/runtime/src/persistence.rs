//! JSON save files for queued actions and ledgers.
//!
//! A save holds, per actor carrying a queue or a ledger, the queued actions
//! (minus those flagged `do_not_save`) and the owned objects. Restoring
//! resolves prototypes by name, so the catalogue must be loaded first.
//! Restored actions start over: their start script runs again.

use std::path::Path;

use serde::{Deserialize, Serialize};

use action_content::ActionFactory;
use action_core::{
    Action, ActionExecutor, ActionFlags, ActionKind, ActionType, ActorId, ComponentKind,
    ObjectOwner, ObjectRef, Point3, World, WorldError,
};

use crate::error::Result;

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub actors: Vec<ActorRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorRecord {
    pub actor: ActorId,
    pub name: String,
    #[serde(default)]
    pub queue: Vec<ActionRecord>,
    #[serde(default)]
    pub owned: Vec<OwnedRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Prototype name, `"NULL"` for hidden actions.
    pub prototype_name: String,
    #[serde(rename = "type")]
    pub action_type: u32,
    #[serde(default)]
    pub script_name: String,
    #[serde(default)]
    pub timer: f32,
    #[serde(default)]
    pub target_points: Vec<Point3>,
    #[serde(default)]
    pub target_objects: Vec<ActorId>,
    #[serde(default)]
    pub tool_objects: Vec<ObjectRef>,
    #[serde(default)]
    pub mode: i32,
    #[serde(default)]
    pub ready: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedRecord {
    pub object: ObjectRef,
    pub current: i32,
    pub planned: i32,
}

impl ActionRecord {
    /// `None` for actions that are never saved.
    ///
    /// Paths are not part of a save, so an action caught in motion is stored
    /// as `START_MOVE` and asks for a fresh path once restored.
    pub fn capture(action: &Action) -> Option<Self> {
        if action.do_not_save {
            return None;
        }
        let mut action_type = action.action_type();
        if action_type.contains(ActionFlags::MOVING) {
            action_type = ActionType::new(
                ActionKind::StartMove,
                action_type.flags.difference(ActionFlags::MOVING),
            );
        }
        Some(Self {
            prototype_name: action
                .prototype()
                .map_or_else(|| ActionFactory::NULL_NAME.to_owned(), |p| p.name().to_owned()),
            action_type: action_type.bits(),
            script_name: action.raw_script_name().to_owned(),
            timer: action.timer,
            target_points: action.target_points.clone(),
            target_objects: action.target_objects.iter().copied().collect(),
            tool_objects: action.tool_objects.iter().copied().collect(),
            mode: action.mode,
            ready: action.ready,
        })
    }

    /// Rebuilds the action. An unknown prototype name yields a hidden action
    /// of the recorded type.
    pub fn restore(&self, factory: &ActionFactory) -> Result<Action> {
        let action_type = ActionType::from_bits(self.action_type)?;
        let mut action = match factory.get_action(&self.prototype_name) {
            Some(prototype) => Action::from_prototype(prototype),
            None => {
                if self.prototype_name != ActionFactory::NULL_NAME {
                    tracing::warn!(
                        action = %self.prototype_name,
                        "saved action prototype not found, restoring as hidden action"
                    );
                }
                Action::default()
            }
        };
        action.set_action_type(action_type);
        let mut action = action.with_script(self.script_name.as_str()).with_mode(self.mode);
        action.timer = self.timer;
        action.ready = self.ready;
        action.target_points = self.target_points.clone();
        action.target_objects = self.target_objects.iter().copied().collect();
        action.tool_objects = self.tool_objects.iter().copied().collect();
        Ok(action)
    }
}

/// A record resolved against the world, ready to be swapped in.
struct Staged {
    actions: Option<Vec<Action>>,
    ledger: Option<ObjectOwner>,
}

impl ActorRecord {
    fn stage(&self, world: &World, factory: &ActionFactory) -> Result<Staged> {
        let actions = self
            .queue
            .iter()
            .map(|saved| saved.restore(factory))
            .collect::<Result<Vec<_>>>()?;
        let actor = world
            .actor(self.actor)
            .ok_or(WorldError::ActorNotFound(self.actor))?;
        let missing = |component| WorldError::MissingComponent {
            object: ObjectRef::Actor(self.actor),
            component,
        };

        let actions = match actor.action_queue {
            Some(_) => Some(actions),
            None if actions.is_empty() => None,
            None => return Err(missing(ComponentKind::ActionQueue).into()),
        };
        let ledger = match actor.object_owner {
            Some(_) => {
                let mut ledger = ObjectOwner::new();
                for owned in &self.owned {
                    ledger.set(owned.object, owned.current, owned.planned);
                }
                Some(ledger)
            }
            None if self.owned.is_empty() => None,
            None => return Err(missing(ComponentKind::ObjectOwner).into()),
        };
        Ok(Staged { actions, ledger })
    }
}

impl SaveFile {
    /// Snapshot of every actor that has a queue or a ledger.
    pub fn capture(world: &World) -> Self {
        let actors = world
            .actors()
            .filter(|actor| actor.action_queue.is_some() || actor.object_owner.is_some())
            .map(|actor| ActorRecord {
                actor: actor.id,
                name: actor.name.clone(),
                queue: actor
                    .action_queue
                    .iter()
                    .flat_map(|queue| queue.iter())
                    .filter_map(ActionRecord::capture)
                    .collect(),
                owned: actor
                    .object_owner
                    .iter()
                    .flat_map(ObjectOwner::iter)
                    .map(|(object, holding)| OwnedRecord {
                        object,
                        current: holding.current,
                        planned: holding.planned,
                    })
                    .collect(),
            })
            .collect();
        Self {
            version: SAVE_VERSION,
            actors,
        }
    }

    /// Replaces queues and ledgers of the recorded actors.
    ///
    /// Every record is resolved before the world is touched, so a failing
    /// save leaves it unchanged. Actions already queued on the recorded
    /// actors are dropped without running their finalizers. Returns the
    /// number of restored actions.
    pub fn apply(
        &self,
        world: &mut World,
        factory: &ActionFactory,
        executor: &mut ActionExecutor,
    ) -> Result<usize> {
        if self.version != SAVE_VERSION {
            tracing::warn!(version = self.version, expected = SAVE_VERSION, "save version differs");
        }
        let staged = self
            .actors
            .iter()
            .map(|record| record.stage(world, factory))
            .collect::<Result<Vec<_>>>()?;

        let mut restored = 0;
        for (record, staged) in self.actors.iter().zip(staged) {
            if let Some(actions) = staged.actions {
                let queue = world.queue_mut(record.actor)?;
                queue.take_all(executor);
                restored += actions.len();
                queue.restore(actions, executor);
            }
            if let Some(ledger) = staged.ledger {
                *world.ledger_mut(ObjectRef::Actor(record.actor))? = ledger;
            }
            tracing::debug!(actor = %record.actor, name = %record.name, "actor state restored");
        }
        Ok(restored)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
