//! Scenario loader: actor prototypes, actors, ledgers and initial actions.
//!
//! Objects are referenced by name and resolved once every prototype and
//! actor exists, so ledgers may point forward in the file.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use action_core::{
    Action, ActorId, ActorPrototype, ActorState, ComponentKind, ObjectOwner, ObjectRef, Point3,
    PropertySet, SelectionStatus, World,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::registry::ActionFactory;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WorldRon {
    prototypes: Vec<PrototypeSpec>,
    actors: Vec<ActorSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrototypeSpec {
    pub name: String,
    #[serde(default)]
    pub properties: PropertySet,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub selection: String,
    #[serde(default)]
    pub owned: Vec<OwnedSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSpec {
    pub name: String,
    /// Prototype to build from; empty for a bare actor.
    #[serde(default)]
    pub prototype: String,
    #[serde(default)]
    pub position: Point3,
    /// Merged over the prototype's properties.
    #[serde(default)]
    pub properties: PropertySet,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub selection: String,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub owned: Vec<OwnedSpec>,
    #[serde(default)]
    pub queue: Vec<QueuedSpec>,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectSpec {
    Actor(String),
    Prototype(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedSpec {
    pub object: ObjectSpec,
    pub current: i32,
    pub planned: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedSpec {
    pub action: String,
    #[serde(default)]
    pub target_points: Vec<Point3>,
    #[serde(default)]
    pub target_objects: Vec<String>,
    #[serde(default)]
    pub tools: Vec<ObjectSpec>,
    #[serde(default)]
    pub mode: i32,
}

/// Action to queue once the scenario is running, with names resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialAction {
    pub actor: ActorId,
    pub action: String,
    pub target_points: Vec<Point3>,
    pub target_objects: Vec<ActorId>,
    pub tools: Vec<ObjectRef>,
    pub mode: i32,
}

impl InitialAction {
    /// Instantiates the named prototype; `None` if the factory lacks it.
    pub fn instantiate(&self, factory: &ActionFactory) -> Option<Action> {
        let prototype = factory.get_action(&self.action)?;
        let mut action = Action::from_prototype(prototype).with_mode(self.mode);
        action.target_points.extend(self.target_points.iter().copied());
        action.target_objects.extend(self.target_objects.iter().copied());
        action.tool_objects.extend(self.tools.iter().copied());
        Some(action)
    }
}

/// A loaded world plus the actions its actors start with.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub world: World,
    pub initial_actions: Vec<InitialAction>,
}

/// Loader for scenario RON files.
pub struct WorldLoader;

impl WorldLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let data: WorldRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse world RON: {}", e))?;
        let mut world = World::new();

        let mut prototype_ids = HashMap::new();
        for spec in &data.prototypes {
            let mut proto = ActorPrototype::new(spec.name.as_str())
                .with_properties(spec.properties.clone());
            for kind in parse_components(&spec.components)? {
                proto = proto.with_component(kind);
            }
            if !spec.selection.is_empty() {
                proto = proto.with_selection(parse_selection(&spec.selection)?);
            }
            if prototype_ids.contains_key(&spec.name) {
                anyhow::bail!("Duplicate prototype '{}'", spec.name);
            }
            prototype_ids.insert(spec.name.clone(), world.add_prototype(proto));
        }

        let mut actor_ids = HashMap::new();
        for spec in &data.actors {
            if actor_ids.contains_key(&spec.name) {
                anyhow::bail!("Duplicate actor '{}'", spec.name);
            }
            let id = world.insert_actor(build_actor(&world, &prototype_ids, spec)?);
            actor_ids.insert(spec.name.clone(), id);
        }

        let resolver = Resolver {
            prototypes: &prototype_ids,
            actors: &actor_ids,
        };

        for spec in &data.prototypes {
            let entries = resolver.owned(&spec.owned)?;
            let Some(proto) = prototype_ids
                .get(&spec.name)
                .and_then(|id| world.prototype_mut(*id))
            else {
                continue;
            };
            fill_ledger(proto.object_owner.get_or_insert_with(ObjectOwner::new), entries);
        }

        let mut initial_actions = Vec::new();
        for spec in &data.actors {
            let Some(&id) = actor_ids.get(&spec.name) else {
                continue;
            };
            let entries = resolver.owned(&spec.owned)?;
            if let Some(actor) = world.actor_mut(id) {
                if !entries.is_empty() {
                    fill_ledger(actor.object_owner.get_or_insert_with(ObjectOwner::new), entries);
                }
            }
            for queued in &spec.queue {
                initial_actions.push(resolver.initial_action(id, queued)?);
            }
        }

        Ok(Scenario {
            world,
            initial_actions,
        })
    }
}

fn build_actor(
    world: &World,
    prototype_ids: &HashMap<String, action_core::PrototypeId>,
    spec: &ActorSpec,
) -> LoadResult<ActorState> {
    let mut actor = if spec.prototype.is_empty() {
        ActorState::new(spec.name.as_str()).with_position(spec.position)
    } else {
        let proto = prototype_ids
            .get(&spec.prototype)
            .and_then(|id| world.prototype(*id))
            .ok_or_else(|| {
                anyhow::anyhow!("Actor '{}' uses unknown prototype '{}'", spec.name, spec.prototype)
            })?;
        ActorState::from_prototype(proto, spec.name.as_str(), spec.position)
    };
    for (name, value) in spec.properties.iter() {
        actor.properties.set(name, value.clone());
    }
    for kind in parse_components(&spec.components)? {
        actor.add_component(kind);
    }
    if !spec.selection.is_empty() {
        actor.selection = Some(parse_selection(&spec.selection)?);
    }
    if !spec.available {
        actor.set_available(false);
    }
    Ok(actor)
}

fn fill_ledger(ledger: &mut ObjectOwner, entries: Vec<(ObjectRef, i32, i32)>) {
    for (object, current, planned) in entries {
        ledger.set(object, current, planned);
    }
}

fn parse_components(tokens: &[String]) -> LoadResult<Vec<ComponentKind>> {
    tokens
        .iter()
        .map(|token| {
            ComponentKind::parse(token).ok_or_else(|| anyhow::anyhow!("Unknown component '{}'", token))
        })
        .collect()
}

fn parse_selection(text: &str) -> LoadResult<SelectionStatus> {
    SelectionStatus::from_str(text)
        .map_err(|e| anyhow::anyhow!("Invalid selection status '{}': {}", text, e))
}

struct Resolver<'a> {
    prototypes: &'a HashMap<String, action_core::PrototypeId>,
    actors: &'a HashMap<String, ActorId>,
}

impl Resolver<'_> {
    fn actor(&self, name: &str) -> LoadResult<ActorId> {
        self.actors
            .get(name)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Unknown actor '{}'", name))
    }

    fn object(&self, spec: &ObjectSpec) -> LoadResult<ObjectRef> {
        match spec {
            ObjectSpec::Actor(name) => self.actor(name).map(ObjectRef::Actor),
            ObjectSpec::Prototype(name) => self
                .prototypes
                .get(name)
                .copied()
                .map(ObjectRef::Prototype)
                .ok_or_else(|| anyhow::anyhow!("Unknown prototype '{}'", name)),
        }
    }

    fn owned(&self, owned: &[OwnedSpec]) -> LoadResult<Vec<(ObjectRef, i32, i32)>> {
        owned
            .iter()
            .map(|entry| Ok((self.object(&entry.object)?, entry.current, entry.planned)))
            .collect()
    }

    fn initial_action(&self, actor: ActorId, spec: &QueuedSpec) -> LoadResult<InitialAction> {
        Ok(InitialAction {
            actor,
            action: spec.action.clone(),
            target_points: spec.target_points.clone(),
            target_objects: spec
                .target_objects
                .iter()
                .map(|name| self.actor(name))
                .collect::<LoadResult<_>>()?,
            tools: spec
                .tools
                .iter()
                .map(|tool| self.object(tool))
                .collect::<LoadResult<_>>()?,
            mode: spec.mode,
        })
    }
}
