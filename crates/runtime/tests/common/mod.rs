#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use action_content::{ActionFactory, ActionLoader, Scenario, WorldLoader};
use action_core::{ActorId, EngineConfig};
use action_runtime::{ActionRuntime, ScriptRegistry};

pub const CATALOGUE: &str = r#"(
    priority: 0,
    actions: [
        (name: "Walk", type: "MOVE", need: "POINT"),
        (name: "Chop", type: "RUN_SCRIPT"),
        (name: "Deliver", type: "PUT_TOOLS", need: "TARGET_ACTOR"),
        (name: "Wait", type: "WAIT_FOR_READY_FLAG"),
    ],
)"#;

pub const CAMP: &str = r#"(
    prototypes: [(name: "log")],
    actors: [
        (
            name: "hero",
            components: ["ActionQueue", "ObjectOwner", "Movable", "Selectable"],
            properties: {"PossibleActions": List(["Walk", "Chop", "Wait"])},
            owned: [(object: Prototype("log"), current: 3, planned: 3)],
            queue: [
                (action: "Walk", target_points: [(x: 2.0, y: 0.0, z: 0.0)]),
                (action: "Chop"),
            ],
        ),
        (name: "tent", components: ["ObjectOwner", "Selectable"]),
    ],
)"#;

pub fn catalogue() -> ActionFactory {
    let mut factory = ActionFactory::new();
    for prototype in ActionLoader::parse(CATALOGUE).unwrap() {
        factory.register(prototype);
    }
    factory
}

pub fn scenario() -> Scenario {
    WorldLoader::parse(CAMP).unwrap()
}

/// Runtime over the camp world, catalogue loaded, nothing queued.
pub fn runtime(scenario: &Scenario) -> ActionRuntime {
    ActionRuntime::builder()
        .config(EngineConfig::default())
        .world(scenario.world.clone())
        .factory(catalogue())
        .build()
}

pub fn actor(runtime: &ActionRuntime, name: &str) -> ActorId {
    runtime.world().find_actor(name).unwrap()
}

pub fn queue_len(runtime: &ActionRuntime, actor: ActorId) -> usize {
    runtime
        .world()
        .actor(actor)
        .and_then(|a| a.action_queue.as_ref())
        .map_or(0, |q| q.len())
}

/// Scripts with a `Chop` action script counting its calls.
pub fn scripts() -> (ScriptRegistry, Arc<AtomicUsize>) {
    let chops = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&chops);
    let mut scripts = ScriptRegistry::new();
    scripts.register_bool("Chop", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        true
    });
    (scripts, chops)
}
