//! Save files written mid-scenario and restored into a fresh world.

mod common;

use std::sync::atomic::Ordering;

use action_core::{ActionKind, ActionType, ExecEnv, ObjectRef, PauseState, Point3};
use action_runtime::{RuntimeError, SaveFile};
use tempfile::TempDir;

use common::{actor, queue_len, runtime, scenario, scripts};

#[test]
fn interrupted_walk_resumes_after_restore() {
    let scenario = scenario();
    let mut first = runtime(&scenario);
    let hero = actor(&first, "hero");
    first.enqueue_initial(&scenario.initial_actions).unwrap();

    let (mut scripts, chops) = scripts();
    let mut movement = action_runtime::LinearMovement::default();
    {
        let mut env = ExecEnv::empty()
            .with_scripts(&mut scripts)
            .with_movement(&mut movement);
        first.tick(&mut env, 1.0, PauseState::Running);
    }
    // the synthetic wait action is not saved
    assert_eq!(queue_len(&first, hero), 3);
    let save = first.save();
    let hero_record = save.actors.iter().find(|r| r.actor == hero).unwrap();
    let kinds: Vec<_> = hero_record.queue.iter().map(|r| r.prototype_name.as_str()).collect();
    assert_eq!(kinds, ["Walk", "Chop"]);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("save.json");
    first.save_to(&path).unwrap();

    let mut second = runtime(&scenario);
    assert_eq!(second.restore_from(&path).unwrap(), 2);
    assert!(second.is_active(hero));
    let front = second
        .world()
        .actor(hero)
        .and_then(|a| a.action_queue.as_ref())
        .and_then(|q| q.front())
        .unwrap();
    assert_eq!(front.action_type().kind, ActionKind::StartMove);
    assert!(!front.is_started());

    // a fresh driver knows no path: START_MOVE falls back to MOVE
    let mut movement = action_runtime::LinearMovement::default();
    let mut env = ExecEnv::empty()
        .with_scripts(&mut scripts)
        .with_movement(&mut movement);
    for _ in 0..20 {
        if !second.is_active(hero) {
            break;
        }
        second.tick(&mut env, 1.0, PauseState::Running);
    }
    drop(env);

    assert!(!second.is_active(hero));
    assert_eq!(chops.load(Ordering::SeqCst), 1);
    assert_eq!(
        second.world().actor(hero).unwrap().position,
        Point3::new(2.0, 0.0, 0.0)
    );
}

#[test]
fn walk_saved_in_motion_restarts_and_finishes() {
    let scenario = scenario();
    let mut first = runtime(&scenario);
    let hero = actor(&first, "hero");
    first.enqueue_initial(&scenario.initial_actions).unwrap();

    let (mut scripts, chops) = scripts();
    let mut movement = action_runtime::LinearMovement::default();
    {
        let mut env = ExecEnv::empty()
            .with_scripts(&mut scripts)
            .with_movement(&mut movement);
        // MOVE, wait action, START_MOVE -> MOVING, one step
        for _ in 0..4 {
            first.tick(&mut env, 1.0, PauseState::Running);
        }
    }
    let front = first
        .world()
        .actor(hero)
        .and_then(|a| a.action_queue.as_ref())
        .and_then(|q| q.front())
        .map(|a| a.action_type());
    assert_eq!(front, Some(ActionType::moving()));
    assert_eq!(first.world().actor(hero).unwrap().position, Point3::new(1.0, 0.0, 0.0));

    let json = first.save_json().unwrap();
    let mut second = runtime(&scenario);
    assert_eq!(second.restore_json(&json).unwrap(), 2);

    let mut movement = action_runtime::LinearMovement::default();
    let mut env = ExecEnv::empty()
        .with_scripts(&mut scripts)
        .with_movement(&mut movement);
    second.tick(&mut env, 1.0, PauseState::Running);
    assert_eq!(queue_len(&second, hero), 2);
    for _ in 0..20 {
        if !second.is_active(hero) {
            break;
        }
        second.tick(&mut env, 1.0, PauseState::Running);
    }
    drop(env);

    assert!(!second.is_active(hero));
    assert_eq!(chops.load(Ordering::SeqCst), 1);
    assert_eq!(
        second.world().actor(hero).unwrap().position,
        Point3::new(2.0, 0.0, 0.0)
    );
}

#[test]
fn ledgers_round_trip_through_json() {
    let scenario = scenario();
    let mut first = runtime(&scenario);
    let hero = actor(&first, "hero");
    let tent = actor(&first, "tent");
    let log = ObjectRef::Prototype(first.world().find_prototype("log").unwrap());
    first
        .reserve_tools(ObjectRef::Actor(hero), ObjectRef::Actor(tent), &[(log, 2)])
        .unwrap();

    let json = first.save_json().unwrap();
    let mut second = runtime(&scenario);
    assert_eq!(second.restore_json(&json).unwrap(), 0);

    let world = second.world_mut();
    let hero_ledger = world.ledger_mut(ObjectRef::Actor(hero)).unwrap();
    assert_eq!((hero_ledger.current(log), hero_ledger.planned(log)), (3, 1));
    let tent_ledger = world.ledger_mut(ObjectRef::Actor(tent)).unwrap();
    assert_eq!((tent_ledger.current(log), tent_ledger.planned(log)), (0, 2));
}

#[test]
fn restore_requires_a_catalogue_and_valid_json() {
    let scenario = scenario();
    let mut bare = action_runtime::ActionRuntime::builder()
        .world(scenario.world.clone())
        .build();
    let empty = SaveFile {
        version: action_runtime::SAVE_VERSION,
        actors: Vec::new(),
    };
    assert!(matches!(bare.restore(&empty), Err(RuntimeError::ActionsNotLoaded)));

    let mut loaded = runtime(&scenario);
    assert!(matches!(
        loaded.restore_json("{ not json"),
        Err(RuntimeError::Serialization(_))
    ));
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        loaded.restore_from(&dir.path().join("missing.json")),
        Err(RuntimeError::Io(_))
    ));
}
