//! Drives a loaded scenario through the runtime facade.

mod common;

use std::sync::atomic::Ordering;

use action_core::{
    Action, ActionEvent, ActionFlags, ActionType, ExecEnv, ObjectRef, PauseState, Point3,
};
use action_runtime::{LinearMovement, Placement, RuntimeError, Topic};
use tokio::sync::broadcast::error::TryRecvError;

use common::{actor, queue_len, runtime, scenario, scripts};

#[test]
fn walk_then_chop_runs_to_completion() {
    let scenario = scenario();
    let mut runtime = runtime(&scenario);
    let hero = actor(&runtime, "hero");
    let mut movement_events = runtime.subscribe(Topic::Movement);

    assert_eq!(runtime.enqueue_initial(&scenario.initial_actions).unwrap(), 2);
    assert!(runtime.is_active(hero));

    let (mut scripts, chops) = scripts();
    let mut movement = LinearMovement::new(1.0);
    let mut env = ExecEnv::empty()
        .with_scripts(&mut scripts)
        .with_movement(&mut movement);

    // MOVE, released wait action, START_MOVE, two steps of MOVING, Chop
    for _ in 0..6 {
        assert_eq!(runtime.tick(&mut env, 1.0, PauseState::Running), 1);
    }
    drop(env);

    assert_eq!(queue_len(&runtime, hero), 0);
    assert!(!runtime.is_active(hero));
    assert_eq!(chops.load(Ordering::SeqCst), 1);
    assert_eq!(
        runtime.world().actor(hero).unwrap().position,
        Point3::new(2.0, 0.0, 0.0)
    );
    assert_eq!(
        movement_events.try_recv().unwrap(),
        ActionEvent::ActorMoving { actor: hero, moving: true }
    );
    assert_eq!(
        movement_events.try_recv().unwrap(),
        ActionEvent::ActorMoving { actor: hero, moving: false }
    );
    assert_eq!(movement_events.try_recv(), Err(TryRecvError::Empty));
}

#[test]
fn pause_holds_queues_until_resumed() {
    let scenario = scenario();
    let mut runtime = runtime(&scenario);
    let hero = actor(&runtime, "hero");
    runtime.enqueue_named(hero, "Chop", Placement::End).unwrap();

    let (mut scripts, chops) = scripts();
    let mut env = ExecEnv::empty().with_scripts(&mut scripts);
    runtime.tick(&mut env, 1.0, PauseState::Paused);
    assert_eq!(runtime.tick(&mut env, 1.0, PauseState::Frozen), 0);
    assert_eq!(chops.load(Ordering::SeqCst), 0);

    runtime.tick(&mut env, 1.0, PauseState::Running);
    drop(env);
    assert_eq!(chops.load(Ordering::SeqCst), 1);
    assert_eq!(queue_len(&runtime, hero), 0);
}

#[test]
fn enqueue_named_checks_catalogue_and_permissions() {
    let scenario = scenario();
    let mut runtime = runtime(&scenario);
    let hero = actor(&runtime, "hero");
    let tent = actor(&runtime, "tent");

    assert!(matches!(
        runtime.enqueue_named(hero, "Fly", Placement::End),
        Err(RuntimeError::UnknownAction(name)) if name == "Fly"
    ));
    assert!(matches!(
        runtime.enqueue_named(hero, "Deliver", Placement::End),
        Err(RuntimeError::CannotEmit { .. })
    ));
    // the tent has no queue
    assert!(runtime.actor_can_emit_action(hero, "Walk", true));
    assert!(!runtime.actor_can_emit_action(tent, "Walk", false));
    assert!(matches!(
        runtime.enqueue(tent, Action::default(), Placement::End),
        Err(RuntimeError::World(_))
    ));
    assert!(runtime.is_valid_target("Deliver", ObjectRef::Actor(tent)));

    let mut bare = action_runtime::ActionRuntime::builder()
        .world(scenario.world.clone())
        .build();
    assert!(matches!(
        bare.enqueue_named(hero, "Chop", Placement::End),
        Err(RuntimeError::ActionsNotLoaded)
    ));
}

#[test]
fn front_placement_preempts_and_mark_ready_releases() {
    let scenario = scenario();
    let mut runtime = runtime(&scenario);
    let hero = actor(&runtime, "hero");

    runtime.enqueue_named(hero, "Chop", Placement::End).unwrap();
    runtime.enqueue_named(hero, "Wait", Placement::Front).unwrap();
    let front = |rt: &action_runtime::ActionRuntime| {
        rt.world()
            .actor(hero)
            .and_then(|a| a.action_queue.as_ref())
            .and_then(|q| q.front())
            .map(|a| a.action_type())
    };
    assert_eq!(front(&runtime), Some(ActionType::with_flags(ActionFlags::WAIT_FOR_READY_FLAG)));

    let (mut scripts, chops) = scripts();
    let mut env = ExecEnv::empty().with_scripts(&mut scripts);
    runtime.tick(&mut env, 1.0, PauseState::Running);
    assert_eq!(queue_len(&runtime, hero), 2);

    assert!(runtime.mark_ready(hero).unwrap());
    runtime.tick(&mut env, 1.0, PauseState::Running);
    runtime.tick(&mut env, 1.0, PauseState::Running);
    drop(env);
    assert_eq!(chops.load(Ordering::SeqCst), 1);
    assert!(!runtime.mark_ready(hero).unwrap());
}

#[test]
fn cancel_actions_releases_reservations() {
    let scenario = scenario();
    let mut runtime = runtime(&scenario);
    let hero = actor(&runtime, "hero");
    let tent = actor(&runtime, "tent");
    let log = ObjectRef::Prototype(runtime.world().find_prototype("log").unwrap());

    runtime
        .reserve_tools(ObjectRef::Actor(hero), ObjectRef::Actor(tent), &[(log, 1)])
        .unwrap();
    let deliver = runtime
        .instantiate("Deliver")
        .unwrap()
        .with_target_object(tent)
        .with_tool(log);
    runtime.enqueue(hero, deliver, Placement::End).unwrap();

    let ledger = |rt: &mut action_runtime::ActionRuntime, id| {
        rt.world_mut().ledger_mut(ObjectRef::Actor(id)).unwrap().get(log)
    };
    assert_eq!(ledger(&mut runtime, hero).map(|h| h.planned), Some(2));
    assert_eq!(ledger(&mut runtime, tent).map(|h| h.planned), Some(1));

    let mut queue_events = runtime.subscribe(Topic::Queue);
    runtime.cancel_actions(hero).unwrap();

    assert_eq!(queue_len(&runtime, hero), 0);
    assert!(!runtime.is_active(hero));
    assert_eq!(ledger(&mut runtime, hero).map(|h| (h.current, h.planned)), Some((3, 3)));
    assert_eq!(ledger(&mut runtime, tent), None);
    assert_eq!(
        queue_events.try_recv().unwrap(),
        ActionEvent::QueueUpdated { actor: hero }
    );
}

#[tokio::test]
async fn queue_events_reach_async_subscribers() {
    let scenario = scenario();
    let mut runtime = runtime(&scenario);
    let hero = actor(&runtime, "hero");
    let mut events = runtime.events().subscribe(Topic::Queue);

    let listener = tokio::spawn(async move { events.recv().await });
    runtime.enqueue_named(hero, "Chop", Placement::End).unwrap();

    let event = listener.await.unwrap().unwrap();
    assert_eq!(event, ActionEvent::QueueUpdated { actor: hero });
}
