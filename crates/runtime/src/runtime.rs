//! Host-facing orchestrator.
//!
//! [`ActionRuntime`] owns the world, the action catalogue and the executor,
//! and forwards every engine event to the [`EventBus`]. The executor is
//! created on first use: loading a catalogue or queueing an action brings it
//! up, and there is exactly one per runtime.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::broadcast;

use action_content::{ActionFactory, InitialAction};
use action_core::{
    Action, ActionEvent, ActionExecutor, ActionPrototype, ActorId, EngineConfig, ExecEnv, ObjectRef,
    PauseState, World, reserve_transfer,
};

use crate::error::{Result, RuntimeError};
use crate::events::{EventBus, Topic};
use crate::persistence::SaveFile;

/// Where [`ActionRuntime::enqueue`] puts an action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    /// Preempts the running action.
    Front,
    /// Runs after everything queued; `ADD_AT_FRONT` actions still go first.
    #[default]
    End,
}

pub struct ActionRuntime {
    config: EngineConfig,
    world: World,
    factory: Option<ActionFactory>,
    executor: Option<ActionExecutor>,
    bus: EventBus,
}

impl ActionRuntime {
    pub fn builder() -> ActionRuntimeBuilder {
        ActionRuntimeBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access. Queue mutations made through it bypass event
    /// publishing until the next call that flushes events.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn factory(&self) -> Option<&ActionFactory> {
        self.factory.as_ref()
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<ActionEvent> {
        self.bus.subscribe(topic)
    }

    pub fn is_active(&self, actor: ActorId) -> bool {
        self.executor.as_ref().is_some_and(|e| e.is_active(actor))
    }

    /// Installs the action catalogue, replacing any previous one.
    pub fn load_actions(&mut self, factory: ActionFactory) {
        tracing::info!(prototypes = factory.len(), "action catalogue installed");
        self.factory = Some(factory);
        bootstrap(&mut self.executor, &self.config);
    }

    fn catalogue(&self) -> Result<&ActionFactory> {
        self.factory.as_ref().ok_or(RuntimeError::ActionsNotLoaded)
    }

    fn flush_events(&mut self) {
        let Some(executor) = self.executor.as_mut() else {
            return;
        };
        for event in executor.drain_events() {
            self.bus.publish(event);
        }
    }

    pub fn prototype(&self, name: &str) -> Result<Arc<ActionPrototype>> {
        self.catalogue()?
            .get_action(name)
            .ok_or_else(|| RuntimeError::UnknownAction(name.to_owned()))
    }

    /// Fresh action instance of a catalogued prototype.
    pub fn instantiate(&self, name: &str) -> Result<Action> {
        Ok(Action::from_prototype(self.prototype(name)?))
    }

    /// Menu label of a prototype in the configured language.
    pub fn menu_text(&self, name: &str) -> Result<String> {
        Ok(self.prototype(name)?.menu_text(&self.config.language).to_owned())
    }

    pub fn actor_can_emit_action(&self, actor: ActorId, name: &str, full_check: bool) -> bool {
        self.factory.as_ref().is_some_and(|factory| {
            factory.actor_can_emit_action(
                &self.world,
                actor,
                name,
                full_check,
                &self.config.executor.possible_actions_property,
            )
        })
    }

    pub fn is_valid_target(&self, name: &str, target: ObjectRef) -> bool {
        self.prototype(name)
            .is_ok_and(|prototype| prototype.is_valid_target(&self.world, target))
    }

    pub fn enqueue(&mut self, actor: ActorId, action: Action, placement: Placement) -> Result<()> {
        let executor = bootstrap(&mut self.executor, &self.config);
        let queue = self.world.queue_mut(actor)?;
        match placement {
            Placement::Front => queue.add_action_at_front(action, executor),
            Placement::End => queue.add_action_at_end(action, executor),
        }
        self.flush_events();
        Ok(())
    }

    /// Queues a catalogued action the actor is allowed to emit.
    pub fn enqueue_named(&mut self, actor: ActorId, name: &str, placement: Placement) -> Result<()> {
        let action = self.instantiate(name)?;
        if !self.actor_can_emit_action(actor, name, true) {
            return Err(RuntimeError::CannotEmit {
                actor,
                action: name.to_owned(),
            });
        }
        self.enqueue(actor, action, placement)
    }

    /// Queues the start-up actions of a scenario. Entries naming unknown
    /// prototypes are skipped.
    pub fn enqueue_initial(&mut self, initial: &[InitialAction]) -> Result<usize> {
        let mut queued = 0;
        for entry in initial {
            let Some(action) = entry.instantiate(self.catalogue()?) else {
                tracing::warn!(actor = %entry.actor, action = %entry.action, "initial action not in catalogue");
                continue;
            };
            self.enqueue(entry.actor, action, Placement::End)?;
            queued += 1;
        }
        Ok(queued)
    }

    /// Drops every queued action of the actor and releases the planned
    /// quantities reserved for them, on the actor and on every targeted
    /// actor. Finalizers run at the start of the next tick.
    pub fn cancel_actions(&mut self, actor: ActorId) -> Result<()> {
        let executor = bootstrap(&mut self.executor, &self.config);
        let queue = self.world.queue_mut(actor)?;
        let mut affected: Vec<ActorId> = queue
            .iter()
            .flat_map(|action| action.target_objects.iter().copied())
            .collect();
        queue.clear(executor);

        affected.push(actor);
        affected.sort_unstable();
        affected.dedup();
        for id in affected {
            if let Ok(ledger) = self.world.ledger_mut(ObjectRef::Actor(id)) {
                ledger.reset_planned();
            }
        }
        self.flush_events();
        Ok(())
    }

    /// Moves planned quantities of `tools` from one ledger to another ahead
    /// of the action that will carry them over.
    pub fn reserve_tools(&mut self, from: ObjectRef, to: ObjectRef, tools: &[(ObjectRef, i32)]) -> Result<()> {
        if from == to {
            return Ok(());
        }
        let mut source = std::mem::take(self.world.ledger_mut(from)?);
        let reserved = self.world.ledger_mut(to).map(|target| {
            for &(object, quantity) in tools {
                reserve_transfer(&mut source, target, object, quantity);
            }
        });
        *self.world.ledger_mut(from)? = source;
        reserved?;
        Ok(())
    }

    /// Releases the actor's front action if it waits for the ready flag.
    pub fn mark_ready(&mut self, actor: ActorId) -> Result<bool> {
        Ok(self.world.queue_mut(actor)?.mark_front_ready())
    }

    /// Advances every active queue once and publishes the resulting events.
    pub fn tick(&mut self, env: &mut ExecEnv<'_>, elapsed: f32, pause: PauseState) -> usize {
        let executor = bootstrap(&mut self.executor, &self.config);
        let visited = executor.update(&mut self.world, env, elapsed, pause);
        self.flush_events();
        visited
    }

    /// Clears every active queue, running finalizers right away.
    pub fn unload(&mut self, env: &mut ExecEnv<'_>) {
        if let Some(executor) = self.executor.as_mut() {
            executor.unload(&mut self.world, env);
        }
        self.flush_events();
    }

    pub fn save(&self) -> SaveFile {
        SaveFile::capture(&self.world)
    }

    pub fn save_json(&self) -> Result<String> {
        self.save().to_json()
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.save().write(path)?;
        tracing::info!(path = %path.display(), "actions saved");
        Ok(())
    }

    /// Restores queues and ledgers; the catalogue must already be loaded.
    pub fn restore(&mut self, save: &SaveFile) -> Result<usize> {
        let factory = self.factory.as_ref().ok_or(RuntimeError::ActionsNotLoaded)?;
        let executor = bootstrap(&mut self.executor, &self.config);
        let restored = save.apply(&mut self.world, factory, executor)?;
        self.flush_events();
        tracing::info!(actions = restored, "actions restored");
        Ok(restored)
    }

    pub fn restore_json(&mut self, text: &str) -> Result<usize> {
        self.restore(&SaveFile::from_json(text)?)
    }

    pub fn restore_from(&mut self, path: &Path) -> Result<usize> {
        self.restore(&SaveFile::read(path)?)
    }
}

fn bootstrap<'a>(slot: &'a mut Option<ActionExecutor>, config: &EngineConfig) -> &'a mut ActionExecutor {
    slot.get_or_insert_with(|| {
        tracing::debug!("action executor created");
        ActionExecutor::new(config.executor.clone())
    })
}

/// Builder for [`ActionRuntime`].
#[derive(Default)]
pub struct ActionRuntimeBuilder {
    config: EngineConfig,
    world: Option<World>,
    factory: Option<ActionFactory>,
}

impl ActionRuntimeBuilder {
    fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    /// Installs a catalogue up front, which also brings up the executor.
    pub fn factory(mut self, factory: ActionFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn build(self) -> ActionRuntime {
        let bus = EventBus::with_capacity(self.config.event_capacity);
        let mut runtime = ActionRuntime {
            config: self.config,
            world: self.world.unwrap_or_default(),
            factory: None,
            executor: None,
            bus,
        };
        if let Some(factory) = self.factory {
            runtime.load_actions(factory);
        }
        runtime
    }
}
