//! Per-tick driver of every non-empty action queue.
//!
//! The executor owns the set of active actors. Each [`update`](ActionExecutor::update)
//! visits a snapshot of that set once, advances the front action of each
//! queue, and applies the resulting effects. Failures stay local to the actor
//! being processed: they are logged and turn into a queue clear.
mod apply;
mod transition;

use std::collections::BTreeSet;

use crate::action::{Action, InitState};
use crate::config::ExecutorConfig;
use crate::env::{EnvError, ExecEnv, ScriptCall};
use crate::error::{EngineError, ErrorSeverity};
use crate::events::ActionEvent;
use crate::flags::{ActionFlags, ActionKind, ActionType};
use crate::queue::ActionQueue;
use crate::state::{ActorId, World, WorldError};

use transition::{StepContext, advance};

/// Reasons an action cannot proceed; each one clears the actor's queue.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("action has no target actor")]
    NoTarget,

    #[error("action has no target point")]
    NoTargetPoint,

    #[error("actor {0} is not movable")]
    NotMovable(ActorId),

    #[error("target not reachable for actor {0}")]
    Unreachable(ActorId),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Env(#[from] EnvError),
}

impl EngineError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::World(err) => err.severity(),
            Self::Env(err) => err.severity(),
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoTarget => "ACTION_NO_TARGET",
            Self::NoTargetPoint => "ACTION_NO_TARGET_POINT",
            Self::NotMovable(_) => "ACTION_NOT_MOVABLE",
            Self::Unreachable(_) => "ACTION_UNREACHABLE",
            Self::World(err) => err.error_code(),
            Self::Env(err) => err.error_code(),
        }
    }
}

/// Global pause state passed in every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PauseState {
    #[default]
    Running,
    /// Game time is paused: only `RUN_ON_PAUSE` actions advance.
    Paused,
    /// Everything stands still.
    Frozen,
}

/// What happens to the queue taken out for a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepOutcome {
    Keep,
    /// The actor was rebuilt; the old queue is discarded.
    Discard,
}

/// Scheduler for all action queues of one world.
#[derive(Debug, Default)]
pub struct ActionExecutor {
    active: BTreeSet<ActorId>,
    retired: Vec<Action>,
    events: Vec<ActionEvent>,
    config: ExecutorConfig,
}

impl ActionExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn is_active(&self, actor: ActorId) -> bool {
        self.active.contains(&actor)
    }

    pub fn active_actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.active.iter().copied()
    }

    /// Events produced since the previous drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<ActionEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn activate(&mut self, actor: ActorId) {
        self.active.insert(actor);
    }

    pub(crate) fn deactivate(&mut self, actor: ActorId) {
        self.active.remove(&actor);
    }

    pub(crate) fn retire(&mut self, action: Action) {
        self.retired.push(action);
    }

    pub(crate) fn notify(&mut self, event: ActionEvent) {
        self.events.push(event);
    }

    /// Advances every active queue by one tick and returns how many were visited.
    pub fn update(
        &mut self,
        world: &mut World,
        env: &mut ExecEnv<'_>,
        elapsed: f32,
        pause: PauseState,
    ) -> usize {
        if pause == PauseState::Frozen {
            return 0;
        }
        self.finalize_retired(env);

        let snapshot: Vec<ActorId> = self.active.iter().copied().collect();
        let mut visited = 0;
        for id in snapshot {
            // an earlier step may have emptied this queue
            if !self.active.contains(&id) {
                continue;
            }
            let Some(mut queue) = world.actor_mut(id).and_then(|a| a.action_queue.take()) else {
                tracing::warn!(actor = %id, "active queue without actor, dropping");
                self.deactivate(id);
                continue;
            };
            visited += 1;

            match self.step(&mut queue, world, env, elapsed, pause) {
                StepOutcome::Keep => match world.actor_mut(id) {
                    Some(actor) => actor.action_queue = Some(queue),
                    None => self.deactivate(id),
                },
                StepOutcome::Discard => self.deactivate(id),
            }
            self.finalize_retired(env);
        }
        visited
    }

    fn step(
        &mut self,
        queue: &mut ActionQueue,
        world: &mut World,
        env: &mut ExecEnv<'_>,
        elapsed: f32,
        pause: PauseState,
    ) -> StepOutcome {
        let id = queue.owner();
        let queue_len = queue.len();
        let Some(action) = queue.front_mut() else {
            self.deactivate(id);
            return StepOutcome::Keep;
        };
        if pause == PauseState::Paused && !action.has_flags(ActionFlags::RUN_ON_PAUSE) {
            return StepOutcome::Keep;
        }

        match action.init(id, env.scripts().ok()) {
            InitState::NotNeedInit | InitState::InitDoneOk => {}
            InitState::InitNeedRecall => return StepOutcome::Keep,
            InitState::InitFail => {
                tracing::warn!(actor = %id, action = action.script_name(), "action init failed, clearing queue");
                queue.clear(self);
                return StepOutcome::Keep;
            }
        }

        let mut cx = StepContext {
            actor: id,
            world: &mut *world,
            env: &mut *env,
            config: &self.config,
            elapsed,
            queue_len,
        };
        let effects = advance(action, &mut cx);
        self.apply(queue, world, env, effects)
    }

    /// Runs the end-of-life hooks of actions dropped from queues.
    ///
    /// Only started actions are finalized: the end script runs, a pure
    /// MOVING action reports the actor as no longer moving, and plain MOVE,
    /// START_MOVE or MOVING actions cancel the collaborator's move.
    pub fn finalize_retired(&mut self, env: &mut ExecEnv<'_>) {
        for mut action in std::mem::take(&mut self.retired) {
            let Some(owner) = action.owner() else {
                continue;
            };
            let end_script = action
                .prototype()
                .and_then(|proto| proto.script_on_end())
                .filter(|name| !name.is_empty())
                .map(str::to_owned);
            if let Some(script) = end_script {
                let call = ScriptCall {
                    actor: owner,
                    action: &mut action,
                    elapsed: None,
                };
                match env.scripts() {
                    Ok(scripts) => {
                        if let Err(err) = scripts.invoke(&script, call) {
                            tracing::warn!(actor = %owner, script, error = %err, "end script failed");
                        }
                    }
                    Err(err) => tracing::warn!(actor = %owner, script, error = %err, "cannot run end script"),
                }
            }

            let ty = action.action_type();
            if ty == ActionType::moving() {
                self.notify(ActionEvent::ActorMoving {
                    actor: owner,
                    moving: false,
                });
            }
            let cancels_move = ty == ActionType::of_kind(ActionKind::Move)
                || ty == ActionType::of_kind(ActionKind::StartMove)
                || ty == ActionType::moving();
            if cancels_move {
                if let Ok(movement) = env.movement() {
                    movement.cancel_move(owner);
                }
            }
        }
    }

    /// Clears every active queue and finalizes the dropped actions.
    pub fn unload(&mut self, world: &mut World, env: &mut ExecEnv<'_>) {
        let active: Vec<ActorId> = self.active.iter().copied().collect();
        for id in active {
            match world.queue_mut(id) {
                Ok(queue) => queue.clear(self),
                Err(err) => {
                    tracing::warn!(actor = %id, error = %err, "active queue missing on unload");
                    self.deactivate(id);
                }
            }
        }
        self.finalize_retired(env);
    }
}
