//! Per-tick transition of the front action.
//!
//! [`advance`] updates the action in place (timer, type rewrites) and polls
//! the movement and script collaborators, but never touches the queue. Every
//! queue or cross-actor change is returned as an [`Effect`] for the executor
//! to apply.
use crate::action::Action;
use crate::config::ExecutorConfig;
use crate::env::{ExecEnv, MoveReadiness, MoveStep, ScriptCall, ScriptHost};
use crate::events::ActionEvent;
use crate::flags::{ActionFlags, ActionKind, ActionType};
use crate::state::{ActorId, ObjectRef, Point3, World};

use super::ActionError;

/// Side effect requested by a transition, applied in order.
#[derive(Debug)]
pub(crate) enum Effect {
    /// Pop the front action and end the actor's step.
    Finish,
    /// Drop the whole queue and end the actor's step.
    Clear,
    /// Log, then clear.
    Fail(ActionError),
    PushFront(Action),
    InitMove(Vec<Point3>),
    Animate(String),
    Emit(ActionEvent),
    Exit {
        tools: Vec<ObjectRef>,
    },
    Enter {
        target: ActorId,
    },
    Transfer {
        from: ObjectRef,
        to: ObjectRef,
        tools: Vec<ObjectRef>,
        /// Tools may rebuild the receiving actor.
        may_recreate: bool,
    },
}

pub(crate) struct StepContext<'s, 'a> {
    pub actor: ActorId,
    pub world: &'s mut World,
    pub env: &'s mut ExecEnv<'a>,
    pub config: &'s ExecutorConfig,
    pub elapsed: f32,
    pub queue_len: usize,
}

pub(crate) fn advance(action: &mut Action, cx: &mut StepContext<'_, '_>) -> Vec<Effect> {
    let ty = action.action_type();

    // continuous modifiers, first completion wins
    if ty.contains(ActionFlags::MOVING) {
        match move_step(cx) {
            MoveStep::Continue => {}
            MoveStep::Arrived => {
                tracing::debug!(actor = %cx.actor, "move finished");
                return vec![Effect::Animate(cx.config.idle_animation.clone()), Effect::Finish];
            }
            MoveStep::Failed => {
                tracing::warn!(actor = %cx.actor, "move finished with error");
                return vec![Effect::Animate(cx.config.idle_animation.clone()), Effect::Clear];
            }
        }
    }
    if ty.contains(ActionFlags::WAIT_FOR_READY_FLAG) && action.ready {
        return vec![Effect::Finish];
    }
    if ty.contains(ActionFlags::WAIT_FOR_TIMEOUT) {
        action.timer -= cx.elapsed;
        if action.timer < 0.0 {
            return vec![Effect::Finish];
        }
    }
    if ty.contains(ActionFlags::WAIT_FOR_NEXT_ACTION) && cx.queue_len > 1 {
        return vec![Effect::Finish];
    }

    match ty.kind {
        ActionKind::Empty | ActionKind::SelectTool => Vec::new(),
        ActionKind::RunScript => run_script(action, cx),
        ActionKind::Exit => vec![
            Effect::Exit {
                tools: action.tool_objects.iter().copied().collect(),
            },
            Effect::Finish,
        ],
        ActionKind::Enter => match first_target(action) {
            Ok(target) => vec![Effect::Enter { target }, Effect::Clear],
            Err(err) => vec![Effect::Fail(err)],
        },
        ActionKind::GetTools => match first_target(action) {
            Ok(target) => vec![
                Effect::Transfer {
                    from: ObjectRef::Actor(target),
                    to: ObjectRef::Actor(cx.actor),
                    tools: action.tool_objects.iter().copied().collect(),
                    may_recreate: true,
                },
                Effect::Finish,
            ],
            Err(err) => vec![Effect::Fail(err)],
        },
        ActionKind::PutTools => match first_target(action) {
            Ok(target) => vec![
                Effect::Transfer {
                    from: ObjectRef::Actor(cx.actor),
                    to: ObjectRef::Actor(target),
                    tools: action.tool_objects.iter().copied().collect(),
                    may_recreate: false,
                },
                Effect::Finish,
            ],
            Err(err) => vec![Effect::Fail(err)],
        },
        ActionKind::Move => start_move(action, cx),
        ActionKind::StartMove => poll_move(action, cx),
    }
}

fn first_target(action: &Action) -> Result<ActorId, ActionError> {
    action
        .target_objects
        .first()
        .copied()
        .ok_or(ActionError::NoTarget)
}

fn move_step(cx: &mut StepContext<'_, '_>) -> MoveStep {
    let Ok(movement) = cx.env.movement() else {
        return MoveStep::Failed;
    };
    match cx.world.actor_mut(cx.actor) {
        Some(actor) => movement.do_move_step(actor, cx.elapsed),
        None => MoveStep::Failed,
    }
}

/// A script error finishes the action.
fn run_script(action: &mut Action, cx: &mut StepContext<'_, '_>) -> Vec<Effect> {
    let name = action.script_name().to_owned();
    let done = match cx.env.scripts() {
        Ok(scripts) => {
            let call = ScriptCall {
                actor: cx.actor,
                action,
                elapsed: Some(cx.elapsed),
            };
            scripts.invoke_bool(&name, call).unwrap_or_else(|err| {
                tracing::warn!(actor = %cx.actor, script = %name, error = %err, "action script failed");
                true
            })
        }
        Err(err) => {
            tracing::warn!(actor = %cx.actor, script = %name, error = %err, "cannot run action script");
            true
        }
    };
    if done {
        tracing::debug!(actor = %cx.actor, script = %name, "action script finished");
        vec![Effect::Finish]
    } else {
        Vec::new()
    }
}

/// MOVE: becomes START_MOVE behind a synthetic wait action released when the
/// path is known.
fn start_move(action: &mut Action, cx: &mut StepContext<'_, '_>) -> Vec<Effect> {
    let movable = match (cx.env.movement(), cx.world.actor(cx.actor)) {
        (Ok(movement), Some(actor)) => movement.is_movable(actor),
        _ => false,
    };
    if !movable {
        return vec![Effect::Fail(ActionError::NotMovable(cx.actor))];
    }
    if action.target_points.is_empty() {
        return vec![Effect::Fail(ActionError::NoTargetPoint)];
    }
    action.set_action_type(ActionType::of_kind(ActionKind::StartMove));
    let wait = Action::new(ActionType::with_flags(ActionFlags::WAIT_FOR_READY_FLAG), 0.0).without_saving();
    vec![
        Effect::PushFront(wait),
        Effect::InitMove(action.target_points.clone()),
    ]
}

fn poll_move(action: &mut Action, cx: &mut StepContext<'_, '_>) -> Vec<Effect> {
    let readiness = match cx.env.movement() {
        Ok(movement) => movement.move_is_ready(cx.actor),
        Err(err) => return vec![Effect::Fail(err.into())],
    };
    match readiness {
        MoveReadiness::Retry => {
            action.set_action_type(ActionType::of_kind(ActionKind::Move));
            Vec::new()
        }
        MoveReadiness::Pending => Vec::new(),
        MoveReadiness::Ready => {
            action.set_action_type(ActionType::moving());
            vec![
                Effect::Animate(cx.config.move_animation.clone()),
                Effect::Emit(ActionEvent::ActorMoving {
                    actor: cx.actor,
                    moving: true,
                }),
            ]
        }
        MoveReadiness::Failed => vec![Effect::Fail(ActionError::Unreachable(cx.actor))],
    }
}
