use super::transition::Effect;
use super::{ActionError, ActionExecutor, StepOutcome};
use crate::env::{ExecEnv, PathStatus};
use crate::events::ActionEvent;
use crate::property::PropertyValue;
use crate::queue::ActionQueue;
use crate::state::{ActorId, ObjectRef, ObjectView, Point3, PrototypeId, World, WorldError};

/// Result of moving tools between two ledgers.
enum Transfer {
    Done,
    /// The receiving actor was rebuilt; its queue no longer exists.
    Recreated,
}

impl ActionExecutor {
    /// Applies effects in order. `Finish`, `Clear` and failures end the step.
    pub(super) fn apply(
        &mut self,
        queue: &mut ActionQueue,
        world: &mut World,
        env: &mut ExecEnv<'_>,
        effects: Vec<Effect>,
    ) -> StepOutcome {
        let id = queue.owner();
        for effect in effects {
            let result = match effect {
                Effect::Finish => {
                    queue.finish_action(self);
                    return StepOutcome::Keep;
                }
                Effect::Clear => {
                    queue.clear(self);
                    return StepOutcome::Keep;
                }
                Effect::Fail(err) => Err(err),
                Effect::PushFront(action) => {
                    queue.add_action_at_front(action, self);
                    Ok(())
                }
                Effect::InitMove(points) => self.init_move(queue, world, env, &points),
                Effect::Animate(animation) => {
                    env.animate(id, &animation);
                    Ok(())
                }
                Effect::Emit(event) => {
                    self.notify(event);
                    Ok(())
                }
                Effect::Exit { tools } => self.exit_tools(id, world, env, &tools),
                Effect::Enter { target } => enter(id, target, world),
                Effect::Transfer {
                    from,
                    to,
                    tools,
                    may_recreate,
                } => match self.transfer_tools(id, from, to, &tools, may_recreate, world) {
                    Ok(Transfer::Done) => Ok(()),
                    Ok(Transfer::Recreated) => return StepOutcome::Discard,
                    Err(err) => Err(err),
                },
            };
            if let Err(err) = result {
                tracing::warn!(actor = %id, error = %err, "action failed, clearing queue");
                queue.clear(self);
                return StepOutcome::Keep;
            }
        }
        StepOutcome::Keep
    }

    /// Starts path computation; a synchronously computed path releases the
    /// wait action now at the front of the queue.
    fn init_move(
        &mut self,
        queue: &mut ActionQueue,
        world: &World,
        env: &mut ExecEnv<'_>,
        points: &[Point3],
    ) -> Result<(), ActionError> {
        let id = queue.owner();
        let actor = world.actor(id).ok_or(WorldError::ActorNotFound(id))?;
        if env.movement()?.init_move(actor, points) == PathStatus::Computed {
            queue.mark_front_ready();
        }
        Ok(())
    }

    /// Drops every carried tool near the actor's exit point. Each free
    /// position search starts where the previous tool landed.
    fn exit_tools(
        &mut self,
        id: ActorId,
        world: &mut World,
        env: &ExecEnv<'_>,
        tools: &[ObjectRef],
    ) -> Result<(), ActionError> {
        let mut position = {
            let actor = world
                .actor(id)
                .ok_or(WorldError::ActorNotFound(id))?;
            let offset = actor
                .properties
                .get(&self.config.exit_offset_property)
                .and_then(PropertyValue::as_point)
                .unwrap_or(Point3::ZERO);
            actor.position + offset
        };
        world.ledger_mut(ObjectRef::Actor(id))?;

        for &tool in tools {
            position = env
                .spatial()
                .and_then(|spatial| spatial.find_free_position(position))
                .unwrap_or(position);
            position.y = 0.0;

            match tool {
                ObjectRef::Prototype(proto) => {
                    let name = world
                        .prototype(proto)
                        .map(|p| p.name.clone())
                        .ok_or(WorldError::PrototypeNotFound(proto))?;
                    let spawned = world.spawn(proto, name, position)?;
                    tracing::debug!(actor = %id, spawned = %spawned, "tool spawned on exit");
                    self.notify(ActionEvent::ActorSpawned {
                        actor: spawned,
                        from: proto,
                    });
                }
                ObjectRef::Actor(tool_actor) => {
                    let placed = world
                        .actor_mut(tool_actor)
                        .ok_or(WorldError::ActorNotFound(tool_actor))?;
                    placed.position = position;
                    placed.set_available(true);
                }
            }
            world.ledger_mut(ObjectRef::Actor(id))?.update(tool, -1, 0);
        }
        Ok(())
    }

    /// Moves one unit of each tool between ledgers (current quantity only;
    /// planned quantities were reserved when the action was queued).
    ///
    /// Stops at the first tool that rebuilds the receiver; later tools in the
    /// batch are not transferred.
    fn transfer_tools(
        &mut self,
        id: ActorId,
        from: ObjectRef,
        to: ObjectRef,
        tools: &[ObjectRef],
        may_recreate: bool,
        world: &mut World,
    ) -> Result<Transfer, ActionError> {
        world.ledger_mut(from)?;
        world.ledger_mut(to)?;

        for &tool in tools {
            world.ledger_mut(from)?.update(tool, -1, 0);
            world.ledger_mut(to)?.update(tool, 1, 0);

            if !may_recreate {
                continue;
            }
            if let Some(prototype) = self.recreate_target(world, tool)? {
                world.recreate_actor(id, prototype)?;
                tracing::info!(actor = %id, prototype = %prototype, "actor recreated by tool");
                self.notify(ActionEvent::ActorRecreated {
                    actor: id,
                    prototype,
                });
                return Ok(Transfer::Recreated);
            }
        }
        Ok(Transfer::Done)
    }

    fn recreate_target(
        &self,
        world: &World,
        tool: ObjectRef,
    ) -> Result<Option<PrototypeId>, ActionError> {
        let Some(props) = world.properties(tool) else {
            return Ok(None);
        };
        let wants_recreate = props
            .get(&self.config.recreate_flag_property)
            .and_then(PropertyValue::as_bool)
            .unwrap_or(false);
        if !wants_recreate {
            return Ok(None);
        }
        let name = props
            .get(&self.config.recreate_prototype_property)
            .and_then(PropertyValue::as_text)
            .unwrap_or_default();
        world
            .find_prototype(name)
            .map(Some)
            .ok_or_else(|| WorldError::UnknownPrototype(name.to_owned()).into())
    }
}

/// The actor goes inside `target`: the target now holds it and it is hidden.
fn enter(id: ActorId, target: ActorId, world: &mut World) -> Result<(), ActionError> {
    world
        .ledger_mut(ObjectRef::Actor(target))?
        .update(ObjectRef::Actor(id), 1, 1);
    world.set_available(id, false)?;
    Ok(())
}
