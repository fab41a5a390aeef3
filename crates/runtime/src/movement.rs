//! Straight-line movement driver.

use std::collections::HashMap;

use action_core::{
    ActorId, ActorState, MoveReadiness, MoveStep, MovementDriver, PathStatus, Point3,
    PropertyValue,
};

/// Walks actors through their target points in straight lines.
///
/// Paths are known immediately, so the wait action in front of a
/// `START_MOVE` is released synchronously. An actor's `Speed` float property
/// overrides the default speed.
#[derive(Debug, Clone)]
pub struct LinearMovement {
    speed: f32,
    paths: HashMap<ActorId, Vec<Point3>>,
}

impl LinearMovement {
    pub const SPEED_PROPERTY: &'static str = "Speed";

    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            paths: HashMap::new(),
        }
    }

    pub fn is_moving(&self, actor: ActorId) -> bool {
        self.paths.contains_key(&actor)
    }

    /// Waypoints the actor still has to reach.
    pub fn remaining(&self, actor: ActorId) -> &[Point3] {
        self.paths.get(&actor).map_or(&[], Vec::as_slice)
    }

    fn speed_of(&self, actor: &ActorState) -> f32 {
        actor
            .properties
            .get(Self::SPEED_PROPERTY)
            .and_then(PropertyValue::as_float)
            .map_or(self.speed, |speed| speed as f32)
    }
}

impl Default for LinearMovement {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl MovementDriver for LinearMovement {
    fn init_move(&mut self, actor: &ActorState, targets: &[Point3]) -> PathStatus {
        self.paths.insert(actor.id, targets.to_vec());
        PathStatus::Computed
    }

    fn move_is_ready(&mut self, actor: ActorId) -> MoveReadiness {
        match self.paths.get(&actor) {
            Some(path) if path.is_empty() => MoveReadiness::Failed,
            Some(_) => MoveReadiness::Ready,
            // e.g. after restoring a save: start over
            None => MoveReadiness::Retry,
        }
    }

    fn do_move_step(&mut self, actor: &mut ActorState, elapsed: f32) -> MoveStep {
        let mut budget = self.speed_of(actor) * elapsed;
        let Some(path) = self.paths.get_mut(&actor.id) else {
            return MoveStep::Failed;
        };
        while let Some(&next) = path.first() {
            let distance = actor.position.distance(next);
            if distance > budget {
                actor.position = actor.position.towards(next, budget);
                return MoveStep::Continue;
            }
            actor.position = next;
            budget -= distance;
            path.remove(0);
        }
        self.paths.remove(&actor.id);
        MoveStep::Arrived
    }

    fn cancel_move(&mut self, actor: ActorId) {
        self.paths.remove(&actor);
    }
}

#[cfg(test)]
mod tests {
    use action_core::ComponentKind;

    use super::*;

    #[test]
    fn walks_waypoints_in_order() {
        let mut driver = LinearMovement::new(2.0);
        let mut actor = ActorState::new("walker").with_component(ComponentKind::Movable);
        let targets = [Point3::new(1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 2.0)];

        assert!(driver.is_movable(&actor));
        assert_eq!(driver.init_move(&actor, &targets), PathStatus::Computed);
        assert_eq!(driver.move_is_ready(actor.id), MoveReadiness::Ready);

        assert_eq!(driver.do_move_step(&mut actor, 1.0), MoveStep::Continue);
        assert_eq!(actor.position, Point3::new(1.0, 0.0, 1.0));
        assert_eq!(driver.remaining(actor.id), &targets[1..]);

        assert_eq!(driver.do_move_step(&mut actor, 1.0), MoveStep::Arrived);
        assert_eq!(actor.position, targets[1]);
        assert!(!driver.is_moving(actor.id));
    }

    #[test]
    fn speed_property_overrides_default() {
        let mut driver = LinearMovement::new(1.0);
        let mut actor = ActorState::new("horse");
        actor.properties.set("Speed", PropertyValue::Float(4.0));
        driver.init_move(&actor, &[Point3::new(10.0, 0.0, 0.0)]);
        driver.do_move_step(&mut actor, 1.0);
        assert_eq!(actor.position, Point3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn unknown_or_cancelled_moves() {
        let mut driver = LinearMovement::default();
        let mut actor = ActorState::new("ghost");
        assert_eq!(driver.move_is_ready(actor.id), MoveReadiness::Retry);
        assert_eq!(driver.do_move_step(&mut actor, 1.0), MoveStep::Failed);

        driver.init_move(&actor, &[]);
        assert_eq!(driver.move_is_ready(actor.id), MoveReadiness::Failed);
        driver.cancel_move(actor.id);
        assert!(!driver.is_moving(actor.id));
    }
}
