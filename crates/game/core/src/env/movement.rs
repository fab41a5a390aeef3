//! Movement, spatial and animation collaborators.
use crate::state::{ActorId, ActorState, ComponentKind, Point3};

/// Outcome of starting path computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStatus {
    /// Computation continues in the background; the driver (or host) marks
    /// the waiting action ready when it completes.
    Pending,
    /// The path is already known.
    Computed,
}

/// Answer of [`MovementDriver::move_is_ready`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveReadiness {
    /// No path request is known for the actor (e.g. after loading a save);
    /// the move has to be started again.
    Retry,
    Pending,
    Ready,
    /// The target cannot be reached.
    Failed,
}

/// Result of advancing a move by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveStep {
    Continue,
    Arrived,
    Failed,
}

/// Path finding and locomotion for movable actors.
pub trait MovementDriver {
    fn is_movable(&self, actor: &ActorState) -> bool {
        actor.has_component(ComponentKind::Movable)
    }

    fn init_move(&mut self, actor: &ActorState, targets: &[Point3]) -> PathStatus;

    fn move_is_ready(&mut self, actor: ActorId) -> MoveReadiness;

    fn do_move_step(&mut self, actor: &mut ActorState, elapsed: f32) -> MoveStep;

    fn cancel_move(&mut self, actor: ActorId);
}

/// Free-space lookup used when placing actors.
pub trait SpatialQuery {
    /// Nearest unobstructed position to `near`, if any.
    fn find_free_position(&self, near: Point3) -> Option<Point3>;
}

/// Animation trigger by name.
pub trait Animator {
    fn set_animation(&mut self, actor: ActorId, animation: &str);
}
