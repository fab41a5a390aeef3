//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use action_core::ActionEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Queue mutations
    Queue,
    /// Actors starting or stopping to move
    Movement,
    /// Actors spawned or rebuilt
    Lifecycle,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Queue, Topic::Movement, Topic::Lifecycle];

    pub fn of(event: &ActionEvent) -> Self {
        match event {
            ActionEvent::QueueUpdated { .. } => Topic::Queue,
            ActionEvent::ActorMoving { .. } => Topic::Movement,
            ActionEvent::ActorRecreated { .. } | ActionEvent::ActorSpawned { .. } => {
                Topic::Lifecycle
            }
        }
    }
}

#[derive(Debug)]
struct Channels {
    queue: broadcast::Sender<ActionEvent>,
    movement: broadcast::Sender<ActionEvent>,
    lifecycle: broadcast::Sender<ActionEvent>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<ActionEvent> {
        match topic {
            Topic::Queue => &self.queue,
            Topic::Movement => &self.movement,
            Topic::Lifecycle => &self.lifecycle,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events published while a
/// topic has no subscribers are dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(action_core::EngineConfig::DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                queue: broadcast::channel(capacity).0,
                movement: broadcast::channel(capacity).0,
                lifecycle: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: ActionEvent) {
        let topic = Topic::of(&event);
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<ActionEvent> {
        self.channels.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<ActionEvent>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
