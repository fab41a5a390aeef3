//! Topic-based event bus for engine events.
//!
//! The executor collects [`ActionEvent`](action_core::ActionEvent)s during a
//! tick; the runtime drains them afterwards and publishes each one on its
//! topic so consumers only see what they subscribed to.

mod bus;

pub use bus::{EventBus, Topic};
