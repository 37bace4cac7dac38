//! Event delivery to out-of-core collaborators

pub mod bus;

pub use bus::{EventBus, EventSubscriber};
