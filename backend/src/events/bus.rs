//! Publish/subscribe delivery of session events
//!
//! Achievements, statistics and balance display subscribe here instead of
//! hooking into the engine. Each published event reaches every subscriber
//! exactly once, in publish order.

use crate::models::event::GameEvent;

/// Receiver of session events
///
/// Any `FnMut(&GameEvent)` closure is a subscriber.
pub trait EventSubscriber {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> EventSubscriber for F
where
    F: FnMut(&GameEvent),
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Fan-out of events to registered subscribers
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Box<dyn EventSubscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn EventSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn publish(&mut self, event: &GameEvent) {
        for subscriber in &mut self.subscribers {
            subscriber.on_event(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
