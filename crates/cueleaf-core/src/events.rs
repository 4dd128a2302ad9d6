//! Typed outbound event channels.
//!
//! Each component owns an [`EventBus`] for its own event type. Consumers call
//! [`EventBus::subscribe`] whenever they like and get a plain `mpsc::Receiver`;
//! nothing needs to know its listeners at construction time.

use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug)]
pub struct EventBus<E> {
    subscribers: Vec<Sender<E>>,
}

impl<E: Clone> EventBus<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<E> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver to every live subscriber; dropped receivers are pruned.
    pub fn emit(&mut self, event: E) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect everything currently queued on a receiver.
pub fn drain<E>(rx: &Receiver<E>) -> Vec<E> {
    rx.try_iter().collect()
}
