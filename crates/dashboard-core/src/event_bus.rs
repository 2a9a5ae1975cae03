//! Observer set and event fan-out.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, trace};
use uuid::Uuid;

/// Identifier of a connected observer.
pub type ObserverId = String;

/// Default per-observer outbound queue length.
pub const DEFAULT_OBSERVER_BUFFER: usize = 100;

/// Set of connected observers.
///
/// Each observer is an outbound queue drained by its connection. A queue whose
/// receiving side is gone marks the observer as disconnected; it is removed on
/// the first failed send.
pub struct EventBus {
    observers: DashMap<ObserverId, mpsc::Sender<String>>,
    buffer: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_buffer(DEFAULT_OBSERVER_BUFFER)
    }

    /// Create a bus whose observer queues hold up to `buffer` frames.
    pub fn with_buffer(buffer: usize) -> Self {
        Self {
            observers: DashMap::new(),
            buffer: buffer.max(1),
        }
    }

    /// Register a new observer and return its id and outbound queue.
    pub fn join(&self) -> (ObserverId, mpsc::Receiver<String>) {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(self.buffer);
        self.observers.insert(id.clone(), tx);
        trace!("observer joined: {}", id);
        (id, rx)
    }

    /// Remove an observer. Unknown ids are ignored.
    pub fn leave(&self, id: &str) -> bool {
        let removed = self.observers.remove(id).is_some();
        if removed {
            trace!("observer left: {}", id);
        }
        removed
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.observers.contains_key(id)
    }

    /// Deliver a frame to one observer.
    ///
    /// Returns `false` if the observer is unknown or gone; a gone observer is
    /// removed.
    pub async fn send_to(&self, id: &str, text: impl Into<String>) -> bool {
        let Some(sender) = self.observers.get(id).map(|entry| entry.value().clone()) else {
            return false;
        };

        if sender.send(text.into()).await.is_ok() {
            true
        } else {
            self.leave(id);
            false
        }
    }

    /// Deliver a frame to every observer joined when the call begins.
    ///
    /// Never waits for queue space: an observer whose queue is full misses
    /// this frame, and a closed queue removes its observer. Returns the number
    /// of observers reached.
    pub fn broadcast(&self, text: impl Into<String>) -> usize {
        let text = text.into();
        let targets: Vec<(ObserverId, mpsc::Sender<String>)> = self
            .observers
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut delivered = 0;
        for (id, sender) in targets {
            match sender.try_send(text.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    debug!("observer {} queue full, frame dropped", id);
                }
                Err(TrySendError::Closed(_)) => {
                    self.leave(&id);
                }
            }
        }
        delivered
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
