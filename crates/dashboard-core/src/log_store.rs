//! Bounded store of recent log records.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use dashboard_protocols::{DashboardEvent, LogRecord};

use crate::event_bus::EventBus;

/// Default number of records kept before the oldest are evicted.
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Pending live records per subscriber before it starts lagging.
const LIVE_CHANNEL_CAPACITY: usize = 256;

/// Append-only ring of recent log records.
///
/// Every appended record is also published to live subscribers; see
/// [`LogStore::forward_to`] for the bridge to connected observers.
pub struct LogStore {
    records: RwLock<VecDeque<LogRecord>>,
    capacity: usize,
    live: broadcast::Sender<LogRecord>,
}

impl LogStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (live, _) = broadcast::channel(LIVE_CHANNEL_CAPACITY);
        Self {
            records: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY))),
            capacity,
            live,
        }
    }

    /// Append a record, evicting the oldest one when full.
    pub fn append(&self, record: LogRecord) {
        {
            let mut records = self.records.write();
            if records.len() == self.capacity {
                records.pop_front();
            }
            records.push_back(record.clone());
        }
        // No subscribers is not an error.
        let _ = self.live.send(record);
    }

    /// Up to `limit` most recent records, oldest first.
    pub fn recent(&self, limit: NonZeroUsize) -> Vec<LogRecord> {
        let records = self.records.read();
        let skip = records.len().saturating_sub(limit.get());
        records.iter().skip(skip).cloned().collect()
    }

    /// Receive records as they are appended.
    pub fn subscribe(&self) -> broadcast::Receiver<LogRecord> {
        self.live.subscribe()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Broadcast every newly appended record as `LOG:<message>` to all observers.
    ///
    /// The returned task ends when the store is dropped.
    pub fn forward_to(&self, bus: Arc<EventBus>) -> JoinHandle<()> {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(record) => {
                        bus.broadcast(DashboardEvent::log(record.message));
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("log forwarder lagged, {} records not broadcast", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("log store closed, forwarder exiting");
                        break;
                    }
                }
            }
        })
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use dashboard_protocols::LogLevel;

    fn limit(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn fill(store: &LogStore, count: usize) {
        for i in 0..count {
            store.append(LogRecord::info(format!("record {}", i)));
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = LogStore::default();
        assert!(store.is_empty());
        assert_eq!(store.capacity(), DEFAULT_LOG_CAPACITY);
        assert!(store.recent(limit(10)).is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let store = LogStore::new(0);
        assert_eq!(store.capacity(), 1);
        fill(&store, 3);
        assert_eq!(store.len(), 1);
        assert_eq!(store.recent(limit(5))[0].message, "record 2");
    }

    #[test]
    fn test_recent_returns_newest_window_oldest_first() {
        let store = LogStore::default();
        fill(&store, 120);

        let recent = store.recent(limit(50));
        assert_eq!(recent.len(), 50);
        assert_eq!(recent.first().unwrap().message, "record 70");
        assert_eq!(recent.last().unwrap().message, "record 119");
    }

    #[test]
    fn test_recent_more_than_available_returns_all() {
        let store = LogStore::default();
        fill(&store, 3);

        let recent = store.recent(limit(100));
        let messages: Vec<_> = recent.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["record 0", "record 1", "record 2"]);
    }

    #[test]
    fn test_recent_count_is_min_of_limit_and_total() {
        for total in [0usize, 1, 5, 64, 100] {
            let store = LogStore::new(64);
            fill(&store, total);
            let retained = total.min(store.capacity());
            for n in [1usize, 2, 10, 64, 200] {
                assert_eq!(store.recent(limit(n)).len(), n.min(retained));
            }
        }
    }

    #[test]
    fn test_ring_evicts_oldest() {
        let store = LogStore::new(10);
        fill(&store, 25);

        assert_eq!(store.len(), 10);
        let recent = store.recent(limit(10));
        assert_eq!(recent[0].message, "record 15");
        assert_eq!(recent[9].message, "record 24");
    }

    #[tokio::test]
    async fn test_subscribe_receives_appends() {
        let store = LogStore::default();
        let mut rx = store.subscribe();

        store.append(LogRecord::new(LogLevel::Warning, "careful"));

        let record = rx.recv().await.unwrap();
        assert_eq!(record.level, LogLevel::Warning);
        assert_eq!(record.message, "careful");
    }

    #[tokio::test]
    async fn test_forward_to_broadcasts_log_events() {
        let store = LogStore::default();
        let bus = Arc::new(EventBus::new());
        let (_id, mut rx) = bus.join();

        let forwarder = store.forward_to(bus.clone());
        store.append(LogRecord::info("agent started"));

        assert_eq!(rx.recv().await.unwrap(), "LOG:agent started");
        forwarder.abort();
    }

    #[tokio::test]
    async fn test_forward_to_keeps_flowing_past_stalled_observer() {
        let store = LogStore::default();
        let bus = Arc::new(EventBus::with_buffer(1));
        let (_stalled, _rx_stalled) = bus.join();
        let (_reader, mut rx) = bus.join();

        let forwarder = store.forward_to(bus.clone());
        for i in 0..5 {
            store.append(LogRecord::info(format!("step {}", i)));
            assert_eq!(rx.recv().await.unwrap(), format!("LOG:step {}", i));
        }
        forwarder.abort();
    }

    #[tokio::test]
    async fn test_forwarder_exits_when_store_dropped() {
        let store = LogStore::default();
        let bus = Arc::new(EventBus::new());
        let forwarder = store.forward_to(bus);
        drop(store);
        assert!(forwarder.await.is_ok());
    }
}
