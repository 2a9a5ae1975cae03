//! Tracing layer that feeds the log store.
//!
//! Events at or above the configured level become [`LogRecord`]s. Events
//! emitted by the bus, the store and the transport crates that carry `LOG:`
//! frames are skipped, otherwise every broadcast could log its way back into
//! the store.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use dashboard_protocols::{LogLevel, LogRecord};

use crate::log_store::LogStore;

/// Modules of this crate, matched exactly.
const INTERNAL_TARGETS: [&str; 3] = [
    "dashboard_core::event_bus",
    "dashboard_core::log_store",
    "dashboard_core::capture",
];

/// Crates on the outbound frame path, matched with all their submodules.
const TRANSPORT_TARGETS: [&str; 5] = [
    "tungstenite",
    "tokio_tungstenite",
    "hyper",
    "hyper_util",
    "axum::serve",
];

fn is_skipped(target: &str) -> bool {
    INTERNAL_TARGETS.contains(&target)
        || TRANSPORT_TARGETS.iter().any(|prefix| {
            target
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
        })
}

/// Map a tracing level onto a dashboard log level.
pub fn log_level(level: &Level) -> LogLevel {
    match *level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warning,
        Level::ERROR => LogLevel::Error,
    }
}

/// Captures tracing events into a [`LogStore`].
pub struct LogCaptureLayer {
    store: Arc<LogStore>,
    min_level: LogLevel,
}

impl LogCaptureLayer {
    pub fn new(store: Arc<LogStore>, min_level: LogLevel) -> Self {
        Self { store, min_level }
    }
}

impl<S: Subscriber> Layer<S> for LogCaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = log_level(metadata.level());
        if level < self.min_level {
            return;
        }
        if is_skipped(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.store.append(LogRecord::new(level, visitor.finish()));
    }
}

/// Collects the `message` field, then any other fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}
