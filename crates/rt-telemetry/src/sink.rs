//! Event sinks: where structured events go.
//!
//! Production wires [`TracingSink`] (forwards to `tracing`); tests use
//! [`CaptureSink`] to assert on exactly which events a component emitted.

use crate::events::{Level, LogEvent};
use std::sync::Mutex;

/// A destination for structured log events.
///
/// Implementations must not panic: logging is diagnostic only and never
/// allowed to terminate the calling workflow.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: LogEvent);
}

/// Forwards events to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: LogEvent) {
        let fields = serde_json::Value::Object(
            event
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );
        // tracing levels must be static, hence one arm per level
        match event.level {
            Level::Debug => tracing::debug!(
                event = %event.event,
                user_id = %event.user_id,
                project_id = %event.project_id,
                session_id = %event.session_id,
                fields = %fields,
                "{}",
                event.message
            ),
            Level::Info => tracing::info!(
                event = %event.event,
                user_id = %event.user_id,
                project_id = %event.project_id,
                session_id = %event.session_id,
                fields = %fields,
                "{}",
                event.message
            ),
            Level::Warn => tracing::warn!(
                event = %event.event,
                user_id = %event.user_id,
                project_id = %event.project_id,
                session_id = %event.session_id,
                fields = %fields,
                "{}",
                event.message
            ),
            Level::Error => tracing::error!(
                event = %event.event,
                user_id = %event.user_id,
                project_id = %event.project_id,
                session_id = %event.session_id,
                fields = %fields,
                "{}",
                event.message
            ),
        }
    }
}

/// Accumulates events in memory for deterministic test assertions.
#[derive(Debug, Default)]
pub struct CaptureSink {
    events: Mutex<Vec<LogEvent>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured events.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Captured events with the given event name.
    pub fn events_named(&self, name: &str) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.event == name)
            .collect()
    }

    /// Whether nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.events.lock().map(|e| e.is_empty()).unwrap_or(true)
    }
}

impl EventSink for CaptureSink {
    fn emit(&self, event: LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
