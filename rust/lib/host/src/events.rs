use serde::Serialize;
use tokio::sync::broadcast;

/// A fire-and-forget notification addressed to a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event name, e.g. `pick_progress_updated`.
    pub name: String,
    pub payload: serde_json::Value,
    /// Target user; `None` broadcasts to everyone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// EventSink is the platform's realtime delivery seam.
///
/// Emission must never fail the emitting operation — implementations
/// swallow delivery errors.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// In-process event hub over a tokio broadcast channel.
///
/// The module's long-poll endpoint subscribes here; a real platform
/// deployment would bridge this to its own realtime transport.
pub struct EventHub {
    tx: broadcast::Sender<Event>,
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventSink for EventHub {
    fn emit(&self, event: Event) {
        tracing::debug!(name = %event.name, user = ?event.user, "event emitted");
        // No receivers is fine — fire-and-forget.
        let _ = self.tx.send(event);
    }
}

/// Discards all events. Useful in tests that don't observe notifications.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_emitted_event() {
        let hub = EventHub::new(8);
        let mut rx = hub.subscribe();

        hub.emit(Event {
            name: "pick_progress_updated".into(),
            payload: serde_json::json!({"pickList": "PL-1"}),
            user: Some("alice".into()),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.name, "pick_progress_updated");
        assert_eq!(event.user.as_deref(), Some("alice"));
    }

    #[test]
    fn emit_without_subscribers_is_fine() {
        let hub = EventHub::new(8);
        hub.emit(Event {
            name: "noop".into(),
            payload: serde_json::Value::Null,
            user: None,
        });
    }

    #[test]
    fn null_sink_swallows_everything() {
        NullSink.emit(Event {
            name: "noop".into(),
            payload: serde_json::Value::Null,
            user: Some("alice".into()),
        });
    }
}
