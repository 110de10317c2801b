use pocketlink_core::{EventSink, Level};
use serde_json::Value;

/// Target of every event forwarded by [`TracingSink`], so they can be
/// filtered separately (`RUST_LOG=pocketlink::event=info`).
pub const EVENT_TARGET: &str = "pocketlink::event";

/// An [`EventSink`] that emits each domain event as a `tracing` event at the
/// matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn log(&self, level: Level, event: &str, payload: &Value) {
        match level {
            Level::Info => tracing::info!(target: EVENT_TARGET, event, %payload),
            Level::Warn => tracing::warn!(target: EVENT_TARGET, event, %payload),
            Level::Error => tracing::error!(target: EVENT_TARGET, event, %payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriber::build_plain_subscriber;
    use pocketlink_core::EventLogger;
    use serde_json::json;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::EnvFilter;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn forwards_events_with_payload() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = build_plain_subscriber(EnvFilter::new("info"), move || writer.clone());
        let logger = EventLogger::new(Arc::new(TracingSink));

        tracing::subscriber::with_default(subscriber, || {
            logger.info("shorten_row_success", json!({ "shortcode": "abc1234" }));
            logger.warn("redirect_not_found", json!({ "shortcode": "nope" }));
        });

        let output = buffer.contents();
        assert!(output.contains("shorten_row_success"), "{output}");
        assert!(output.contains("abc1234"), "{output}");
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("redirect_not_found"), "{output}");
    }

    #[test]
    fn respects_the_filter() {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = build_plain_subscriber(EnvFilter::new("error"), move || writer.clone());

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.log(Level::Info, "storage_url_saved", &json!({}));
            TracingSink.log(Level::Error, "storage_write_error", &json!({ "error": "full" }));
        });

        let output = buffer.contents();
        assert!(!output.contains("storage_url_saved"), "{output}");
        assert!(output.contains("storage_write_error"), "{output}");
    }
}
