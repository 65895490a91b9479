//! In-memory sink for unit testing without a gateway connection.

use std::sync::{Arc, Mutex};

use crate::sink::{RelaySink, SinkError};

/// Shared record of every delivery across a fleet of mock sinks:
/// `(identity, content)` pairs in send order.
pub type SendLog = Arc<Mutex<Vec<(String, String)>>>;

/// Sink that records deliveries into a [`SendLog`] shared by all
/// identities in a test, standing in for the shared destination channel.
#[derive(Clone)]
pub struct MockSink {
    identity: String,
    log: SendLog,
    fail_with: Option<&'static str>,
}

impl MockSink {
    /// Create a recording sink for `identity` writing into `log`.
    pub fn new(identity: impl Into<String>, log: SendLog) -> Self {
        Self {
            identity: identity.into(),
            log,
            fail_with: None,
        }
    }

    /// Create a sink whose every send fails with the given message.
    pub fn failing(identity: impl Into<String>, log: SendLog, message: &'static str) -> Self {
        Self {
            identity: identity.into(),
            log,
            fail_with: Some(message),
        }
    }

    /// Fresh shared log for a test fleet.
    pub fn shared_log() -> SendLog {
        Arc::new(Mutex::new(Vec::new()))
    }
}

impl RelaySink for MockSink {
    async fn send(&self, content: &str) -> Result<(), SinkError> {
        if let Some(message) = self.fail_with {
            return Err(SinkError::Delivery(message.to_string()));
        }
        self.log
            .lock()
            .unwrap()
            .push((self.identity.clone(), content.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_sink_records_sends() {
        let log = MockSink::shared_log();
        let sink = MockSink::new("Shaka", log.clone());
        sink.send("hello").await.unwrap();

        let entries = log.lock().unwrap().clone();
        assert_eq!(entries, vec![("Shaka".to_string(), "hello".to_string())]);
    }

    #[tokio::test]
    async fn test_failing_sink_records_nothing() {
        let log = MockSink::shared_log();
        let sink = MockSink::failing("Atlas", log.clone(), "boom");

        let err = sink.send("hello").await.unwrap_err();
        assert!(matches!(err, SinkError::Delivery(_)));
        assert!(log.lock().unwrap().is_empty());
    }
}
