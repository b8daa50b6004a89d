//! Visit events delivered by the queueing transport.

use serde::{Deserialize, Serialize};

/// Payload of one counting message, as emitted by the redirect path.
///
/// # Wire format
///
/// ```json
/// { "shortCode": "aB3xY9", "timestamp": 1700000000000 }
/// ```
///
/// `timestamp` is informational (milliseconds since the epoch) and never
/// affects the increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitEvent {
    pub short_code: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// One message taken off the transport.
///
/// The body is kept raw so that a malformed payload fails only its own
/// message and not the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitMessage {
    pub message_id: String,
    pub body: String,
    /// Delivery attempt number reported by the transport, starting at 1.
    pub receive_count: u32,
}

impl VisitMessage {
    /// Creates a first-delivery message.
    pub fn new(message_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            body: body.into(),
            receive_count: 1,
        }
    }

    pub fn with_receive_count(mut self, receive_count: u32) -> Self {
        self.receive_count = receive_count;
        self
    }

    /// Decodes the body into a [`VisitEvent`].
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the body is not a JSON
    /// object with a non-empty `shortCode`.
    pub fn parse_event(&self) -> Result<VisitEvent, String> {
        let event: VisitEvent = serde_json::from_str(&self.body)
            .map_err(|e| format!("malformed visit event: {e}"))?;

        if event.short_code.is_empty() {
            return Err("visit event has an empty shortCode".to_string());
        }

        Ok(event)
    }
}
