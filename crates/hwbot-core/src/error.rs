use thiserror::Error;

/// Top-level error type for the homework bot.
///
/// The poll loop is the single recovery boundary: it matches on these kinds
/// to pick the notification wording and never lets one escape a cycle.
#[derive(Debug, Error)]
pub enum HomeworkError {
    /// The status request could not complete (transport error or non-200 status).
    #[error("{0}")]
    RequestFailure(String),

    /// The endpoint answered 200 but the body is not valid JSON.
    #[error("{0}")]
    MalformedPayload(String),

    /// The payload or a homework record has missing or wrong-typed keys.
    #[error("{0}")]
    SchemaViolation(String),

    /// A homework record carries a status outside the verdict table.
    #[error("unexpected homework status: {0}")]
    UnknownStatus(String),

    /// A notification could not be delivered to the chat.
    #[error("delivery error: {0}")]
    DeliveryFailure(String),

    /// Configuration error (startup only).
    #[error("config error: {0}")]
    Config(String),
}

impl HomeworkError {
    /// Whether this failure happened while fetching data from the status API.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Self::RequestFailure(_) | Self::MalformedPayload(_))
    }

    /// Human-readable notification text reported to the chat for this failure.
    pub fn notification_text(&self) -> String {
        if self.is_fetch_error() {
            format!("Error fetching API data: {self}")
        } else {
            format!("Program failure: {self}")
        }
    }
}
