use crate::error::HomeworkError;
use async_trait::async_trait;

/// Status source trait — where homework verdicts come from.
///
/// The production implementation talks to the review-status HTTP endpoint;
/// tests substitute scripted responses.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Human-readable source name.
    fn name(&self) -> &str;

    /// Fetch every status change since `from_date` (Unix seconds).
    ///
    /// Makes exactly one attempt. Returns the decoded JSON body; shape
    /// checking is left to the caller.
    async fn fetch_statuses(&self, from_date: i64) -> Result<serde_json::Value, HomeworkError>;
}

/// Notification channel trait — where rendered messages go.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Deliver `text` to the chat identified by `chat_id`.
    async fn notify(&self, chat_id: &str, text: &str) -> Result<(), HomeworkError>;
}
