//! Message sending and the Notifier trait implementation.

use super::types::TgResponse;
use super::{TelegramNotifier, MAX_MESSAGE_LEN};
use crate::utils::split_message;
use async_trait::async_trait;
use hwbot_core::{error::HomeworkError, traits::Notifier};

impl TelegramNotifier {
    /// Send a text message to a specific chat, splitting oversized text.
    pub(crate) async fn send_text(&self, chat_id: &str, text: &str) -> Result<(), HomeworkError> {
        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let url = format!("{}/sendMessage", self.base_url);
            let body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
            });

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    HomeworkError::DeliveryFailure(format!("telegram send failed: {e}"))
                })?;

            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            let parsed: Option<TgResponse> = serde_json::from_str(&error_text).ok();

            if !status.is_success() {
                let detail = parsed
                    .and_then(|r| r.description)
                    .unwrap_or(error_text);
                return Err(HomeworkError::DeliveryFailure(format!(
                    "telegram send failed ({status}): {detail}"
                )));
            }

            if let Some(TgResponse { ok: false, description }) = parsed {
                return Err(HomeworkError::DeliveryFailure(format!(
                    "telegram rejected message: {}",
                    description.unwrap_or_else(|| "unknown error".to_string())
                )));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn notify(&self, chat_id: &str, text: &str) -> Result<(), HomeworkError> {
        self.send_text(chat_id, text).await
    }
}
