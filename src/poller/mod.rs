//! The poll loop: fetch → validate → render → dedupe → notify, then sleep.
//!
//! Every failure inside a cycle is reported to the chat (best effort),
//! logged, and followed by the regular sleep. Only process termination
//! stops the loop.

#[cfg(test)]
mod tests;

use hwbot_core::{
    dedup::{DedupPolicy, NotificationDeduper},
    error::HomeworkError,
    render::render,
    traits::{Notifier, StatusSource},
    validate::validate_response,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Result of a single poll cycle.
#[derive(Debug, Default)]
pub struct CycleOutcome {
    /// Status notifications delivered this cycle.
    pub delivered: usize,
    /// Messages skipped because they were already sent.
    pub suppressed: usize,
    /// The failure that ended the cycle early, if any.
    pub error: Option<HomeworkError>,
}

/// Owns the watermark and dedup set for one bot instance.
pub struct PollLoop {
    source: Arc<dyn StatusSource>,
    notifier: Arc<dyn Notifier>,
    chat_id: String,
    retry_period: Duration,
    watermark: i64,
    deduper: NotificationDeduper,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn StatusSource>,
        notifier: Arc<dyn Notifier>,
        chat_id: String,
        retry_period: Duration,
        policy: DedupPolicy,
        start_timestamp: i64,
    ) -> Self {
        Self {
            source,
            notifier,
            chat_id,
            retry_period,
            watermark: start_timestamp,
            deduper: NotificationDeduper::new(policy),
        }
    }

    /// Lower bound of the next poll window (Unix seconds).
    pub fn watermark(&self) -> i64 {
        self.watermark
    }

    /// Distinct status messages sent (or attempted) since startup.
    pub fn sent_messages(&self) -> usize {
        self.deduper.sent_count()
    }

    /// Run forever: one cycle, then sleep for the retry period.
    pub async fn run(mut self) {
        info!(
            "poll loop started: source={}, notifier={}, period={}s, dedup={:?}",
            self.source.name(),
            self.notifier.name(),
            self.retry_period.as_secs(),
            self.deduper.policy()
        );

        loop {
            let outcome = self.run_cycle().await;
            debug!(
                "cycle done: delivered={}, suppressed={}, failed={}, watermark={}, sent_total={}",
                outcome.delivered,
                outcome.suppressed,
                outcome.error.is_some(),
                self.watermark(),
                self.sent_messages()
            );
            tokio::time::sleep(self.retry_period).await;
        }
    }

    /// Execute exactly one poll cycle. Never fails; errors land in the outcome.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let mut outcome = CycleOutcome::default();

        if let Err(e) = self.poll_once(&mut outcome).await {
            let text = e.notification_text();
            error!("{text}");
            self.deliver(&text).await;
            outcome.error = Some(e);
        }

        outcome
    }

    async fn poll_once(&mut self, outcome: &mut CycleOutcome) -> Result<(), HomeworkError> {
        let raw = self.source.fetch_statuses(self.watermark).await?;
        let response = validate_response(&raw)?;

        if response.homeworks.is_empty() {
            debug!("no new statuses");
        }

        for record in &response.homeworks {
            let message = render(record)?;
            if !self.deduper.should_send(&message) {
                debug!("message already sent: \"{message}\"");
                outcome.suppressed += 1;
                continue;
            }
            if self.deliver(&message).await {
                outcome.delivered += 1;
            }
            self.deduper.mark_sent(&message);
        }

        self.watermark = response.current_date;
        Ok(())
    }

    /// Attempt delivery; failures are logged and never escalated.
    async fn deliver(&self, text: &str) -> bool {
        match self.notifier.notify(&self.chat_id, text).await {
            Ok(()) => {
                debug!("bot sent message: \"{text}\"");
                true
            }
            Err(e) => {
                error!("failed to send message via {}: {e}", self.notifier.name());
                false
            }
        }
    }
}
