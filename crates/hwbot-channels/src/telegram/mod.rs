//! Telegram Bot API notifier.
//!
//! Delivers plain-text messages with `sendMessage`.
//! Docs: <https://core.telegram.org/bots/api>

mod send;
pub(crate) mod types;


/// Telegram's hard limit on message text length.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Telegram notifier using the Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramNotifier {
    /// Create a notifier against a custom Bot API server.
    pub fn with_api_base(api_base: &str, bot_token: &str) -> Self {
        let base_url = format!("{}/bot{}", api_base.trim_end_matches('/'), bot_token);
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}
