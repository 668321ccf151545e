use crate::error::HomeworkError;
use tracing::error;

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Secrets required before the poll loop may start.
///
/// Never deserialized from the config file; only the environment supplies them.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl Credentials {
    /// Build credentials, rejecting any value that is absent or blank.
    ///
    /// The error names every missing variable, not just the first.
    pub fn new(
        practicum_token: Option<String>,
        telegram_token: Option<String>,
        telegram_chat_id: Option<String>,
    ) -> Result<Self, HomeworkError> {
        let missing: Vec<&str> = [
            (PRACTICUM_TOKEN_VAR, &practicum_token),
            (TELEGRAM_TOKEN_VAR, &telegram_token),
            (TELEGRAM_CHAT_ID_VAR, &telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, v)| v.as_deref().map_or(true, |s| s.trim().is_empty()))
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            let msg = format!(
                "missing required environment variables: {}",
                missing.join(", ")
            );
            error!("{msg}");
            return Err(HomeworkError::Config(msg));
        }

        Ok(Self {
            practicum_token: practicum_token.unwrap_or_default(),
            telegram_token: telegram_token.unwrap_or_default(),
            telegram_chat_id: telegram_chat_id.unwrap_or_default(),
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &redact(&self.practicum_token))
            .field("telegram_token", &redact(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

/// Mask a secret for display, keeping only its last four characters.
pub fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
