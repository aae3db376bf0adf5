use thiserror::Error;

/// Errors returned by [`TgBot`](crate::TgBot).
///
/// Error messages name the Bot API method, never the request URL, since the
/// URL embeds the bot token.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("{method} request failed")]
    Request {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} returned HTTP {status}: {body}")]
    Http {
        method: &'static str,
        status: u16,
        body: String,
    },

    #[error("{method} returned an unreadable body: {body}")]
    Decode {
        method: &'static str,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body did not carry `"ok": true`, whatever the HTTP status said.
    #[error("{method} was rejected by Telegram: {description}")]
    Rejected {
        method: &'static str,
        description: String,
    },
}

pub type Result<T> = std::result::Result<T, TelegramError>;
