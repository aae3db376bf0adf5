mod bot_client;
mod error;

pub use bot_client::{Chat, Message, TELEGRAM_API_URL, TgBot, Update, User};
pub use error::{Result, TelegramError};
