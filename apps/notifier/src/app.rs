use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use stock::{ALPHA_VANTAGE_URL, PriceClient};
use telegram::{TELEGRAM_API_URL, TgBot};
use tracing::info;

use crate::{
    bot_info,
    config::{Credentials, DigestConfig},
    pipeline,
};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare each configured symbol over its period and send one combined message
    Digest {
        /// JSON file with `tg_chat_id` and a list of `{symbol, period}`
        config_path: PathBuf,
    },
    /// Send the latest day's open/close change for one symbol
    Daily {
        symbol: String,
        #[arg(allow_negative_numbers = true)]
        chat_id: i64,
    },
    /// Show the bot behind TG_TOKEN
    Me,
    /// Show a chat the bot can post to
    Chat {
        #[arg(allow_negative_numbers = true)]
        chat_id: i64,
    },
    /// List chats found in pending updates
    Updates,
}

/// Where the two upstream APIs live.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub stock_api: String,
    pub telegram_api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            stock_api: ALPHA_VANTAGE_URL.to_string(),
            telegram_api: TELEGRAM_API_URL.to_string(),
        }
    }
}

/// Execute one command. Credentials come from `lookup` and are checked
/// before any config is read or any client is built.
pub async fn run(
    command: Command,
    lookup: impl Fn(&str) -> Option<String>,
    endpoints: &Endpoints,
) -> Result<()> {
    let credentials = Credentials::from_lookup(lookup)?;
    let price_client = PriceClient::with_base_url(&endpoints.stock_api, credentials.stock_token);
    let bot = TgBot::with_base_url(&endpoints.telegram_api, credentials.tg_token);

    match command {
        Command::Digest { config_path } => {
            let config = DigestConfig::load(&config_path)?;
            info!(
                path = %config_path.display(),
                symbols = config.stocks.len(),
                "loaded config"
            );
            pipeline::run_digest(&price_client, &bot, &config).await
        }
        Command::Daily { symbol, chat_id } => {
            pipeline::run_daily(&price_client, &bot, symbol.trim(), chat_id).await
        }
        Command::Me => bot_info::whoami(&bot).await.map(drop),
        Command::Chat { chat_id } => bot_info::describe_chat(&bot, chat_id).await.map(drop),
        Command::Updates => bot_info::recent_chats(&bot).await.map(drop),
    }
}
