use anyhow::{Context, Result};
use stock::{
    PriceClient,
    trend::{Policy, summarize},
};
use telegram::TgBot;
use tracing::{debug, info, info_span, instrument};
use tracing_futures::Instrument;

use crate::config::{DigestConfig, StockConfig};

/// Scheduled summaries never ping the chat.
pub const SILENT: bool = true;

const DIGEST_SEPARATOR: &str = "\n\n";

/// Compare every configured symbol over its period and deliver the combined
/// text in one message. Nothing is sent unless every symbol succeeds.
#[instrument(
    name = "run_digest",
    skip(price_client, bot, config),
    fields(chat_id = config.tg_chat_id, symbols = config.stocks.len())
)]
pub async fn run_digest(
    price_client: &PriceClient,
    bot: &TgBot,
    config: &DigestConfig,
) -> Result<()> {
    let message = build_digest(price_client, &config.stocks).await?;

    info!(chat_id = config.tg_chat_id, "sending message");
    bot.send_message(config.tg_chat_id, &message, SILENT)
        .await
        .with_context(|| format!("failed to deliver digest to chat {}", config.tg_chat_id))?;

    info!("done");
    Ok(())
}

pub async fn build_digest(price_client: &PriceClient, stocks: &[StockConfig]) -> Result<String> {
    let mut messages = Vec::with_capacity(stocks.len());

    for stock in stocks {
        let span = info_span!("symbol", symbol = %stock.symbol, period = stock.period);
        let message = symbol_message(price_client, &stock.symbol, Policy::Period(stock.period))
            .instrument(span)
            .await?;
        messages.push(message);
    }

    Ok(messages.join(DIGEST_SEPARATOR))
}

/// Deliver the latest day's open/close change for a single symbol.
#[instrument(name = "run_daily", skip(price_client, bot))]
pub async fn run_daily(
    price_client: &PriceClient,
    bot: &TgBot,
    symbol: &str,
    chat_id: i64,
) -> Result<()> {
    let message = symbol_message(price_client, symbol, Policy::Day).await?;

    info!(chat_id, "sending message");
    bot.send_message(chat_id, &message, SILENT)
        .await
        .with_context(|| format!("failed to deliver {symbol} update to chat {chat_id}"))?;

    info!("done");
    Ok(())
}

async fn symbol_message(
    price_client: &PriceClient,
    symbol: &str,
    policy: Policy,
) -> Result<String> {
    info!("getting stocks");
    let records = price_client
        .fetch_daily(symbol)
        .await
        .with_context(|| format!("failed to fetch prices for {symbol}"))?;
    debug!(records = records.len(), "fetched price records");

    let message = summarize(symbol, records, policy)
        .with_context(|| format!("failed to summarize {symbol} ({policy:?})"))?;
    info!(%message, "rendered message");

    Ok(message)
}
