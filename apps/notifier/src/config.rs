use std::{fs, path::Path};

use anyhow::{Context, Result, bail, ensure};
use serde::Deserialize;

pub const STOCK_TOKEN_VAR: &str = "STOCK_TOKEN";
pub const STOCK_TOKEN_HELP: &str = "https://www.alphavantage.co/support/#api-key";
pub const TG_TOKEN_VAR: &str = "TG_TOKEN";
pub const TG_TOKEN_HELP: &str = "https://core.telegram.org/bots#6-botfather";

/// API tokens for both upstreams. Holds secrets, so no `Debug`.
#[derive(Clone)]
pub struct Credentials {
    pub stock_token: String,
    pub tg_token: String,
}

impl Credentials {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            stock_token: required(&lookup, STOCK_TOKEN_VAR, STOCK_TOKEN_HELP)?,
            tg_token: required(&lookup, TG_TOKEN_VAR, TG_TOKEN_HELP)?,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str, help: &str) -> Result<String> {
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => bail!("\"{name}\" environment variable is required: {help}"),
    }
}

/// The `digest` configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DigestConfig {
    pub tg_chat_id: i64,
    pub stocks: Vec<StockConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StockConfig {
    pub symbol: String,
    /// Days between the two compared closes.
    pub period: u32,
}

impl DigestConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        ensure!(!config.stocks.is_empty(), "config lists no stocks");
        ensure!(
            config.stocks.iter().all(|stock| !stock.symbol.trim().is_empty()),
            "config contains an empty symbol"
        );
        Ok(config)
    }
}
