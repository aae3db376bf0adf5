use std::str::FromStr;

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, StockError};

pub const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";

const SERIES_KEY: &str = "Time Series (Daily)";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Metric names as they appear after the numeric prefix ("1. open" -> "open").
/// The position in this table is the slot used while assembling a record.
const METRICS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// Keys Alpha Vantage uses to explain why a series is missing.
const PROVIDER_NOTICES: [&str; 3] = ["Error Message", "Note", "Information"];

#[derive(Clone)]
pub struct PriceClient {
    client: Client,
    base_api: String,
    api_key: String,
}

impl PriceClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(ALPHA_VANTAGE_URL, api_key)
    }

    pub fn with_base_url(base_api: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_api: base_api.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetch the compact daily window for `symbol`.
    ///
    /// Records come back in whatever order the provider listed them.
    pub async fn fetch_daily(&self, symbol: &str) -> Result<Vec<PriceRecord>> {
        let request_failed = |source: reqwest::Error| StockError::Request {
            endpoint: self.base_api.clone(),
            symbol: symbol.to_string(),
            source: source.without_url(),
        };

        let response = self
            .client
            .get(&self.base_api)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
                ("datatype", "json"),
                ("outputsize", "compact"),
            ])
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        let body = response.text().await.map_err(request_failed)?;

        if !status.is_success() {
            return Err(StockError::Http {
                endpoint: self.base_api.clone(),
                symbol: symbol.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|source| StockError::Decode {
            symbol: symbol.to_string(),
            body: body.clone(),
            source,
        })?;

        let records = parse_daily_series(symbol, &value)?;
        debug!(symbol, records = records.len(), "fetched daily series");

        Ok(records)
    }
}

//
// Match Alpha Vantage TIME_SERIES_DAILY JSON
// https://www.alphavantage.co/documentation/#daily
//
// Ordered by `date` first: it is the leading field of the derived `Ord`.
//
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Turn a `TIME_SERIES_DAILY` body into one record per dated entry.
pub fn parse_daily_series(symbol: &str, body: &Value) -> Result<Vec<PriceRecord>> {
    let series = body
        .get(SERIES_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| StockError::MissingSeries {
            symbol: symbol.to_string(),
            key: SERIES_KEY,
            detail: provider_notice(body),
        })?;

    series
        .iter()
        .map(|(date, metrics)| parse_record(symbol, date, metrics))
        .collect()
}

fn provider_notice(body: &Value) -> String {
    PROVIDER_NOTICES
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map_or_else(|| body.to_string(), str::to_string)
}

fn parse_record(symbol: &str, raw_date: &str, metrics: &Value) -> Result<PriceRecord> {
    let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|source| {
        StockError::InvalidDate {
            symbol: symbol.to_string(),
            value: raw_date.to_string(),
            source,
        }
    })?;

    let mut slots: [Option<Decimal>; METRICS.len()] = [None; METRICS.len()];

    for (key, raw) in metrics.as_object().into_iter().flatten() {
        let name = key.split_once(' ').map_or(key.as_str(), |(_, name)| name);
        let Some(slot) = METRICS.iter().position(|metric| *metric == name) else {
            debug!(symbol, %date, key = %key, "ignoring unknown metric");
            continue;
        };

        let text = match raw {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let value = Decimal::from_str(text.trim()).map_err(|_| StockError::InvalidNumber {
            symbol: symbol.to_string(),
            date,
            metric: METRICS[slot],
            value: text.clone(),
        })?;
        slots[slot] = Some(value);
    }

    let metric = |slot: usize| {
        slots[slot].ok_or_else(|| StockError::MissingMetric {
            symbol: symbol.to_string(),
            date,
            metric: METRICS[slot],
        })
    };

    Ok(PriceRecord {
        date,
        open: metric(0)?,
        high: metric(1)?,
        low: metric(2)?,
        close: metric(3)?,
        volume: metric(4)?,
    })
}
