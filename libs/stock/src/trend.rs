use std::fmt;

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;

use crate::error::{Result, StockError};
use crate::price_client::PriceRecord;

const PERIOD_DATE_FORMAT: &str = "%d-%m-%Y";
const DAY_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Strictly positive is up; no change counts as down.
    pub fn of(diff: Decimal) -> Self {
        if diff > Decimal::ZERO {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::Up => "Рост",
            Trend::Down => "Падение",
        }
    }
}

/// Which comparison to run over a fetched window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Latest close against the latest close at least this many days older.
    Period(u32),
    /// Open against close of the latest trading day.
    Day,
}

/// Run `policy` over `records` and render the resulting message.
pub fn summarize(symbol: &str, records: Vec<PriceRecord>, policy: Policy) -> Result<String> {
    let message = match policy {
        Policy::Period(days) => compare_period(symbol, records, days)?.to_string(),
        Policy::Day => compare_day(symbol, &records)?.to_string(),
    };
    Ok(message)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodComparison {
    pub symbol: String,
    pub first: PriceRecord,
    pub last: PriceRecord,
    pub dollar_diff: Decimal,
    pub percent_diff: Decimal,
}

impl PeriodComparison {
    pub fn trend(&self) -> Trend {
        Trend::of(self.dollar_diff)
    }
}

impl fmt::Display for PeriodComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Данные по {}:\n\
             Цена закрытия {}: {}$;\n\
             Цена закрытия {}: {}$;\n\
             {}: {}$ ({}%).",
            self.symbol,
            self.first.date.format(PERIOD_DATE_FORMAT),
            money(self.first.close),
            self.last.date.format(PERIOD_DATE_FORMAT),
            money(self.last.close),
            self.trend().label(),
            money(self.dollar_diff),
            money(self.percent_diff),
        )
    }
}

/// Compare the latest close with the most recent close at or before
/// `period_days` earlier.
pub fn compare_period(
    symbol: &str,
    mut records: Vec<PriceRecord>,
    period_days: u32,
) -> Result<PeriodComparison> {
    records.sort_unstable_by(|a, b| b.cmp(a));

    let last = *records.first().ok_or_else(|| StockError::NoRecords {
        symbol: symbol.to_string(),
    })?;
    info!(symbol, date = %last.date, close = %last.close, "last record");

    let target = last
        .date
        .checked_sub_days(Days::new(u64::from(period_days)))
        .unwrap_or(NaiveDate::MIN);

    let first = *records
        .iter()
        .find(|record| record.date <= target)
        .ok_or_else(|| StockError::BaselineNotFound {
            symbol: symbol.to_string(),
            target,
        })?;
    info!(symbol, date = %first.date, close = %first.close, "first record");

    let dollar_diff = checked(symbol, last.date, last.close.checked_sub(first.close))?;
    let percent_diff = checked(
        symbol,
        last.date,
        ratio(symbol, first.date, dollar_diff, first.close)?.checked_mul(Decimal::ONE_HUNDRED),
    )?;

    Ok(PeriodComparison {
        symbol: symbol.to_string(),
        first,
        last,
        dollar_diff,
        percent_diff,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayChange {
    pub symbol: String,
    pub record: PriceRecord,
    pub dollar_diff: Decimal,
    pub percent_diff: Decimal,
}

impl DayChange {
    pub fn trend(&self) -> Trend {
        Trend::of(self.dollar_diff)
    }
}

impl fmt::Display for DayChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Данные по {} за {}:\n\
             Цена открытия: {}$;\n\
             Цена закрытия: {}$;\n\
             Объём торгов: {};\n\
             За день {}: {}$ ({}%).",
            self.symbol,
            self.record.date.format(DAY_DATE_FORMAT),
            money(self.record.open),
            money(self.record.close),
            self.record.volume.normalize(),
            self.trend().label().to_lowercase(),
            money(self.dollar_diff),
            money(self.percent_diff),
        )
    }
}

/// Compare open and close of the most recent trading day.
///
/// The percent figure here is `diff / open - 1`, unscaled, which is not the
/// same quantity [`compare_period`] reports. Deployments already consume
/// both numbers as they are.
pub fn compare_day(symbol: &str, records: &[PriceRecord]) -> Result<DayChange> {
    let record = *records
        .iter()
        .max()
        .ok_or_else(|| StockError::NoRecords {
            symbol: symbol.to_string(),
        })?;
    info!(symbol, date = %record.date, open = %record.open, close = %record.close, "latest record");

    let dollar_diff = checked(symbol, record.date, record.close.checked_sub(record.open))?;
    let percent_diff = checked(
        symbol,
        record.date,
        ratio(symbol, record.date, dollar_diff, record.open)?.checked_sub(Decimal::ONE),
    )?;

    Ok(DayChange {
        symbol: symbol.to_string(),
        record,
        dollar_diff,
        percent_diff,
    })
}

fn checked(symbol: &str, date: NaiveDate, value: Option<Decimal>) -> Result<Decimal> {
    value.ok_or_else(|| StockError::Overflow {
        symbol: symbol.to_string(),
        date,
    })
}

fn ratio(symbol: &str, date: NaiveDate, diff: Decimal, base: Decimal) -> Result<Decimal> {
    if base.is_zero() {
        return Err(StockError::DivisionByZero {
            symbol: symbol.to_string(),
            date,
        });
    }
    checked(symbol, date, diff.checked_div(base))
}

fn money(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
