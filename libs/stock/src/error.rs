use chrono::NaiveDate;
use thiserror::Error;

/// Failures raised while fetching or summarizing daily prices.
///
/// Every variant is fatal to the run: nothing here is retried.
#[derive(Debug, Error)]
pub enum StockError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("request to {endpoint} failed for {symbol}")]
    Request {
        endpoint: String,
        symbol: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status.
    #[error("{endpoint} returned HTTP {status} for {symbol}: {body}")]
    Http {
        endpoint: String,
        symbol: String,
        status: u16,
        body: String,
    },

    #[error("response for {symbol} is not valid JSON: {body}")]
    Decode {
        symbol: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body parsed but has no daily series in it. `detail` carries the
    /// provider's own explanation when it sent one.
    #[error("missing \"{key}\" in response for {symbol}: {detail}")]
    MissingSeries {
        symbol: String,
        key: &'static str,
        detail: String,
    },

    #[error("invalid date {value:?} for {symbol}")]
    InvalidDate {
        symbol: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid {metric} value {value:?} for {symbol} on {date}")]
    InvalidNumber {
        symbol: String,
        date: NaiveDate,
        metric: &'static str,
        value: String,
    },

    #[error("missing {metric} for {symbol} on {date}")]
    MissingMetric {
        symbol: String,
        date: NaiveDate,
        metric: &'static str,
    },

    #[error("no price records for {symbol}")]
    NoRecords { symbol: String },

    /// The fetched window is shorter than the requested period.
    #[error("no record for {symbol} at or before {target} (not found)")]
    BaselineNotFound { symbol: String, target: NaiveDate },

    #[error("division by zero computing percent difference for {symbol} on {date}")]
    DivisionByZero { symbol: String, date: NaiveDate },

    /// A difference or percentage does not fit in a `Decimal`.
    #[error("arithmetic overflow computing difference for {symbol} on {date}")]
    Overflow { symbol: String, date: NaiveDate },
}

pub type Result<T> = std::result::Result<T, StockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::BaselineNotFound {
            symbol: "GSH".to_string(),
            target: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "no record for GSH at or before 2020-01-01 (not found)"
        );

        let err = StockError::Http {
            endpoint: "https://example.test/query".to_string(),
            symbol: "MSFT".to_string(),
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "https://example.test/query returned HTTP 503 for MSFT: busy"
        );
    }
}
