mod error;
mod price_client;

pub mod trend;

pub use error::{Result, StockError};
pub use price_client::{ALPHA_VANTAGE_URL, PriceClient, PriceRecord, parse_daily_series};
pub use trend::{Policy, Trend};
