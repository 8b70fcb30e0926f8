//! Quote source abstraction

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::QuoteResult;
use super::quote::{CurrencyCode, Quote};

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Current USD to `currency` rate.
    async fn live_quote(&self, currency: &CurrencyCode) -> QuoteResult<Quote>;

    /// USD to `currency` rate as of `date`.
    async fn historical_quote(&self, currency: &CurrencyCode, date: NaiveDate)
    -> QuoteResult<Quote>;
}
