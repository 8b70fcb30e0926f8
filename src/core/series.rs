//! Historical rate series: day window, collection of per-day attempts and
//! summary statistics.
//!
//! Fetching a series never fails as a whole. Each day is attempted once, in
//! date order, and days whose request failed are dropped from the result.
//! Callers decide what an empty series means.

use chrono::{Days, NaiveDate};
use tracing::{debug, instrument};

use super::error::QuoteResult;
use super::provider::QuoteProvider;
use super::quote::{CurrencyCode, DayCount, Quote};

#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    pub currency: CurrencyCode,
    quotes: Vec<Quote>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl HistoricalSeries {
    /// Builds a series from quotes in any order. The result is sorted by
    /// date and holds at most one quote per date (the first one seen).
    pub fn from_quotes(currency: CurrencyCode, mut quotes: Vec<Quote>) -> Self {
        quotes.sort_by_key(|q| q.as_of);
        quotes.dedup_by_key(|q| q.as_of);
        HistoricalSeries { currency, quotes }
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// `None` for an empty series.
    pub fn summary(&self) -> Option<SeriesSummary> {
        let first = self.quotes.first()?;
        let last = self.quotes.last()?;

        let (min, max, sum) = self.quotes.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), q| (min.min(q.rate), max.max(q.rate), sum + q.rate),
        );
        // Clamp away float noise so min <= mean <= max always holds.
        let mean = (sum / self.quotes.len() as f64).clamp(min, max);

        Some(SeriesSummary {
            first_date: first.as_of,
            last_date: last.as_of,
            mean,
            min,
            max,
            count: self.quotes.len(),
        })
    }
}

/// The calendar days covered by a window of `days` ending yesterday, oldest first.
pub fn window(today: NaiveDate, days: DayCount) -> Vec<NaiveDate> {
    (1..=days.days())
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .collect()
}

/// Folds per-day attempts into a series, discarding failed days.
///
/// The quote is recorded under the date that was requested, whatever date the
/// API echoed back.
pub fn collect_series<I>(currency: CurrencyCode, attempts: I) -> HistoricalSeries
where
    I: IntoIterator<Item = (NaiveDate, QuoteResult<Quote>)>,
{
    let quotes = attempts
        .into_iter()
        .filter_map(|(date, attempt)| match attempt {
            Ok(quote) => Some(Quote {
                as_of: date,
                ..quote
            }),
            Err(e) => {
                debug!(%date, error = %e, "Skipping day without a quote");
                None
            }
        })
        .collect();
    HistoricalSeries::from_quotes(currency, quotes)
}

/// Requests one historical quote per day of the window, strictly one after the
/// other, and collects the successful ones.
///
/// `on_attempt` is called once after each request completes, whatever its outcome.
#[instrument(skip_all, fields(currency = %currency, days = %days))]
pub async fn fetch_series(
    provider: &dyn QuoteProvider,
    currency: &CurrencyCode,
    days: DayCount,
    today: NaiveDate,
    on_attempt: &(dyn Fn() + Send + Sync),
) -> HistoricalSeries {
    let mut attempts = Vec::with_capacity(days.days() as usize);
    for date in window(today, days) {
        let attempt = provider.historical_quote(currency, date).await;
        on_attempt();
        attempts.push((date, attempt));
    }

    let series = collect_series(currency.clone(), attempts);
    debug!(
        fetched = series.len(),
        requested = days.days(),
        "Historical series collected"
    );
    series
}
