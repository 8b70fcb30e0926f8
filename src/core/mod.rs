//! Core business logic: quote types, the provider abstraction and the three
//! user operations built on it.

pub mod config;
pub mod conversion;
pub mod error;
pub mod log;
pub mod provider;
pub mod quote;
pub mod series;

// Re-export main types for cleaner imports
pub use conversion::ConversionResult;
pub use error::{QuoteError, QuoteResult};
pub use provider::QuoteProvider;
pub use quote::{CurrencyCode, DayCount, Quote, TargetCurrency};
pub use series::{HistoricalSeries, SeriesSummary};
