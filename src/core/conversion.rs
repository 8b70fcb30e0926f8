//! USD amount conversion

use anyhow::{Result, anyhow};

use super::error::QuoteResult;
use super::provider::QuoteProvider;
use super::quote::{BASE_CURRENCY, Quote, TargetCurrency};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub amount: f64,
    pub target: TargetCurrency,
    pub rate: f64,
    pub converted_amount: f64,
}

impl ConversionResult {
    pub fn new(amount: f64, target: TargetCurrency, rate: f64) -> Self {
        ConversionResult {
            amount,
            target,
            rate,
            converted_amount: amount * rate,
        }
    }

    pub fn source(&self) -> &'static str {
        BASE_CURRENCY
    }
}

/// Parses a user supplied USD amount. Only finite, non-negative values are accepted.
pub fn parse_amount(s: &str) -> Result<f64> {
    let amount: f64 = s
        .trim()
        .parse()
        .map_err(|_| anyhow!("Invalid amount: {}", s.trim()))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(anyhow!("Amount must be a non-negative number, got {}", s.trim()));
    }
    Ok(amount)
}

/// Fetches the live rate for `target` and applies it to `amount`.
pub async fn convert(
    provider: &dyn QuoteProvider,
    amount: f64,
    target: TargetCurrency,
) -> QuoteResult<ConversionResult> {
    let Quote { rate, .. } = provider.live_quote(&target.currency_code()).await?;
    Ok(ConversionResult::new(amount, target, rate))
}
