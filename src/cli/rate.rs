use super::ui;
use crate::core::{CurrencyCode, Quote, QuoteProvider, QuoteResult};

pub const API_FAILURE_MESSAGE: &str = "Failed to get current rate. Check API key.";
pub const NETWORK_FAILURE_MESSAGE: &str = "Network error. Please try again.";

/// Fetches the live USD rate for `currency` and prints the outcome.
pub async fn run(provider: &dyn QuoteProvider, currency: &CurrencyCode) {
    let outcome = provider.live_quote(currency).await;
    println!("{}", render(currency, &outcome));
}

pub fn render(currency: &CurrencyCode, outcome: &QuoteResult<Quote>) -> String {
    match outcome {
        Ok(quote) => ui::style_text(
            &format!("Current USD to {currency} rate: {:.4}", quote.rate),
            ui::StyleType::Success,
        ),
        Err(e) => {
            tracing::debug!(error = %e, "Live quote failed");
            let message = if e.is_api() {
                API_FAILURE_MESSAGE
            } else {
                NETWORK_FAILURE_MESSAGE
            };
            ui::style_text(message, ui::StyleType::Error)
        }
    }
}
