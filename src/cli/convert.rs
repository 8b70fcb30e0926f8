use super::ui;
use crate::core::conversion::{self, ConversionResult};
use crate::core::{QuoteProvider, QuoteResult, TargetCurrency};

pub const API_FAILURE_MESSAGE: &str = "Conversion failed. Check API key.";
pub const NETWORK_FAILURE_MESSAGE: &str = "Network error. Please try again.";

/// Converts `amount` USD into `target` at the live rate and prints the outcome.
pub async fn run(provider: &dyn QuoteProvider, amount: f64, target: TargetCurrency) {
    let outcome = conversion::convert(provider, amount, target).await;
    println!("{}", render(&outcome));
}

pub fn render(outcome: &QuoteResult<ConversionResult>) -> String {
    match outcome {
        Ok(result) => {
            let target = result.target;
            let headline = format!(
                "${:.2} {} = {:.2} {target}",
                result.amount,
                result.source(),
                result.converted_amount
            );
            let rate_line = format!(
                "Exchange rate: 1 {} = {:.4} {target}",
                result.source(),
                result.rate
            );
            format!(
                "{}\n{}",
                ui::style_text(&headline, ui::StyleType::Success),
                ui::style_text(&rate_line, ui::StyleType::Info)
            )
        }
        Err(e) => {
            tracing::debug!(error = %e, "Conversion failed");
            let message = if e.is_api() {
                API_FAILURE_MESSAGE
            } else {
                NETWORK_FAILURE_MESSAGE
            };
            ui::style_text(message, ui::StyleType::Error)
        }
    }
}
