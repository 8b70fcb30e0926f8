use super::{chart, ui};
use crate::core::series::{self, HistoricalSeries, SeriesSummary};
use crate::core::{CurrencyCode, DayCount, QuoteProvider};
use chrono::NaiveDate;
use comfy_table::Cell;

pub const NO_DATA_MESSAGE: &str = "No historical data available. Check API key or try again.";

/// Fetches one quote per day of the window ending yesterday and prints the
/// chart and summary, or the no-data message when every day failed.
pub async fn run(
    provider: &dyn QuoteProvider,
    currency: &CurrencyCode,
    days: DayCount,
    today: NaiveDate,
) {
    let series = fetch_with_progress(provider, currency, days, today).await;
    println!("{}", render(&series, days));
}

/// Fetches the series while a progress bar counts the attempted days.
pub async fn fetch_with_progress(
    provider: &dyn QuoteProvider,
    currency: &CurrencyCode,
    days: DayCount,
    today: NaiveDate,
) -> HistoricalSeries {
    let pb = ui::new_progress_bar(u64::from(days.days()), "Loading historical data...");
    let tick = || pb.inc(1);
    let series = series::fetch_series(provider, currency, days, today, &tick).await;
    pb.finish_and_clear();
    series
}

pub fn chart_title(currency: &CurrencyCode, days: DayCount) -> String {
    format!("USD to {currency} Exchange Rate ({days} Days)")
}

pub fn render(series: &HistoricalSeries, days: DayCount) -> String {
    let Some(summary) = series.summary() else {
        return ui::style_text(NO_DATA_MESSAGE, ui::StyleType::Error);
    };

    let title = ui::style_text(&chart_title(&series.currency, days), ui::StyleType::Title);
    let mut output = chart::render_line_chart(series, &title);
    output.push_str("\n\n");
    output.push_str(&render_summary(&summary));
    output.push_str("\n\n");
    output.push_str(&render_table(series));
    output
}

fn render_summary(summary: &SeriesSummary) -> String {
    [
        ui::style_text("Data Summary:", ui::StyleType::Title),
        format!(
            "Period: {} to {}",
            summary.first_date.format("%Y-%m-%d"),
            summary.last_date.format("%Y-%m-%d")
        ),
        format!("Average rate: {:.4}", summary.mean),
        format!("Minimum rate: {:.4}", summary.min),
        format!("Maximum rate: {:.4}", summary.max),
    ]
    .join("\n")
}

fn render_table(series: &HistoricalSeries) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("USD/{}", series.currency)),
    ]);
    for quote in series.quotes() {
        table.add_row(vec![
            Cell::new(quote.as_of.format("%Y-%m-%d")),
            ui::rate_cell(quote.rate),
        ]);
    }
    table.to_string()
}
