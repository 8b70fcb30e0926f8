//! Plain-text line chart of a rate series.
//!
//! Observations are drawn as `●` markers on a fixed-height grid, joined by
//! interpolated `·` dots. The y axis carries the max, middle and min rates and
//! the x axis carries `%m-%d` dates wherever they fit without overlapping.

use crate::core::HistoricalSeries;

pub const CHART_HEIGHT: usize = 10;
const MAX_PLOT_WIDTH: usize = 60;
const MIN_STEP: usize = 2;
const MAX_STEP: usize = 8;
const DATE_LABEL_WIDTH: usize = 5;

const MARKER: char = '●';
const LINE: char = '·';

/// Renders `series` under `title`. An empty series renders the title only.
pub fn render_line_chart(series: &HistoricalSeries, title: &str) -> String {
    let quotes = series.quotes();
    let mut lines = vec![title.to_string()];
    if quotes.is_empty() {
        return lines.join("\n");
    }

    let n = quotes.len();
    let step = if n == 1 {
        0
    } else {
        (MAX_PLOT_WIDTH / (n - 1)).clamp(MIN_STEP, MAX_STEP)
    };
    let width = (n - 1) * step + 1;

    let (min, max) = quotes.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), q| {
        (lo.min(q.rate), hi.max(q.rate))
    });
    let span = max - min;
    let row_for = |value: f64| -> usize {
        if span <= f64::EPSILON {
            CHART_HEIGHT / 2
        } else {
            (((max - value) / span) * (CHART_HEIGHT - 1) as f64).round() as usize
        }
    };

    let mut grid = vec![vec![' '; width]; CHART_HEIGHT];
    for (i, pair) in quotes.windows(2).enumerate() {
        let x0 = i * step;
        for offset in 1..step {
            let t = offset as f64 / step as f64;
            let value = pair[0].rate + (pair[1].rate - pair[0].rate) * t;
            grid[row_for(value)][x0 + offset] = LINE;
        }
    }
    for (i, quote) in quotes.iter().enumerate() {
        grid[row_for(quote.rate)][i * step] = MARKER;
    }

    let y_labels = y_axis_labels(min, max, span, &row_for);
    let label_width = y_labels
        .iter()
        .map(|(_, label)| label.len())
        .max()
        .unwrap_or(0);

    for (row, cells) in grid.iter().enumerate() {
        let plotted: String = cells.iter().collect();
        let line = match y_labels.iter().find(|(r, _)| *r == row) {
            Some((_, label)) => format!("{label:>label_width$} ┤{plotted}"),
            None => format!("{:>label_width$} │{plotted}", ""),
        };
        lines.push(line.trim_end().to_string());
    }
    lines.push(format!("{:>label_width$} └{}", "", "─".repeat(width)));
    lines.push(format!(
        "{:>label_width$}  {}",
        "",
        x_axis_labels(series, step, width)
    ));

    lines.join("\n")
}

fn y_axis_labels(
    min: f64,
    max: f64,
    span: f64,
    row_for: &dyn Fn(f64) -> usize,
) -> Vec<(usize, String)> {
    if span <= f64::EPSILON {
        return vec![(row_for(min), format!("{min:.4}"))];
    }
    let mid = min + span / 2.0;
    let mut labels = vec![
        (row_for(max), format!("{max:.4}")),
        (row_for(mid), format!("{mid:.4}")),
        (row_for(min), format!("{min:.4}")),
    ];
    labels.dedup_by_key(|(row, _)| *row);
    labels
}

fn x_axis_labels(series: &HistoricalSeries, step: usize, width: usize) -> String {
    let mut axis = vec![' '; width + DATE_LABEL_WIDTH];
    let mut next_free = 0;
    for (i, quote) in series.quotes().iter().enumerate() {
        let start = (i * step).saturating_sub(DATE_LABEL_WIDTH / 2);
        if start < next_free {
            continue;
        }
        let label = quote.as_of.format("%m-%d").to_string();
        for (offset, ch) in label.chars().enumerate() {
            axis[start + offset] = ch;
        }
        next_free = start + DATE_LABEL_WIDTH + 1;
    }
    axis.into_iter().collect::<String>().trim_end().to_string()
}
