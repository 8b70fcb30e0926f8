//! Menu driven terminal session.
//!
//! The session keeps the last inputs the user entered and offers them as the
//! defaults for the next action, so repeated lookups only need `Enter`.

use super::{convert, history, rate, ui};
use crate::core::conversion::{self, parse_amount};
use crate::core::{CurrencyCode, DayCount, QuoteProvider, TargetCurrency};
use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Rate,
    Convert,
    History,
    Quit,
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "rate" => Ok(Action::Rate),
            "2" | "convert" => Ok(Action::Convert),
            "3" | "history" | "chart" => Ok(Action::History),
            "q" | "quit" | "exit" => Ok(Action::Quit),
            other => Err(anyhow!("Unknown action: {}", other)),
        }
    }
}

/// Inputs carried from one action to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInputs {
    pub currency: CurrencyCode,
    pub days: DayCount,
    pub amount: f64,
    pub target: TargetCurrency,
}

impl Default for SessionInputs {
    fn default() -> Self {
        SessionInputs {
            currency: TargetCurrency::Eur.currency_code(),
            days: DayCount::Five,
            amount: 100.0,
            target: TargetCurrency::Eur,
        }
    }
}

pub struct Session<R, W> {
    input: R,
    output: W,
    pub inputs: SessionInputs,
}

const MENU: &str = "  [1] Get current rate   [2] Convert amount   [3] Historical chart   [q] Quit";

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Session {
            input,
            output,
            inputs: SessionInputs::default(),
        }
    }

    /// Runs actions until the user quits or input ends. `today` is asked again
    /// for every history action, so a session left open past midnight moves its
    /// window forward.
    pub async fn run(
        &mut self,
        provider: &dyn QuoteProvider,
        today: &(dyn Fn() -> NaiveDate + Send + Sync),
    ) -> Result<()> {
        writeln!(
            self.output,
            "{}\n{}\n",
            ui::style_text("World Currency Exchange", ui::StyleType::Title),
            ui::style_text(
                "Real-time currency conversion and historical exchange rate analysis",
                ui::StyleType::Subtle
            )
        )?;

        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(line) = self.read_line("Action")? else {
                break;
            };
            let action = match line.parse::<Action>() {
                Ok(action) => action,
                Err(e) => {
                    let message = ui::style_text(&e.to_string(), ui::StyleType::Error);
                    writeln!(self.output, "{message}")?;
                    continue;
                }
            };
            debug!(?action, "Interactive action selected");

            let completed = match action {
                Action::Quit => break,
                Action::Rate => self.rate(provider).await?,
                Action::Convert => self.convert(provider).await?,
                Action::History => self.history(provider, today()).await?,
            };
            if !completed {
                break;
            }
            writeln!(
                self.output,
                "\n{}\n",
                ui::style_text("Data from CurrencyLayer", ui::StyleType::Subtle)
            )?;
        }
        Ok(())
    }

    async fn rate(&mut self, provider: &dyn QuoteProvider) -> Result<bool> {
        let default = self.inputs.currency.clone();
        let Some(currency) = self.prompt::<CurrencyCode>("Currency Code", &default)? else {
            return Ok(false);
        };
        self.inputs.currency = currency.clone();

        let outcome = provider.live_quote(&currency).await;
        writeln!(self.output, "{}", rate::render(&currency, &outcome))?;
        Ok(true)
    }

    async fn convert(&mut self, provider: &dyn QuoteProvider) -> Result<bool> {
        let default_amount = format!("{:.2}", self.inputs.amount);
        let Some(amount) = self.prompt_with("USD Amount", &default_amount, parse_amount)? else {
            return Ok(false);
        };
        let default_target = self.inputs.target;
        let Some(target) = self.prompt::<TargetCurrency>("Convert to", &default_target)? else {
            return Ok(false);
        };
        self.inputs.amount = amount;
        self.inputs.target = target;

        let outcome = conversion::convert(provider, amount, target).await;
        writeln!(self.output, "{}", convert::render(&outcome))?;
        Ok(true)
    }

    async fn history(&mut self, provider: &dyn QuoteProvider, today: NaiveDate) -> Result<bool> {
        let default_currency = self.inputs.currency.clone();
        let Some(currency) = self.prompt::<CurrencyCode>("Currency Code", &default_currency)? else {
            return Ok(false);
        };
        let default_days = self.inputs.days;
        let Some(days) = self.prompt::<DayCount>("Time Range (5/10/20/30 days)", &default_days)?
        else {
            return Ok(false);
        };
        self.inputs.currency = currency.clone();
        self.inputs.days = days;

        let series = history::fetch_with_progress(provider, &currency, days, today).await;
        writeln!(self.output, "{}", history::render(&series, days))?;
        Ok(true)
    }

    fn prompt<T>(&mut self, label: &str, default: &dyn Display) -> Result<Option<T>>
    where
        T: FromStr<Err = anyhow::Error>,
    {
        self.prompt_with(label, &default.to_string(), |s| s.parse::<T>())
    }

    /// Asks until `parse` accepts the answer. An empty answer takes `default`;
    /// `None` means input ended.
    fn prompt_with<T>(
        &mut self,
        label: &str,
        default: &str,
        parse: impl Fn(&str) -> Result<T>,
    ) -> Result<Option<T>> {
        loop {
            let Some(answer) = self.read_line(&format!("{label} [{default}]"))? else {
                return Ok(None);
            };
            let answer = if answer.is_empty() {
                default
            } else {
                answer.as_str()
            };
            match parse(answer) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(
                    self.output,
                    "{}",
                    ui::style_text(&e.to_string(), ui::StyleType::Error)
                )?,
            }
        }
    }

    fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Runs an interactive session on the process's stdin and stdout.
pub async fn run(provider: &dyn QuoteProvider) -> Result<()> {
    let stdin = std::io::stdin();
    let mut session = Session::new(stdin.lock(), std::io::stdout());
    session.run(provider, &|| Local::now().date_naive()).await
}
