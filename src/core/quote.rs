//! Quote and currency types

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use std::fmt::Display;
use std::str::FromStr;

/// Every quote is expressed against this currency.
pub const BASE_CURRENCY: &str = "USD";

/// A normalized three letter currency code, e.g. `EUR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which the API reports the rate for this code, e.g. `USDEUR`.
    pub fn quote_key(&self) -> String {
        format!("{BASE_CURRENCY}{}", self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(anyhow!(
                "Invalid currency code: '{}' (expected 3 letters like EUR, JPY, GBP)",
                s.trim()
            ));
        }
        Ok(CurrencyCode(code))
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Currencies offered as conversion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum TargetCurrency {
    Eur,
    Jpy,
    Gbp,
    Cad,
    Aud,
    Cny,
    Rub,
}

impl TargetCurrency {
    pub const ALL: [TargetCurrency; 7] = [
        TargetCurrency::Eur,
        TargetCurrency::Jpy,
        TargetCurrency::Gbp,
        TargetCurrency::Cad,
        TargetCurrency::Aud,
        TargetCurrency::Cny,
        TargetCurrency::Rub,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            TargetCurrency::Eur => "EUR",
            TargetCurrency::Jpy => "JPY",
            TargetCurrency::Gbp => "GBP",
            TargetCurrency::Cad => "CAD",
            TargetCurrency::Aud => "AUD",
            TargetCurrency::Cny => "CNY",
            TargetCurrency::Rub => "RUB",
        }
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode(self.code().to_string())
    }
}

impl Display for TargetCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TargetCurrency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        TargetCurrency::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or_else(|| {
                let choices = TargetCurrency::ALL.map(|t| t.code()).join(", ");
                anyhow!(
                    "Unsupported target currency: {} (choose one of {choices})",
                    s.trim()
                )
            })
    }
}

/// Length of the historical window, in calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default)]
pub enum DayCount {
    #[default]
    Five,
    Ten,
    Twenty,
    Thirty,
}

impl DayCount {
    pub fn days(&self) -> u32 {
        match self {
            DayCount::Five => 5,
            DayCount::Ten => 10,
            DayCount::Twenty => 20,
            DayCount::Thirty => 30,
        }
    }
}

impl Display for DayCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.days())
    }
}

impl FromStr for DayCount {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5" => Ok(DayCount::Five),
            "10" => Ok(DayCount::Ten),
            "20" => Ok(DayCount::Twenty),
            "30" => Ok(DayCount::Thirty),
            other => Err(anyhow!(
                "Invalid time range: {} (choose one of 5, 10, 20, 30)",
                other
            )),
        }
    }
}

/// A single USD to `target` exchange rate observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub target: CurrencyCode,
    pub rate: f64,
    pub as_of: NaiveDate,
}

impl Quote {
    pub fn base(&self) -> &'static str {
        BASE_CURRENCY
    }
}
