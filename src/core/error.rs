//! Failure kinds for a single quote request.

use thiserror::Error;

/// Why a quote request produced no rate.
///
/// Callers only ever distinguish the two variants; the details carried here
/// are for logging and never shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// The endpoint answered but reported `success: false`
    /// (bad key, unknown currency, quota exceeded, ...).
    #[error("API reported failure (code {code:?}): {info}")]
    Api { code: Option<i64>, info: String },

    /// The request did not complete or the body could not be understood.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl QuoteError {
    pub fn is_api(&self) -> bool {
        matches!(self, QuoteError::Api { .. })
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        QuoteError::Transport(err.to_string())
    }
}

pub type QuoteResult<T> = Result<T, QuoteError>;
