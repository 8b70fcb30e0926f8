use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::error::{QuoteError, QuoteResult};
use crate::core::provider::QuoteProvider;
use crate::core::quote::{BASE_CURRENCY, CurrencyCode, Quote};

// CurrencyLayerProvider implementation for QuoteProvider
pub struct CurrencyLayerProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl CurrencyLayerProvider {
    pub fn new(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().user_agent("xrate/1.0").build()?;
        Ok(CurrencyLayerProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn endpoint(&self, name: &str, params: &[(&str, &str)]) -> QuoteResult<Url> {
        let mut query = vec![("access_key", self.api_key.as_str())];
        query.extend_from_slice(params);
        query.push(("source", BASE_CURRENCY));
        Url::parse_with_params(&format!("{}/{}", self.base_url, name), &query)
            .map_err(|e| QuoteError::Transport(format!("Invalid endpoint URL: {e}")))
    }

    /// Sends the request and unwraps the quote for `currency` from the body.
    async fn fetch(&self, url: Url, currency: &CurrencyCode) -> QuoteResult<QuoteBody> {
        debug!("Requesting quote from {}", redact_key(&url));

        let response = self.client.get(url).send().await.map_err(|e| {
            QuoteError::Transport(format!("Request error: {e} for currency: {currency}"))
        })?;
        let status = response.status();
        let text = response.text().await?;

        let data: QuoteResponse = serde_json::from_str(&text).map_err(|e| {
            QuoteError::Transport(format!(
                "Failed to parse JSON response for {currency} (HTTP {status}): {e}"
            ))
        })?;
        debug!(success = data.success, "Received quote response");

        // Anything short of an explicit `success: true` is the API refusing the request.
        if !data.success {
            return Err(data.api_error());
        }

        let key = currency.quote_key();
        let rate = data
            .quotes
            .as_ref()
            .and_then(|quotes| quotes.get(&key))
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
            .ok_or_else(|| QuoteError::Transport(format!("No rate found for quote: {key}")))?;

        Ok(QuoteBody {
            rate,
            timestamp: data.timestamp,
            date: data.date,
        })
    }
}

struct QuoteBody {
    rate: f64,
    timestamp: Option<i64>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    success: bool,
    quotes: Option<HashMap<String, f64>>,
    timestamp: Option<i64>,
    date: Option<String>,
    error: Option<Value>,
    message: Option<String>,
}

impl QuoteResponse {
    /// The error object is free-form, so only read what is there.
    fn api_error(&self) -> QuoteError {
        let field = |name: &str| self.error.as_ref().and_then(|e| e.get(name));
        let code = field("code").and_then(Value::as_i64);
        let info = field("info")
            .and_then(Value::as_str)
            .or(self.message.as_deref())
            .unwrap_or_default()
            .to_string();
        QuoteError::Api { code, info }
    }
}

fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "access_key" {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[async_trait]
impl QuoteProvider for CurrencyLayerProvider {
    #[instrument(name = "LiveQuoteFetch", skip_all, fields(currency = %currency))]
    async fn live_quote(&self, currency: &CurrencyCode) -> QuoteResult<Quote> {
        let url = self.endpoint("live", &[("currencies", currency.as_str())])?;
        let body = self.fetch(url, currency).await?;

        let as_of = body
            .timestamp
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.date_naive())
            .unwrap_or_else(|| Local::now().date_naive());

        Ok(Quote {
            target: currency.clone(),
            rate: body.rate,
            as_of,
        })
    }

    #[instrument(
        name = "HistoricalQuoteFetch",
        skip_all,
        fields(currency = %currency, date = %date)
    )]
    async fn historical_quote(
        &self,
        currency: &CurrencyCode,
        date: NaiveDate,
    ) -> QuoteResult<Quote> {
        let date_param = date.format("%Y-%m-%d").to_string();
        let url = self.endpoint(
            "historical",
            &[("date", date_param.as_str()), ("currencies", currency.as_str())],
        )?;
        let body = self.fetch(url, currency).await?;

        if let Some(echoed) = body.date.as_deref().filter(|d| *d != date_param) {
            debug!(requested = %date_param, echoed, "API returned a different date");
        }

        Ok(Quote {
            target: currency.clone(),
            rate: body.rate,
            as_of: date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn eur() -> CurrencyCode {
        "EUR".parse().unwrap()
    }

    pub async fn create_mock_server(endpoint: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/{endpoint}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_live_quote() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "success": true,
            "timestamp": 1709251200,
            "source": "USD",
            "quotes": { "USDEUR": 0.92315 }
        }"#;

        Mock::given(method("GET"))
            .and(path("/live"))
            .and(query_param("access_key", "secret"))
            .and(query_param("currencies", "EUR"))
            .and(query_param("source", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = CurrencyLayerProvider::new(&mock_server.uri(), "secret").unwrap();
        let quote = provider.live_quote(&eur()).await.expect("Failed to get quote");
        assert_eq!(quote.rate, 0.92315);
        assert_eq!(quote.target, eur());
        assert_eq!(quote.base(), "USD");
        assert_eq!(quote.as_of, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[tokio::test]
    async fn test_successful_historical_quote() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "success": true,
            "historical": true,
            "date": "2024-02-27",
            "source": "USD",
            "quotes": { "USDJPY": 150.512 }
        }"#;

        Mock::given(method("GET"))
            .and(path("/historical"))
            .and(query_param("date", "2024-02-27"))
            .and(query_param("currencies", "JPY"))
            .and(query_param("source", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = CurrencyLayerProvider::new(&mock_server.uri(), "secret").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let quote = provider
            .historical_quote(&"JPY".parse().unwrap(), date)
            .await
            .unwrap();
        assert_eq!(quote.rate, 150.512);
        assert_eq!(quote.as_of, date);
    }

    #[tokio::test]
    async fn test_api_reported_failure() {
        let mock_response = r#"{
            "success": false,
            "error": { "code": 101, "info": "You have not supplied a valid API Access Key." }
        }"#;
        let mock_server = create_mock_server("live", 200, mock_response).await;

        let provider = CurrencyLayerProvider::new(&mock_server.uri(), "bad").unwrap();
        let result = provider.live_quote(&eur()).await;
        assert_eq!(
            result,
            Err(QuoteError::Api {
                code: Some(101),
                info: "You have not supplied a valid API Access Key.".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_api_failure_without_error_body() {
        let mock_server = create_mock_server("live", 200, r#"{"success": false}"#).await;
        let provider = CurrencyLayerProvider::new(&mock_server.uri(), "k").unwrap();
        let err = provider.live_quote(&eur()).await.unwrap_err();
        assert!(err.is_api());
    }

    #[tokio::test]
    async fn test_body_without_success_flag_is_api_failure() {
        let mock_response = r#"{"message": "Invalid authentication credentials"}"#;
        let mock_server = create_mock_server("live", 401, mock_response).await;
        let provider = CurrencyLayerProvider::new(&mock_server.uri(), "bad").unwrap();

        let err = provider.live_quote(&eur()).await.unwrap_err();
        assert_eq!(
            err,
            QuoteError::Api {
                code: None,
                info: "Invalid authentication credentials".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_failure_with_null_quotes_is_api_failure() {
        let mock_response = r#"{
            "success": false,
            "quotes": null,
            "error": {
                "code": 202,
                "info": "You have provided one or more invalid Currency Codes."
            }
        }"#;
        let mock_server = create_mock_server("historical", 200, mock_response).await;
        let provider = CurrencyLayerProvider::new(&mock_server.uri(), "k").unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let err = provider.historical_quote(&eur(), date).await.unwrap_err();
        assert!(err.is_api());
        assert_eq!(
            err,
            QuoteError::Api {
                code: Some(202),
                info: "You have provided one or more invalid Currency Codes.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_success_with_null_quotes_is_transport_failure() {
        let mock_response = r#"{"success": true, "quotes": null}"#;
        let mock_server = create_mock_server("live", 200, mock_response).await;
        let provider = CurrencyLayerProvider::new(&mock_server.uri(), "k").unwrap();

        let err = provider.live_quote(&eur()).await.unwrap_err();
        assert_eq!(
            err,
            QuoteError::Transport("No rate found for quote: USDEUR".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_quote_key_is_transport_failure() {
        let mock_response = r#"{"success": true, "quotes": {"USDGBP": 0.79}}"#;
        let mock_server = create_mock_server("live", 200, mock_response).await;
        let provider = CurrencyLayerProvider::new(&mock_server.uri(), "k").unwrap();

        let err = provider.live_quote(&eur()).await.unwrap_err();
        assert_eq!(
            err,
            QuoteError::Transport("No rate found for quote: USDEUR".to_string())
        );
    }

    #[tokio::test]
    async fn test_non_positive_rate_is_rejected() {
        let mock_response = r#"{"success": true, "quotes": {"USDEUR": 0.0}}"#;
        let mock_server = create_mock_server("live", 200, mock_response).await;
        let provider = CurrencyLayerProvider::new(&mock_server.uri(), "k").unwrap();
        assert!(!provider.live_quote(&eur()).await.unwrap_err().is_api());
    }

    #[tokio::test]
    async fn test_malformed_response_is_transport_failure() {
        let mock_server = create_mock_server("live", 502, "<html>Bad Gateway</html>").await;
        let provider = CurrencyLayerProvider::new(&mock_server.uri(), "k").unwrap();

        let err = provider.live_quote(&eur()).await.unwrap_err();
        assert!(!err.is_api());
        assert!(
            err.to_string()
                .contains("Failed to parse JSON response for EUR (HTTP 502 Bad Gateway)")
        );
    }

    /// An address nothing listens on: bind an ephemeral port, then release it.
    fn refused_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let provider = CurrencyLayerProvider::new(&refused_url(), "k").unwrap();
        let err = provider.live_quote(&eur()).await.unwrap_err();
        assert!(matches!(err, QuoteError::Transport(_)));
        assert!(err.to_string().contains("Request error"));
    }

    #[test]
    fn test_redact_key_hides_access_key() {
        let provider = CurrencyLayerProvider::new("http://localhost:1/", "topsecret").unwrap();
        let url = provider.endpoint("live", &[("currencies", "EUR")]).unwrap();
        assert_eq!(url.path(), "/live");
        let redacted = redact_key(&url);
        assert!(!redacted.contains("topsecret"));
        assert!(redacted.contains("access_key=***") || redacted.contains("access_key=%2A%2A%2A"));
        assert!(redacted.contains("currencies=EUR"));
        assert!(redacted.contains("source=USD"));
    }
}
