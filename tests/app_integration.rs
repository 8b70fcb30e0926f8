use std::fs;
use tracing::info;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xrate::AppCommand;

mod test_utils {
    use std::fs;

    /// Writes a config pointing the provider at `base_url` and returns the temp file.
    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
api_key: "test-key"
provider:
  base_url: {base_url}
"#
        );
        fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }

    /// A local address with nothing listening on it.
    pub fn refused_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to read local address");
        drop(listener);
        format!("http://{addr}")
    }
}

#[test_log::test(tokio::test)]
async fn test_rate_flow_with_mock() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live"))
        .and(query_param("currencies", "GBP"))
        .and(query_param("source", "USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"success": true, "timestamp": 1709251200, "quotes": {"USDGBP": 0.7912}}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config_file = test_utils::write_config(&mock_server.uri());
    let result = xrate::run_command(
        AppCommand::Rate {
            currency: "gbp".parse().unwrap(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Rate command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_convert_flow_survives_api_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"success": false, "error": {"code": 104, "info": "Monthly usage limit reached."}}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config_file = test_utils::write_config(&mock_server.uri());
    let result = xrate::run_command(
        AppCommand::Convert {
            amount: 250.0,
            target: xrate::core::TargetCurrency::Cad,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    // The failure is reported to the user, not returned as an error
    assert!(result.is_ok(), "Convert command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_history_flow_issues_one_request_per_day() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/historical"))
        .and(query_param("currencies", "EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"success": true, "historical": true, "quotes": {"USDEUR": 1.0805}}"#,
        ))
        .expect(10)
        .mount(&mock_server)
        .await;

    let config_file = test_utils::write_config(&mock_server.uri());
    let result = xrate::run_command(
        AppCommand::History {
            currency: "EUR".parse().unwrap(),
            days: "10".parse().unwrap(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "History command failed with: {:?}", result.err());

    let requests = mock_server.received_requests().await.unwrap_or_default();
    let dates: Vec<String> = requests
        .iter()
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "date")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    info!(?dates, "Historical dates requested");
    assert_eq!(dates.len(), 10);
    let mut sorted = dates.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(dates, sorted, "days must be requested oldest first, once each");
}

#[test_log::test(tokio::test)]
async fn test_history_flow_with_unreachable_server() {
    let config_file = test_utils::write_config(&test_utils::refused_url());
    let result = xrate::run_command(
        AppCommand::History {
            currency: "JPY".parse().unwrap(),
            days: "5".parse().unwrap(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "History command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("missing.yaml");

    let result = xrate::run_command(
        AppCommand::Rate {
            currency: "EUR".parse().unwrap(),
        },
        Some(missing.to_str().unwrap()),
    )
    .await;
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file")
    );
}

#[test_log::test(tokio::test)]
async fn test_invalid_config_is_an_error() {
    let config_file = tempfile::NamedTempFile::new().unwrap();
    fs::write(config_file.path(), "api_key: [unclosed").unwrap();

    let result = xrate::run_command(
        AppCommand::Interactive,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file")
    );
}
