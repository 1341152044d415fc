use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::CatalogEntry;
use crate::errors::CliError;

pub const MODELS_PATH: &str = "/v1/models";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const MAX_BODY_CHARS: usize = 200;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("{0}")]
    Transport(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Invalid JSON response")]
    InvalidJson,
    #[error("Response JSON missing data array")]
    MissingData,
}

/// Source of the model catalog.
pub trait CatalogSource {
    async fn fetch(&self, base_url: &str, api_key: &str) -> Result<Vec<CatalogEntry>, CatalogError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(timeout_ms: u64) -> Result<Self, CliError> {
        let timeout = Duration::from_millis(timeout_ms.max(1));
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl CatalogSource for ApiClient {
    async fn fetch(&self, base_url: &str, api_key: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        let url = join_url(base_url, MODELS_PATH);
        let started = Instant::now();
        tracing::debug!(%url, "fetching model catalog");

        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    CatalogError::Transport("Request timed out.".to_string())
                } else {
                    CatalogError::Transport(format!("Request failed: {err}"))
                }
            })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| CatalogError::Transport(format!("Request failed: {err}")))?;
        let text = String::from_utf8_lossy(&bytes);
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog response"
        );

        if status != StatusCode::OK {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: body_excerpt(&text),
            });
        }

        parse_catalog(&text)
    }
}

/// Trimmed response body for an error line, capped at 200 characters.
pub fn body_excerpt(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "No response body".to_string();
    }
    if body.chars().count() > MAX_BODY_CHARS {
        let head: String = body.chars().take(MAX_BODY_CHARS).collect();
        return format!("{head}...");
    }
    body.to_string()
}

/// Reads the `data` array of a models listing. Entries without a string
/// `id` and `owned_by` are skipped.
pub fn parse_catalog(text: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let payload: Value = serde_json::from_str(text).map_err(|_| CatalogError::InvalidJson)?;
    let data = payload
        .get("data")
        .and_then(|v| v.as_array())
        .ok_or(CatalogError::MissingData)?;

    let entries = data
        .iter()
        .filter_map(|item| {
            let id = item.get("id").and_then(|v| v.as_str())?;
            let owner = item.get("owned_by").and_then(|v| v.as_str())?;
            Some(CatalogEntry::new(owner, id))
        })
        .collect();
    Ok(entries)
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(join_url("http://h:1/", "/v1/models"), "http://h:1/v1/models");
        assert_eq!(join_url("http://h:1", "v1/models"), "http://h:1/v1/models");
    }

    #[test]
    fn body_excerpt_truncates_long_bodies() {
        assert_eq!(body_excerpt("  \n "), "No response body");
        assert_eq!(body_excerpt(" server error \n"), "server error");
        let long = "x".repeat(250);
        let excerpt = body_excerpt(&long);
        assert_eq!(excerpt.len(), 203);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn parse_drops_malformed_entries() {
        let text = r#"{"data":[
            {"id":"m1","owned_by":"acme"},
            {"id":"m2"},
            {"id":3,"owned_by":"acme"},
            "junk",
            {"id":"m4","owned_by":"zeta","extra":true}
        ]}"#;
        let entries = parse_catalog(text).unwrap();
        assert_eq!(
            entries,
            vec![CatalogEntry::new("acme", "m1"), CatalogEntry::new("zeta", "m4")]
        );
    }

    #[test]
    fn parse_rejects_bad_payloads() {
        assert_eq!(parse_catalog("<html>"), Err(CatalogError::InvalidJson));
        assert_eq!(parse_catalog(r#"{"data":{}}"#), Err(CatalogError::MissingData));
        assert_eq!(
            CatalogError::MissingData.to_string(),
            "Response JSON missing data array"
        );
    }

    #[tokio::test]
    async fn fetch_sends_bearer_and_reads_models() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/models")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_body(r#"{"data":[{"id":"claude-x","owned_by":"anthropic"}]}"#)
            .create_async()
            .await;

        let client = ApiClient::new(DEFAULT_TIMEOUT_MS).unwrap();
        let entries = client.fetch(&format!("{}/", server.url()), "sk-test").await.unwrap();
        assert_eq!(entries, vec![CatalogEntry::new("anthropic", "claude-x")]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_reports_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/models")
            .with_status(500)
            .with_body("server error")
            .create_async()
            .await;

        let client = ApiClient::new(DEFAULT_TIMEOUT_MS).unwrap();
        let err = client.fetch(&server.url(), "k").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: server error");
    }

    #[tokio::test]
    async fn fetch_reports_transport_failure() {
        let client = ApiClient::new(2_000).unwrap();
        let err = client.fetch("http://127.0.0.1:9", "k").await.unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)), "{err:?}");
    }
}
