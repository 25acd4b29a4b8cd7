//! Read transports for the summary endpoint
//!
//! The dashboard fetches pre-aggregated totals with a single GET. Two
//! strategies exist behind the [`ReadTransport`] seam:
//!
//! - direct: `GET {url}?mode=summary`, body is plain JSON. This is what any
//!   collector with permissive cross-origin headers should serve.
//! - callback: `GET {url}?mode=summary&callback={name}`, body is the JSON
//!   wrapped in `{name}(...)` padding. This is the script-injection
//!   workaround kept for collectors that cannot set CORS headers; the
//!   padding is stripped before parsing.
//!
//! Both strategies hand the same `serde_json::Value` to the same
//! normalization step. Neither enforces a timeout of its own beyond the
//! HTTP client's, and an issued read cannot be cancelled.

use std::future::Future;
use std::time::Duration;

use crate::config::{CollectorConfig, TransportMode};
use crate::error::{Error, Result};

/// Read-side strategy for fetching the raw summary payload
pub trait ReadTransport {
    /// Fetch the summary response as parsed JSON
    fn fetch_summary(&self) -> impl Future<Output = Result<serde_json::Value>> + Send;
}

/// HTTP client for the collector's summary endpoint
pub struct SummaryClient {
    http_client: reqwest::Client,
    url: String,
    mode: TransportMode,
    callback_name: String,
}

impl SummaryClient {
    /// Create a summary client from configuration
    ///
    /// Returns an error if the configuration is invalid or missing the URL.
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        config.validate()?;

        let url = config
            .url
            .clone()
            .ok_or_else(|| Error::Config("collector.url is required".to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url,
            mode: config.transport,
            callback_name: config.callback_name.clone(),
        })
    }

    /// The URL one summary request hits
    fn request_url(&self) -> String {
        match self.mode {
            TransportMode::Direct => format!("{}?mode=summary", self.url),
            TransportMode::Callback => format!(
                "{}?mode=summary&callback={}",
                self.url,
                urlencoding::encode(&self.callback_name)
            ),
        }
    }

    async fn fetch_body(&self) -> Result<String> {
        let response = self
            .http_client
            .get(self.request_url())
            .send()
            .await
            .map_err(|e| Error::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "summary endpoint returned {}",
                status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response body: {}", e)))
    }
}

impl ReadTransport for SummaryClient {
    fn fetch_summary(&self) -> impl Future<Output = Result<serde_json::Value>> + Send {
        async move {
            let body = self.fetch_body().await?;

            let json = match self.mode {
                TransportMode::Direct => body.as_str().trim(),
                TransportMode::Callback => strip_callback_padding(&body, &self.callback_name)?,
            };

            serde_json::from_str(json)
                .map_err(|e| Error::Collector(format!("summary response is not valid JSON: {}", e)))
        }
    }
}

/// Strip `name(...)` padding from a callback-mode response body
///
/// Accepts an optional trailing semicolon, which some collectors append.
fn strip_callback_padding<'a>(body: &'a str, callback_name: &str) -> Result<&'a str> {
    let trimmed = body.trim();

    let inner = trimmed
        .strip_prefix(callback_name)
        .and_then(|rest| rest.trim_start().strip_prefix('('))
        .and_then(|rest| {
            rest.trim_end()
                .trim_end_matches(';')
                .trim_end()
                .strip_suffix(')')
        })
        .ok_or_else(|| {
            Error::Collector(format!(
                "response body is not wrapped in {}(...) padding",
                callback_name
            ))
        })?;

    Ok(inner.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateConvention;
    use crate::summary::SummarySnapshot;

    fn client(mode: TransportMode) -> SummaryClient {
        let config = CollectorConfig {
            url: Some("https://collector.example.com/exec".to_string()),
            transport: mode,
            ..Default::default()
        };
        SummaryClient::new(&config).unwrap()
    }

    #[test]
    fn test_client_requires_url() {
        let config = CollectorConfig::default();
        assert!(SummaryClient::new(&config).is_err());
    }

    #[test]
    fn test_direct_request_url() {
        assert_eq!(
            client(TransportMode::Direct).request_url(),
            "https://collector.example.com/exec?mode=summary"
        );
    }

    #[test]
    fn test_callback_request_url() {
        assert_eq!(
            client(TransportMode::Callback).request_url(),
            "https://collector.example.com/exec?mode=summary&callback=onSummary"
        );
    }

    #[test]
    fn test_strip_callback_padding() {
        let body = r#"onSummary({"status":"ok"})"#;
        assert_eq!(
            strip_callback_padding(body, "onSummary").unwrap(),
            r#"{"status":"ok"}"#
        );
    }

    #[test]
    fn test_strip_callback_padding_trailing_semicolon() {
        let body = "onSummary({\"status\":\"ok\"});\n";
        assert_eq!(
            strip_callback_padding(body, "onSummary").unwrap(),
            r#"{"status":"ok"}"#
        );
    }

    #[test]
    fn test_strip_callback_padding_wrong_name() {
        let body = r#"otherCallback({"status":"ok"})"#;
        assert!(strip_callback_padding(body, "onSummary").is_err());
    }

    #[test]
    fn test_strip_callback_padding_bare_json() {
        assert!(strip_callback_padding(r#"{"status":"ok"}"#, "onSummary").is_err());
    }

    #[test]
    fn test_padded_body_normalizes_like_direct() {
        // Both transports must deliver the same logical result
        let padded = r#"onSummary({"status":"ok","totals":{"learners":5}})"#;
        let json = strip_callback_padding(padded, "onSummary").unwrap();
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        let snapshot = SummarySnapshot::from_value(&value, RateConvention::Percent).unwrap();
        assert_eq!(snapshot.totals.learners, 5);
    }
}
