//! Reqwest-backed upstream gateway.
//!
//! This adapter owns transport details only: URL construction, the request
//! deadline, failure classification, and JSON decoding. It never inspects
//! the decoded payload.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::ports::{UpstreamGateway, UpstreamGatewayError};

const USER_AGENT: &str = concat!("benefits-backend/", env!("CARGO_PKG_VERSION"));

/// Upstream gateway performing HTTP GET requests below one base URL.
pub struct HttpUpstreamGateway {
    client: Client,
    base_url: Url,
}

impl HttpUpstreamGateway {
    /// Build a gateway whose every request is bounded by `timeout`.
    ///
    /// A missing trailing slash is added to the base path so relative paths
    /// extend it rather than replace its last segment.
    ///
    /// ```rust,ignore
    /// let gateway = HttpUpstreamGateway::new(base_url, Duration::from_secs(10))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    fn resolve(&self, path: &str) -> Result<Url, UpstreamGatewayError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| {
                UpstreamGatewayError::unexpected(format!("cannot build URL for `{path}`: {error}"))
            })
    }

    async fn get_json(&self, url: &Url) -> Result<Value, UpstreamGatewayError> {
        debug!(method = "GET", %url, "upstream request");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        debug!(status = status.as_u16(), %url, "upstream response");
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(map_status_error(status, body.as_ref()));
        }

        let body = response.bytes().await.map_err(map_body_error)?;
        serde_json::from_slice(body.as_ref()).map_err(|error| {
            UpstreamGatewayError::unexpected(format!("invalid JSON payload: {error}"))
        })
    }
}

#[async_trait]
impl UpstreamGateway for HttpUpstreamGateway {
    async fn fetch(&self, path: &str) -> Result<Value, UpstreamGatewayError> {
        let result = match self.resolve(path) {
            Ok(url) => self.get_json(&url).await,
            Err(error) => Err(error),
        };
        if let Err(error) = &result {
            warn!(
                failure = error.failure_class(),
                path,
                %error,
                "upstream request failed"
            );
        }
        result
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn map_transport_error(error: reqwest::Error) -> UpstreamGatewayError {
    if error.is_timeout() {
        UpstreamGatewayError::timeout(error.to_string())
    } else if error.is_connect() || error.is_request() {
        UpstreamGatewayError::no_response(error.to_string())
    } else {
        UpstreamGatewayError::unexpected(error.to_string())
    }
}

fn map_body_error(error: reqwest::Error) -> UpstreamGatewayError {
    if error.is_timeout() {
        UpstreamGatewayError::timeout(error.to_string())
    } else {
        UpstreamGatewayError::unexpected(format!("unreadable response body: {error}"))
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> UpstreamGatewayError {
    let reason = status.canonical_reason().unwrap_or("unknown status");
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        reason.to_owned()
    } else {
        format!("{reason}: {preview}")
    };
    UpstreamGatewayError::status(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for request building and failure classification.

    use super::*;
    use httpmock::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    fn gateway_for(base_url: &str, timeout: Duration) -> HttpUpstreamGateway {
        let base_url = Url::parse(base_url).expect("valid base url");
        HttpUpstreamGateway::new(base_url, timeout).expect("client builds")
    }

    #[rstest]
    #[case::bare_host("http://upstream.test", "http://upstream.test/beneficios")]
    #[case::nested_without_slash("http://upstream.test/api", "http://upstream.test/api/beneficios")]
    #[case::nested_with_slash("http://upstream.test/api/", "http://upstream.test/api/beneficios")]
    fn resolves_paths_below_the_base(#[case] base: &str, #[case] expected: &str) {
        let gateway = gateway_for(base, Duration::from_secs(1));
        let url = gateway.resolve("/beneficios").expect("path joins");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case::not_found(StatusCode::NOT_FOUND, true)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, false)]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY, false)]
    #[case::bad_request(StatusCode::BAD_REQUEST, false)]
    fn maps_statuses_to_status_errors(#[case] status: StatusCode, #[case] not_found: bool) {
        let error = map_status_error(status, b"{\"error\": \"nope\"}");
        assert!(
            matches!(error, UpstreamGatewayError::Status { status: code, .. } if code == status.as_u16()),
            "non-2xx statuses should map to Status",
        );
        assert_eq!(error.is_not_found(), not_found);
    }

    #[test]
    fn status_error_message_includes_reason_and_preview() {
        let error = map_status_error(StatusCode::SERVICE_UNAVAILABLE, b"  down \n for   maintenance ");
        assert_eq!(
            error.to_string(),
            "upstream status 503: Service Unavailable: down for maintenance"
        );
    }

    #[test]
    fn body_preview_is_truncated() {
        let body = "x".repeat(200);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[tokio::test]
    async fn fetch_decodes_json_bodies() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/beneficios")
                    .header("accept", "application/json");
                then.status(200)
                    .json_body(json!([{ "id": 1, "comercio": "WALMART" }]));
            })
            .await;

        let gateway = gateway_for(&server.base_url(), Duration::from_secs(2));
        let body = gateway.fetch("beneficios").await.expect("fetch succeeds");

        mock.assert_async().await;
        assert_eq!(body, json!([{ "id": 1, "comercio": "WALMART" }]));
    }

    #[tokio::test]
    async fn fetch_reports_404_as_not_found_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/beneficios/999");
                then.status(404).body("not here");
            })
            .await;

        let gateway = gateway_for(&server.base_url(), Duration::from_secs(2));
        let error = gateway
            .fetch("beneficios/999")
            .await
            .expect_err("404 fails");

        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "upstream status 404: Not Found: not here");
    }

    #[tokio::test]
    async fn fetch_classifies_slow_upstream_as_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/beneficios/1");
                then.status(200)
                    .delay(Duration::from_secs(2))
                    .json_body(json!({ "id": 1 }));
            })
            .await;

        let gateway = gateway_for(&server.base_url(), Duration::from_millis(200));
        let error = gateway.fetch("beneficios/1").await.expect_err("times out");

        assert!(matches!(error, UpstreamGatewayError::Timeout { .. }));
    }

    #[tokio::test]
    async fn fetch_classifies_invalid_json_as_unexpected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/beneficios");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let gateway = gateway_for(&server.base_url(), Duration::from_secs(2));
        let error = gateway.fetch("beneficios").await.expect_err("not JSON");

        assert!(matches!(error, UpstreamGatewayError::Unexpected { .. }));
    }

    #[tokio::test]
    async fn fetch_classifies_refused_connection_as_no_response() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let gateway = gateway_for(&format!("http://{addr}"), Duration::from_secs(2));
        let error = gateway.fetch("beneficios").await.expect_err("refused");

        assert!(matches!(error, UpstreamGatewayError::NoResponse { .. }));
    }
}
