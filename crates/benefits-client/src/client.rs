//! HTTP client for the benefits REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::ClientError;
use crate::model::Benefit;

const COLLECTION_PATH: &str = "api/beneficios";

/// Read operations over the benefits catalogue.
///
/// Implemented by [`CatalogueClient`]; [`crate::CatalogueQueries`] accepts any
/// implementation so caching can be exercised without a server.
#[async_trait]
pub trait CatalogueSource: Send + Sync {
    /// Fetch every benefit.
    async fn list_benefits(&self) -> Result<Vec<Benefit>, ClientError>;

    /// Fetch one benefit by identifier.
    async fn get_benefit(&self, id: &str) -> Result<Benefit, ClientError>;
}

/// Error envelope produced by the backend for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: String,
}

/// Reqwest-backed [`CatalogueSource`].
#[derive(Debug, Clone)]
pub struct CatalogueClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogueClient {
    /// Build a client for the API served at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] when `base_url` does not parse, and
    /// [`ClientError::Transport`] when the HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use benefits_client::CatalogueClient;
    ///
    /// let client = CatalogueClient::new("http://localhost:3000", Duration::from_secs(5))
    ///     .expect("valid client");
    /// assert_eq!(client.base_url().as_str(), "http://localhost:3000/");
    /// ```
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut parsed = Url::parse(base_url).map_err(|err| ClientError::InvalidUrl {
            message: format!("{base_url}: {err}"),
        })?;
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Transport {
                message: err.to_string(),
            })?;
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// Base URL every request path is joined onto.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::InvalidUrl {
                message: format!("{path}: {err}"),
            })?;
        debug!(url = %url, "catalogue request");

        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| {
                warn!(url = %url, error = %err, "catalogue request failed");
                ClientError::Transport {
                    message: err.to_string(),
                }
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ClientError::Transport {
                message: err.to_string(),
            })?;
        debug!(url = %url, status = status.as_u16(), "catalogue response");

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&body).map_or_else(
                |_| status.canonical_reason().unwrap_or("unknown status").to_owned(),
                |envelope| envelope.message,
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|err| ClientError::Decode {
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl CatalogueSource for CatalogueClient {
    async fn list_benefits(&self) -> Result<Vec<Benefit>, ClientError> {
        self.get_json(COLLECTION_PATH).await
    }

    async fn get_benefit(&self, id: &str) -> Result<Benefit, ClientError> {
        if id.trim().is_empty() {
            return Err(ClientError::EmptyId);
        }
        let path = format!("{COLLECTION_PATH}/{}", urlencoding::encode(id));
        self.get_json(&path).await
    }
}
