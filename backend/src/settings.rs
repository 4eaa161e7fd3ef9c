//! Process configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags and `BENEFITS_*` environment variables. The raw
//! [`BenefitsSettings`] keeps every key optional so OrthoConfig can merge
//! layers; [`BenefitsSettings::resolve`] validates them into
//! [`ResolvedSettings`] before the server starts.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3001";

/// Configuration values for the benefits backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BENEFITS")]
pub struct BenefitsSettings {
    /// Base URL of the upstream catalogue API.
    pub upstream_base_url: Option<String>,
    /// Deadline in milliseconds for every outbound request.
    pub upstream_timeout_ms: Option<u64>,
    /// Host the HTTP listener binds to.
    pub bind_host: Option<String>,
    /// Port the HTTP listener binds to.
    pub port: Option<u16>,
    /// Single origin allowed by CORS.
    pub cors_origin: Option<String>,
}

/// Reasons the configuration cannot start a server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// `upstream_base_url` was not supplied.
    #[error("BENEFITS_UPSTREAM_BASE_URL is required")]
    MissingUpstreamUrl,
    /// `upstream_base_url` is not an absolute http(s) URL.
    #[error("invalid upstream base URL `{value}`: {reason}")]
    InvalidUpstreamUrl {
        /// Offending value.
        value: String,
        /// Parser or scheme complaint.
        reason: String,
    },
    /// `upstream_timeout_ms` was zero.
    #[error("upstream timeout must be greater than zero")]
    ZeroTimeout,
    /// `bind_host` is not an IP address.
    #[error("invalid bind host `{0}`")]
    InvalidBindHost(String),
    /// `cors_origin` is blank or the `*` wildcard, which cannot carry credentials.
    #[error("CORS origin must name a single origin, got `{0}`")]
    InvalidCorsOrigin(String),
}

/// Validated settings ready for server construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    /// Upstream catalogue base URL.
    pub upstream_base_url: Url,
    /// Outbound request deadline.
    pub upstream_timeout: Duration,
    /// Socket address for the HTTP listener.
    pub bind_addr: SocketAddr,
    /// Allowed CORS origin.
    pub cors_origin: String,
}

impl BenefitsSettings {
    /// Return the configured timeout, falling back to ten seconds.
    pub fn upstream_timeout_ms(&self) -> u64 {
        self.upstream_timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    /// Return the configured bind host, falling back to all interfaces.
    pub fn bind_host(&self) -> &str {
        self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST)
    }

    /// Return the configured port, falling back to 3000.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Return the configured CORS origin, falling back to the local frontend.
    pub fn cors_origin(&self) -> &str {
        self.cors_origin.as_deref().unwrap_or(DEFAULT_CORS_ORIGIN)
    }

    /// Validate the raw values.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when the upstream URL is missing or not
    /// http(s), the timeout is zero, the bind host is not an IP address, or
    /// the CORS origin is a wildcard.
    pub fn resolve(&self) -> Result<ResolvedSettings, SettingsError> {
        let raw_url = self
            .upstream_base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(SettingsError::MissingUpstreamUrl)?;
        let upstream_base_url = parse_upstream_url(raw_url)?;

        let upstream_timeout = match self.upstream_timeout_ms() {
            0 => return Err(SettingsError::ZeroTimeout),
            millis => Duration::from_millis(millis),
        };

        let host: IpAddr = self
            .bind_host()
            .parse()
            .map_err(|_| SettingsError::InvalidBindHost(self.bind_host().to_owned()))?;

        let cors_origin = self.cors_origin().trim();
        if cors_origin.is_empty() || cors_origin == "*" {
            return Err(SettingsError::InvalidCorsOrigin(cors_origin.to_owned()));
        }

        Ok(ResolvedSettings {
            upstream_base_url,
            upstream_timeout,
            bind_addr: SocketAddr::new(host, self.port()),
            cors_origin: cors_origin.to_owned(),
        })
    }
}

fn parse_upstream_url(raw: &str) -> Result<Url, SettingsError> {
    let invalid = |reason: String| SettingsError::InvalidUpstreamUrl {
        value: raw.to_owned(),
        reason,
    };
    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}
