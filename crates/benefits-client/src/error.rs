//! Error type for catalogue requests.

use thiserror::Error;

/// Failures surfaced by [`crate::CatalogueClient`] and
/// [`crate::CatalogueQueries`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The API answered with a non-success status.
    #[error("API responded with status {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error envelope, or the status reason.
        message: String,
    },

    /// The request never produced a response.
    #[error("transport failure: {message}")]
    Transport {
        /// Description of the transport error.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Description of the decode error.
        message: String,
    },

    /// A request URL could not be built.
    #[error("invalid URL: {message}")]
    InvalidUrl {
        /// Description of the URL error.
        message: String,
    },

    /// A benefit was requested with a blank identifier.
    #[error("benefit identifier must not be empty")]
    EmptyId,
}

impl ClientError {
    /// Whether repeating the request could succeed.
    ///
    /// True for transport failures and server-side (5xx) statuses.
    ///
    /// # Example
    ///
    /// ```
    /// use benefits_client::ClientError;
    ///
    /// let err = ClientError::Api { status: 502, message: "Bad Gateway".to_owned() };
    /// assert!(err.is_retryable());
    /// assert!(!ClientError::EmptyId.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Decode { .. } | Self::InvalidUrl { .. } | Self::EmptyId => false,
        }
    }
}
