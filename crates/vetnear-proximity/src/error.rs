use thiserror::Error;

/// Errors returned when talking to a geodata or reverse-geocoding provider.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or TLS failure from the underlying HTTP client, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The provider answered 2xx but the body was not the expected shape.
    #[error("malformed response from {context}: {reason}")]
    MalformedResponse { context: String, reason: String },

    /// Retries were exhausted; `source` is the error from the final attempt.
    #[error("{provider} unavailable after {attempts} attempts: {source}")]
    ProviderUnavailable {
        provider: &'static str,
        attempts: u32,
        #[source]
        source: Box<FetchError>,
    },

    /// The configured provider URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl FetchError {
    pub(crate) fn malformed(context: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::MalformedResponse {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}
