//! Outbound HTTP with per-attempt timeouts and retry.

use std::time::Duration;

use reqwest::{Client, Url};
use vetnear_core::AppConfig;

use crate::error::FetchError;
use crate::retry::{retry_with_backoff, RetryPolicy};

/// Connection and request settings for one third-party provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Per-attempt timeout covering connect, send, and body download.
    pub timeout: Duration,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

/// Settings for both providers used by the proximity service.
#[derive(Debug, Clone)]
pub struct ProximityConfig {
    pub overpass: ProviderConfig,
    pub nominatim: ProviderConfig,
    pub default_radius_km: f64,
}

impl ProximityConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        let retry = RetryPolicy {
            max_retries: config.max_retries,
            initial_delay_ms: config.retry_initial_delay_ms,
            max_jitter_ms: config.retry_max_jitter_ms,
        };
        Self {
            overpass: ProviderConfig {
                base_url: config.overpass_url.clone(),
                timeout: Duration::from_secs(config.overpass_timeout_secs),
                user_agent: config.user_agent.clone(),
                retry,
            },
            nominatim: ProviderConfig {
                base_url: config.nominatim_url.clone(),
                timeout: Duration::from_secs(config.nominatim_timeout_secs),
                user_agent: config.user_agent.clone(),
                retry,
            },
            default_radius_km: config.default_radius_km,
        }
    }
}

/// GETs JSON from a single provider, retrying transient failures.
#[derive(Debug, Clone)]
pub(crate) struct ResilientFetcher {
    client: Client,
    provider: &'static str,
    base_url: Url,
    retry: RetryPolicy,
}

impl ResilientFetcher {
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidBaseUrl`] if `config.base_url` does not
    /// parse, or [`FetchError::Http`] if the client cannot be built.
    pub(crate) fn new(provider: &'static str, config: &ProviderConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        let base_url =
            Url::parse(config.base_url.trim()).map_err(|e| FetchError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            provider,
            base_url,
            retry: config.retry,
        })
    }

    /// Appends `path` to the base URL and sets the query parameters.
    pub(crate) fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if !path.is_empty() {
            let joined = format!(
                "{}/{}",
                url.path().trim_end_matches('/'),
                path.trim_start_matches('/')
            );
            url.set_path(&joined);
        }
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET with retry and parses the body as JSON.
    ///
    /// `label` identifies the logical request (e.g. the category) in logs.
    ///
    /// # Errors
    ///
    /// - [`FetchError::ProviderUnavailable`] once transient failures exhaust
    ///   the retry budget.
    /// - [`FetchError::UnexpectedStatus`] for a non-retriable status.
    /// - [`FetchError::Http`] for non-timeout transport failures.
    /// - [`FetchError::MalformedResponse`] if the body is not JSON.
    pub(crate) async fn get_json(
        &self,
        url: &Url,
        label: &str,
    ) -> Result<serde_json::Value, FetchError> {
        retry_with_backoff(&self.retry, self.provider, label, || self.attempt(url)).await
    }

    async fn attempt(&self, url: &Url) -> Result<serde_json::Value, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact_query(url),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::malformed(self.provider, e))
    }

    pub(crate) fn provider(&self) -> &'static str {
        self.provider
    }
}

/// Drops the query string so long Overpass programs do not flood logs.
fn redact_query(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}
