use vetnear_core::{Category, GeoPoint};

use crate::error::FetchError;
use crate::fetch::{ProviderConfig, ResilientFetcher};
use crate::query::{build_query, OverpassQuery};
use crate::types::{OverpassElement, OverpassResponse};

/// Client for an Overpass API interpreter endpoint.
///
/// The query travels as the `data` GET parameter.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    fetcher: ResilientFetcher,
}

impl OverpassClient {
    /// # Errors
    ///
    /// Returns [`FetchError`] if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: ResilientFetcher::new("overpass", config)?,
        })
    }

    /// Fetches raw elements of `category` within `radius_km` of `center`.
    ///
    /// # Errors
    ///
    /// See [`OverpassClient::run_query`].
    pub async fn find_elements(
        &self,
        center: GeoPoint,
        radius_km: f64,
        category: Category,
    ) -> Result<Vec<OverpassElement>, FetchError> {
        let query = build_query(center, radius_km * 1000.0, category);
        self.run_query(&query, category.slug()).await
    }

    /// Runs a prepared query. An empty query returns no elements without
    /// contacting the provider.
    ///
    /// # Errors
    ///
    /// - [`FetchError::ProviderUnavailable`] after the retry budget is spent.
    /// - [`FetchError::UnexpectedStatus`] / [`FetchError::Http`] for
    ///   non-retriable failures.
    /// - [`FetchError::MalformedResponse`] if the body lacks an `elements` array.
    pub async fn run_query(
        &self,
        query: &OverpassQuery,
        label: &str,
    ) -> Result<Vec<OverpassElement>, FetchError> {
        if query.is_empty() {
            tracing::debug!(category = label, "empty overpass query, skipping request");
            return Ok(Vec::new());
        }
        tracing::debug!(category = label, query = %query, "running overpass query");

        let url = self.fetcher.build_url("", &[("data", query.as_str())]);
        let body = self.fetcher.get_json(&url, label).await?;
        let response: OverpassResponse = serde_json::from_value(body)
            .map_err(|e| FetchError::malformed(self.fetcher.provider(), e))?;

        tracing::debug!(
            category = label,
            elements = response.elements.len(),
            "overpass query returned"
        );
        Ok(response.elements)
    }
}
