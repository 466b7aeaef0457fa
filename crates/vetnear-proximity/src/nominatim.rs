use vetnear_core::GeoPoint;

use crate::error::FetchError;
use crate::fetch::{ProviderConfig, ResilientFetcher};
use crate::types::{NominatimAddress, NominatimReverse, UserLocationContext};

/// Zoom level asking Nominatim for building-level detail.
const REVERSE_ZOOM: &str = "18";

/// Client for a Nominatim instance's `/reverse` endpoint.
///
/// The public instance requires an identifying `User-Agent`; it comes from
/// [`ProviderConfig::user_agent`].
#[derive(Debug, Clone)]
pub struct NominatimClient {
    fetcher: ResilientFetcher,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`FetchError`] if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: ResilientFetcher::new("nominatim", config)?,
        })
    }

    /// Resolves `point` into a human-readable location context.
    ///
    /// # Errors
    ///
    /// - [`FetchError::ProviderUnavailable`] after the retry budget is spent.
    /// - [`FetchError::UnexpectedStatus`] / [`FetchError::Http`] for
    ///   non-retriable failures.
    /// - [`FetchError::MalformedResponse`] if the body is not an address
    ///   document or carries an `error` field.
    pub async fn reverse(&self, point: GeoPoint) -> Result<UserLocationContext, FetchError> {
        let lat = point.latitude().to_string();
        let lon = point.longitude().to_string();
        let url = self.fetcher.build_url(
            "reverse",
            &[
                ("format", "json"),
                ("lat", &lat),
                ("lon", &lon),
                ("zoom", REVERSE_ZOOM),
                ("addressdetails", "1"),
            ],
        );

        let body = self.fetcher.get_json(&url, "reverse_geocode").await?;
        let reverse: NominatimReverse = serde_json::from_value(body)
            .map_err(|e| FetchError::malformed(self.fetcher.provider(), e))?;

        if let Some(error) = reverse.error {
            return Err(FetchError::malformed(self.fetcher.provider(), error));
        }
        if reverse.address.is_none() && reverse.display_name.is_none() {
            return Err(FetchError::malformed(
                self.fetcher.provider(),
                "response has neither address nor display_name",
            ));
        }

        Ok(location_context(reverse))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn location_context(reverse: NominatimReverse) -> UserLocationContext {
    let address = reverse.address.unwrap_or_default();
    let NominatimAddress {
        city,
        town,
        village,
        suburb,
        state_district,
        county,
        state,
        postcode,
        country,
        country_code,
    } = address;

    UserLocationContext {
        city: non_blank(city)
            .or_else(|| non_blank(town))
            .or_else(|| non_blank(village))
            .or_else(|| non_blank(suburb)),
        district: non_blank(state_district).or_else(|| non_blank(county)),
        state: non_blank(state),
        postcode: non_blank(postcode),
        country: non_blank(country),
        country_code: non_blank(country_code).map(|c| c.to_uppercase()),
        display_address: non_blank(reverse.display_name),
    }
}
