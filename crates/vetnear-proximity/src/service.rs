//! Proximity search orchestration.
//!
//! [`ProximityService::search`] fans out three independent provider calls
//! (veterinarians, shelters/NGOs, reverse geocode), waits for all of them,
//! and folds each outcome into the bundle separately. A provider failure
//! in one branch only empties that branch.

use serde::Serialize;
use vetnear_core::{Category, GeoPoint, SearchRequest, ValidationError};

use crate::error::FetchError;
use crate::fetch::ProximityConfig;
use crate::nominatim::NominatimClient;
use crate::normalize::{normalize_places, NormalizedPlace};
use crate::overpass::OverpassClient;
use crate::types::UserLocationContext;

/// Shelters are sparser than clinics, so their search radius is widened.
pub const NGO_RADIUS_MULTIPLIER: f64 = 1.5;

/// Everything a caller gets back from one search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResultBundle {
    pub veterinarians: Vec<NormalizedPlace>,
    pub ngos: Vec<NormalizedPlace>,
    /// `None` when reverse geocoding failed.
    pub user_location: Option<UserLocationContext>,
    pub counts: ResultCounts,
    /// Radius used for the veterinarian search.
    pub radius_km: f64,
    /// Radius used for the shelter/NGO search.
    pub ngo_radius_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultCounts {
    pub veterinarians: usize,
    pub ngos: usize,
}

/// Stateless search service; cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ProximityService {
    overpass: OverpassClient,
    nominatim: NominatimClient,
    default_radius_km: f64,
}

impl ProximityService {
    /// # Errors
    ///
    /// Returns [`FetchError`] if either provider client cannot be constructed.
    pub fn new(config: &ProximityConfig) -> Result<Self, FetchError> {
        Ok(Self {
            overpass: OverpassClient::new(&config.overpass)?,
            nominatim: NominatimClient::new(&config.nominatim)?,
            default_radius_km: config.default_radius_km,
        })
    }

    #[must_use]
    pub fn default_radius_km(&self) -> f64 {
        self.default_radius_km
    }

    /// Validates raw coordinates, then runs [`ProximityService::search`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] before any network call when coordinates
    /// are missing, not numbers, or out of range.
    pub async fn search_coordinates(
        &self,
        latitude: Option<f64>,
        longitude: Option<f64>,
        radius_km: Option<f64>,
    ) -> Result<SearchResultBundle, ValidationError> {
        let request = SearchRequest::new(latitude, longitude, radius_km, self.default_radius_km)?;
        Ok(self.search(&request).await)
    }

    /// Runs the veterinarian, shelter, and reverse-geocode lookups concurrently.
    ///
    /// Never fails: provider errors degrade the affected branch to an empty
    /// list or a `None` location, and are logged.
    pub async fn search(&self, request: &SearchRequest) -> SearchResultBundle {
        let center = request.center();
        let radius_km = request.radius_km();
        let ngo_radius_km = radius_km * NGO_RADIUS_MULTIPLIER;

        let (veterinarians, ngos, user_location) = tokio::join!(
            self.search_category(center, radius_km, Category::Veterinary),
            self.search_category(center, ngo_radius_km, Category::AnimalShelter),
            self.reverse_geocode(center),
        );

        let veterinarians = degrade_places(veterinarians, Category::Veterinary);
        let ngos = degrade_places(ngos, Category::AnimalShelter);
        let user_location = user_location
            .inspect_err(|e| {
                tracing::warn!(error = %e, "reverse geocode failed; returning no location context");
            })
            .ok();

        tracing::info!(
            center = %center,
            radius_km,
            veterinarians = veterinarians.len(),
            ngos = ngos.len(),
            located = user_location.is_some(),
            "proximity search complete"
        );

        SearchResultBundle {
            counts: ResultCounts {
                veterinarians: veterinarians.len(),
                ngos: ngos.len(),
            },
            veterinarians,
            ngos,
            user_location,
            radius_km,
            ngo_radius_km,
        }
    }

    /// Searches a single category and normalizes the results.
    ///
    /// # Errors
    ///
    /// Propagates [`FetchError`] from the geodata provider.
    pub async fn search_category(
        &self,
        center: GeoPoint,
        radius_km: f64,
        category: Category,
    ) -> Result<Vec<NormalizedPlace>, FetchError> {
        let elements = self
            .overpass
            .find_elements(center, radius_km, category)
            .await?;
        Ok(normalize_places(elements, center, category))
    }

    /// Reverse-geocodes the search center.
    ///
    /// # Errors
    ///
    /// Propagates [`FetchError`] from the reverse-geocoding provider.
    pub async fn reverse_geocode(
        &self,
        center: GeoPoint,
    ) -> Result<UserLocationContext, FetchError> {
        self.nominatim.reverse(center).await
    }
}

fn degrade_places(
    result: Result<Vec<NormalizedPlace>, FetchError>,
    category: Category,
) -> Vec<NormalizedPlace> {
    result.unwrap_or_else(|e| {
        tracing::warn!(
            category = category.slug(),
            error = %e,
            "place search failed; returning empty list"
        );
        Vec::new()
    })
}
