//! Validated input for a proximity search.

use thiserror::Error;

use crate::geo::GeoPoint;

/// Radius used when a request omits one or supplies an unusable value.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Input problems detected before any provider is contacted.
///
/// The `Display` text is safe to show to end users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Latitude and longitude are required")]
    MissingCoordinates,

    #[error("Latitude and longitude must be valid numbers")]
    InvalidCoordinates,

    #[error("Latitude must be between -90 and 90")]
    LatitudeOutOfRange,

    #[error("Longitude must be between -180 and 180")]
    LongitudeOutOfRange,
}

/// A search center plus the radius to search around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRequest {
    center: GeoPoint,
    radius_km: f64,
}

impl SearchRequest {
    /// Validates numeric coordinates and resolves the effective radius.
    ///
    /// A missing, non-finite, or non-positive `radius_km` falls back to
    /// `default_radius_km`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if either coordinate is missing, not a
    /// number, or out of range.
    pub fn new(
        latitude: Option<f64>,
        longitude: Option<f64>,
        radius_km: Option<f64>,
        default_radius_km: f64,
    ) -> Result<Self, ValidationError> {
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            return Err(ValidationError::MissingCoordinates);
        };
        let center = GeoPoint::new(latitude, longitude)?;
        Ok(Self {
            center,
            radius_km: resolve_radius(radius_km, default_radius_km),
        })
    }

    /// Same as [`SearchRequest::new`] but starting from raw query-string values.
    ///
    /// Empty strings count as missing. A radius that does not parse falls back
    /// to the default instead of failing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCoordinates`] when a coordinate is
    /// absent and [`ValidationError::InvalidCoordinates`] when one does not
    /// parse as a number.
    pub fn from_params(
        latitude: Option<&str>,
        longitude: Option<&str>,
        radius_km: Option<&str>,
        default_radius_km: f64,
    ) -> Result<Self, ValidationError> {
        let latitude = non_blank(latitude);
        let longitude = non_blank(longitude);
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            return Err(ValidationError::MissingCoordinates);
        };
        let latitude = parse_coordinate(latitude)?;
        let longitude = parse_coordinate(longitude)?;
        let radius_km = non_blank(radius_km).and_then(|r| r.parse::<f64>().ok());
        Self::new(
            Some(latitude),
            Some(longitude),
            radius_km,
            default_radius_km,
        )
    }

    #[must_use]
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    #[must_use]
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_coordinate(raw: &str) -> Result<f64, ValidationError> {
    raw.parse::<f64>()
        .map_err(|_| ValidationError::InvalidCoordinates)
}

fn resolve_radius(radius_km: Option<f64>, default_radius_km: f64) -> f64 {
    match radius_km {
        Some(r) if r.is_finite() && r > 0.0 => r,
        _ => default_radius_km,
    }
}
