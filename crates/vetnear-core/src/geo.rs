//! Geographic value types shared by every crate in the workspace.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::search::ValidationError;

/// A validated latitude/longitude pair in decimal degrees.
///
/// Latitude is within `-90..=90` and longitude within `-180..=180`; the
/// constructor rejects anything else, including NaN and infinities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Builds a point after range-checking both coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCoordinates`] for non-finite input,
    /// otherwise the out-of-range variant for whichever axis is invalid.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ValidationError::InvalidCoordinates);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Kind of service a proximity search looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Veterinary,
    AnimalShelter,
}

impl Category {
    /// Canonical slug used in URLs and logs.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Category::Veterinary => "veterinary",
            Category::AnimalShelter => "animal_shelter",
        }
    }

    /// Name given to a place whose tags carry no usable name.
    #[must_use]
    pub fn default_place_name(self) -> &'static str {
        match self {
            Category::Veterinary => "Veterinary Clinic",
            Category::AnimalShelter => "Animal Shelter",
        }
    }

    /// Human-readable label attached to every result of this category.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Veterinary => "Veterinary",
            Category::AnimalShelter => "Animal Shelter / NGO",
        }
    }

    /// Parses a slug or one of its aliases. Returns `None` for anything else.
    #[must_use]
    pub fn from_slug(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "veterinary" | "vet" | "vets" | "veterinarians" => Some(Category::Veterinary),
            "animal_shelter" | "shelter" | "shelters" | "ngo" | "ngos" => {
                Some(Category::AnimalShelter)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| format!("unknown category '{s}'"))
    }
}
