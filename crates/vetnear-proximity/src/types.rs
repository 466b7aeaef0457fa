//! Provider response types.
//!
//! These model the JSON returned by the Overpass interpreter (`[out:json]`)
//! and by Nominatim's `/reverse` endpoint. Only the fields the normalizer
//! reads are typed; tag bags stay open-ended.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Overpass response. `elements` is mandatory: a 200 without it is
/// treated as malformed.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<OverpassElement>,
}

/// One raw geographic record: a node, or a way/relation reported with
/// `out center`.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub id: i64,
    /// Present on nodes.
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Centroid of a way or relation.
    #[serde(default)]
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Nominatim `/reverse?format=json` body.
///
/// Nominatim reports failures such as "Unable to geocode" as a 200 with an
/// `error` field instead of an address.
#[derive(Debug, Deserialize)]
pub struct NominatimReverse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub suburb: Option<String>,
    pub state_district: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

/// Human-readable context for the search center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserLocationContext {
    pub city: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub display_address: Option<String>,
}
