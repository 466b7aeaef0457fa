//! Normalization of raw Overpass elements into [`NormalizedPlace`] results.
//!
//! Raw records are heterogeneous: the same clinic may come back as a node and
//! as a way, names and addresses live in optional tags, and contact details
//! appear under either plain or `contact:`-prefixed keys. This module resolves
//! each record through explicit fallback chains, drops duplicates, and sorts
//! by distance from the search center.

use std::collections::{BTreeMap, HashSet};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use vetnear_core::{Category, GeoPoint};

use crate::distance::{distance_km, round_km};
use crate::types::OverpassElement;

/// Shown when no address tag is usable.
pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

/// Label used in the map link when a place has no name at all.
const DESTINATION_FALLBACK: &str = "Destination";

/// Address tags joined, in this order, into the composed postal address.
const ADDRESS_PARTS: [&str; 5] = [
    "addr:housenumber",
    "addr:street",
    "addr:city",
    "addr:state",
    "addr:postcode",
];

/// Characters `encodeURIComponent` leaves untouched: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A place in the shape returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPlace {
    /// `"<element type>/<element id>"`, e.g. `node/42`.
    pub id: String,
    pub name: String,
    pub address: String,
    /// Distance from the search center, rounded to 2 decimals.
    pub distance_km: f64,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub opening_hours: Option<String>,
    pub location: GeoPoint,
    pub directions_url: String,
    pub category: &'static str,
    pub tags: BTreeMap<String, String>,
}

/// Converts raw elements into a deduplicated list sorted by ascending distance.
///
/// Elements with neither a point nor a centroid, or with coordinates outside
/// the valid range, are dropped. When two elements share rounded coordinates
/// (5 decimals) and resolved name, the first one wins. Equal distances keep
/// their input order.
#[must_use]
pub fn normalize_places(
    elements: Vec<OverpassElement>,
    center: GeoPoint,
    category: Category,
) -> Vec<NormalizedPlace> {
    let mut seen: HashSet<(i64, i64, String)> = HashSet::new();
    let mut places = Vec::with_capacity(elements.len());

    for element in elements {
        let Some(location) = resolve_location(&element) else {
            tracing::debug!(
                element_type = %element.element_type,
                id = element.id,
                "skipping element without usable coordinates"
            );
            continue;
        };

        let name = resolve_name(&element.tags, category);
        if !seen.insert(dedup_key(location, &name)) {
            continue;
        }

        places.push(NormalizedPlace {
            id: format!("{}/{}", element.element_type, element.id),
            address: resolve_address(&element.tags),
            distance_km: round_km(distance_km(center, location)),
            phone: contact_tag(&element.tags, "phone"),
            website: contact_tag(&element.tags, "website"),
            email: contact_tag(&element.tags, "email"),
            opening_hours: contact_tag(&element.tags, "opening_hours"),
            directions_url: directions_url(location, &name),
            category: category.label(),
            location,
            name,
            tags: element.tags,
        });
    }

    places.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    places
}

/// The element's own point if present, else its centroid.
fn resolve_location(element: &OverpassElement) -> Option<GeoPoint> {
    let (lat, lon) = match (element.lat, element.lon, element.center) {
        (Some(lat), Some(lon), _) => (lat, lon),
        (_, _, Some(center)) => (center.lat, center.lon),
        _ => return None,
    };
    GeoPoint::new(lat, lon).ok()
}

fn tag<'a>(tags: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    tags.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// `name`, then `name:en`, then the category's default label.
#[must_use]
pub fn resolve_name(tags: &BTreeMap<String, String>, category: Category) -> String {
    tag(tags, "name")
        .or_else(|| tag(tags, "name:en"))
        .unwrap_or(category.default_place_name())
        .to_owned()
}

/// Structured address parts joined with `", "`, then `addr:full`, then
/// [`ADDRESS_NOT_AVAILABLE`].
#[must_use]
pub fn resolve_address(tags: &BTreeMap<String, String>) -> String {
    let parts: Vec<&str> = ADDRESS_PARTS
        .iter()
        .filter_map(|key| tag(tags, key))
        .collect();
    if !parts.is_empty() {
        return parts.join(", ");
    }
    tag(tags, "addr:full")
        .unwrap_or(ADDRESS_NOT_AVAILABLE)
        .to_owned()
}

/// Plain tag first, then its `contact:` variant. Absent stays `None`.
fn contact_tag(tags: &BTreeMap<String, String>, key: &str) -> Option<String> {
    tag(tags, key)
        .or_else(|| tag(tags, &format!("contact:{key}")))
        .map(str::to_owned)
}

#[allow(clippy::cast_possible_truncation)]
fn dedup_key(location: GeoPoint, name: &str) -> (i64, i64, String) {
    (
        (location.latitude() * 1e5).round() as i64,
        (location.longitude() * 1e5).round() as i64,
        name.to_owned(),
    )
}

/// Google Maps directions link to `location`, labelled with `name`.
#[must_use]
pub fn directions_url(location: GeoPoint, name: &str) -> String {
    let label = if name.trim().is_empty() {
        DESTINATION_FALLBACK
    } else {
        name
    };
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}&destination_name={}",
        location.latitude(),
        location.longitude(),
        utf8_percent_encode(label, COMPONENT)
    )
}
