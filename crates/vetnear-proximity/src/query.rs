//! Overpass QL construction.

use std::fmt::Write as _;

use vetnear_core::{Category, GeoPoint};

/// Server-side execution limit embedded in every query, in seconds.
const SERVER_TIMEOUT_SECS: u32 = 25;

/// A ready-to-send Overpass QL program. An empty query means "nothing to
/// search for" and must not be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassQuery(String);

impl OverpassQuery {
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OverpassQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tag filters that identify a category on OpenStreetMap.
fn tag_filters(category: Category) -> &'static [(&'static str, &'static str)] {
    match category {
        Category::Veterinary => &[("amenity", "veterinary"), ("healthcare", "veterinary")],
        Category::AnimalShelter => &[
            ("amenity", "animal_shelter"),
            ("amenity", "animal_boarding"),
            ("animal", "shelter"),
        ],
    }
}

/// Builds a query matching nodes and ways tagged for `category` within
/// `radius_m` metres of `center`. Ways are reported with their centroid.
///
/// A non-positive or non-finite radius yields [`OverpassQuery::empty`].
#[must_use]
pub fn build_query(center: GeoPoint, radius_m: f64, category: Category) -> OverpassQuery {
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return OverpassQuery::empty();
    }

    let around = format!(
        "(around:{radius_m:.0},{},{})",
        center.latitude(),
        center.longitude()
    );

    let mut q = format!("[out:json][timeout:{SERVER_TIMEOUT_SECS}];\n(\n");
    for (key, value) in tag_filters(category) {
        for element in ["node", "way"] {
            // Writing into a String cannot fail.
            let _ = writeln!(q, "  {element}[\"{key}\"=\"{value}\"]{around};");
        }
    }
    q.push_str(");\nout center;");
    OverpassQuery(q)
}

/// Like [`build_query`] but for a category given by slug. Unknown slugs yield
/// an empty query.
#[must_use]
pub fn build_query_for_slug(center: GeoPoint, radius_m: f64, slug: &str) -> OverpassQuery {
    Category::from_slug(slug).map_or_else(OverpassQuery::empty, |category| {
        build_query(center, radius_m, category)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delhi() -> GeoPoint {
        GeoPoint::new(28.6139, 77.209).expect("valid point")
    }

    #[test]
    fn veterinary_query_matches_amenity_and_healthcare() {
        let q = build_query(delhi(), 10_000.0, Category::Veterinary);
        let text = q.as_str();
        assert!(text.starts_with("[out:json][timeout:25];"));
        assert!(text.contains("node[\"amenity\"=\"veterinary\"](around:10000,28.6139,77.209);"));
        assert!(text.contains("way[\"amenity\"=\"veterinary\"](around:10000,28.6139,77.209);"));
        assert!(text.contains("node[\"healthcare\"=\"veterinary\"]"));
        assert!(text.contains("way[\"healthcare\"=\"veterinary\"]"));
        assert!(text.ends_with("out center;"));
        assert!(!text.contains("animal_shelter"));
    }

    #[test]
    fn shelter_query_covers_boarding_and_animal_tag() {
        let q = build_query(delhi(), 15_000.0, Category::AnimalShelter);
        let text = q.as_str();
        for filter in [
            "[\"amenity\"=\"animal_shelter\"]",
            "[\"amenity\"=\"animal_boarding\"]",
            "[\"animal\"=\"shelter\"]",
        ] {
            assert!(text.contains(&format!("node{filter}")), "missing node {filter}");
            assert!(text.contains(&format!("way{filter}")), "missing way {filter}");
        }
        assert!(text.contains("(around:15000,"));
        assert!(!text.contains("veterinary"));
    }

    #[test]
    fn fractional_radius_rounds_to_whole_metres() {
        let q = build_query(delhi(), 1_234.6, Category::Veterinary);
        assert!(q.as_str().contains("(around:1235,"));
    }

    #[test]
    fn non_positive_radius_is_empty() {
        assert!(build_query(delhi(), 0.0, Category::Veterinary).is_empty());
        assert!(build_query(delhi(), -5.0, Category::Veterinary).is_empty());
        assert!(build_query(delhi(), f64::NAN, Category::Veterinary).is_empty());
    }

    #[test]
    fn unknown_slug_is_empty() {
        assert!(build_query_for_slug(delhi(), 5_000.0, "pharmacy").is_empty());
        assert!(!build_query_for_slug(delhi(), 5_000.0, "ngos").is_empty());
    }
}
