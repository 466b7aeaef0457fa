pub mod distance;
pub mod error;
mod fetch;
pub mod nominatim;
pub mod normalize;
pub mod overpass;
pub mod query;
pub mod retry;
pub mod service;
pub mod types;

pub use distance::distance_km;
pub use error::FetchError;
pub use fetch::{ProviderConfig, ProximityConfig};
pub use nominatim::NominatimClient;
pub use normalize::{normalize_places, NormalizedPlace};
pub use overpass::OverpassClient;
pub use query::{build_query, build_query_for_slug, OverpassQuery};
pub use retry::RetryPolicy;
pub use service::{ProximityService, ResultCounts, SearchResultBundle, NGO_RADIUS_MULTIPLIER};
pub use types::{OverpassElement, UserLocationContext};
