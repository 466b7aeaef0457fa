pub mod app_config;
pub mod config;
pub mod geo;
pub mod search;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use geo::{Category, GeoPoint};
pub use search::{SearchRequest, ValidationError, DEFAULT_RADIUS_KM};
