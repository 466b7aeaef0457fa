use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub overpass_url: String,
    pub nominatim_url: String,
    pub user_agent: String,
    pub overpass_timeout_secs: u64,
    pub nominatim_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_initial_delay_ms: u64,
    pub retry_max_jitter_ms: u64,
    pub default_radius_km: f64,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("overpass_url", &self.overpass_url)
            .field("nominatim_url", &self.nominatim_url)
            .field("user_agent", &self.user_agent)
            .field("overpass_timeout_secs", &self.overpass_timeout_secs)
            .field("nominatim_timeout_secs", &self.nominatim_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_initial_delay_ms", &self.retry_initial_delay_ms)
            .field("retry_max_jitter_ms", &self.retry_max_jitter_ms)
            .field("default_radius_km", &self.default_radius_km)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
