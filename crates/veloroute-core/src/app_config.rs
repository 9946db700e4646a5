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
    /// API key for the directions provider. Required; its absence fails
    /// configuration loading before any network call is made.
    pub directions_api_key: String,
    pub directions_base_url: String,
    pub geocode_base_url: String,
    /// Appended to geocode queries that don't already mention it.
    pub region_qualifier: String,
    /// Minimum spacing between geocode calls, enforced by the rate limiter.
    pub geocode_min_interval_ms: u64,
    pub http_timeout_secs: u64,
    pub http_user_agent: String,
    /// Additional attempts after the first failed provider call.
    pub provider_max_retries: u32,
    pub provider_retry_delay_ms: u64,
    /// Caller-level ceiling on one whole generation request.
    pub generation_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("directions_api_key", &"[redacted]")
            .field("directions_base_url", &self.directions_base_url)
            .field("geocode_base_url", &self.geocode_base_url)
            .field("region_qualifier", &self.region_qualifier)
            .field("geocode_min_interval_ms", &self.geocode_min_interval_ms)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .field("provider_max_retries", &self.provider_max_retries)
            .field("provider_retry_delay_ms", &self.provider_retry_delay_ms)
            .field("generation_timeout_secs", &self.generation_timeout_secs)
            .finish()
    }
}
