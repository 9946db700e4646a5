pub mod app_config;
pub mod config;
pub mod request;
pub mod route;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use request::{Direction, ElevationTier, RouteRequest, Terrain, Topology};
pub use route::{
    Difficulty, LatLng, ResolvedLocation, RouteCandidate, RouteResult, SearchOutcome,
    SearchParameters,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Validation errors for incoming route requests.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("requested distance must be a positive number of kilometres, got {0}")]
    InvalidDistance(f64),

    #[error("start location must not be empty")]
    MissingStart,

    #[error("point-to-point routes require an end location")]
    MissingEnd,

    #[error("loop routes must not specify an end location")]
    UnexpectedEnd,
}
