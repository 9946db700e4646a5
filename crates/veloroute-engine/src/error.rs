use thiserror::Error;

use veloroute_core::RequestError;
use veloroute_directions::DirectionsError;
use veloroute_geocode::GeocodeError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid route request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error("directions provider: {0}")]
    Directions(#[from] DirectionsError),

    #[error(
        "all {attempted} route variants failed: the directions provider \
         could not produce a usable route for this request"
    )]
    AllVariantsFailed { attempted: u32 },
}
