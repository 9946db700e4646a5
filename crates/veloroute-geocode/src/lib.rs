pub mod candidates;
pub mod client;
pub mod error;
pub mod limiter;

pub use candidates::geocode_candidates;
pub use client::{GeocodeClient, LocationResolver};
pub use error::GeocodeError;
pub use limiter::RateLimiter;
