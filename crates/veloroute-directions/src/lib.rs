pub mod client;
pub mod error;
pub mod provider;
pub mod retry;
pub mod types;

pub use client::DirectionsClient;
pub use error::DirectionsError;
pub use provider::DirectionsProvider;
pub use types::{ProviderRoute, RoutePlan, VehicleProfile};
