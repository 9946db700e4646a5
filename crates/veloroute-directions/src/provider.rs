//! Provider seam for the convergence engine.

use crate::error::DirectionsError;
use crate::types::{ProviderRoute, RoutePlan};

/// The one interface the search and orchestrator talk to. Production uses
/// [`crate::DirectionsClient`]; engine tests substitute a scripted fake that
/// replays fixed distance/elevation sequences.
pub trait DirectionsProvider: Send + Sync {
    /// Requests one route for `plan`.
    fn route(
        &self,
        plan: &RoutePlan,
    ) -> impl std::future::Future<Output = Result<ProviderRoute, DirectionsError>> + Send;

    /// Requests the GPX export document for `plan`. Callers treat failure as
    /// best-effort; a missing export never fails route generation.
    fn export_gpx(
        &self,
        plan: &RoutePlan,
    ) -> impl std::future::Future<Output = Result<String, DirectionsError>> + Send;
}
