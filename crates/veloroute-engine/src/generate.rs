//! Top-level façade: resolve, converge, assemble.

use std::sync::Arc;
use std::time::Duration;

use veloroute_core::{AppConfig, RouteRequest, RouteResult, SearchParameters, Topology};
use veloroute_directions::{DirectionsClient, DirectionsProvider, RoutePlan, VehicleProfile};
use veloroute_geocode::{GeocodeClient, LocationResolver, RateLimiter};

use crate::assemble::assemble_result;
use crate::error::EngineError;
use crate::search::SearchTarget;
use crate::variants::VariantOrchestrator;

/// One route-generation pipeline: a location resolver, a directions
/// provider, and the variant limits. Everything else is request-scoped.
pub struct RouteEngine<P> {
    provider: P,
    resolver: LocationResolver,
    desired_count: u32,
    variant_cap: u32,
}

impl RouteEngine<DirectionsClient> {
    /// Builds the production pipeline from configuration: a geocode client
    /// behind a shared rate limiter and a directions client with the
    /// configured retry policy.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when either HTTP client cannot be
    /// constructed from the configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, EngineError> {
        let geocode = GeocodeClient::new(
            &config.geocode_base_url,
            config.http_timeout_secs,
            &config.http_user_agent,
        )?;
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(
            config.geocode_min_interval_ms,
        )));
        let resolver = LocationResolver::new(geocode, limiter, config.region_qualifier.clone());

        let provider = DirectionsClient::new(
            &config.directions_api_key,
            &config.directions_base_url,
            config.http_timeout_secs,
            &config.http_user_agent,
            config.provider_max_retries,
            config.provider_retry_delay_ms,
        )?;

        Ok(Self::new(provider, resolver))
    }
}

impl<P: DirectionsProvider> RouteEngine<P> {
    #[must_use]
    pub fn new(provider: P, resolver: LocationResolver) -> Self {
        Self {
            provider,
            resolver,
            desired_count: 3,
            variant_cap: 6,
        }
    }

    #[must_use]
    pub fn with_limits(mut self, desired_count: u32, variant_cap: u32) -> Self {
        self.desired_count = desired_count;
        self.variant_cap = variant_cap;
        self
    }

    /// Serves one generation request end to end: validate, resolve the
    /// start (and end, for point-to-point) location, run the variant
    /// orchestrator, and assemble caller-facing records.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidRequest`] before any network call.
    /// - [`EngineError::Geocode`] when a location cannot be resolved.
    /// - [`EngineError::AllVariantsFailed`] when no variant produced a route.
    pub async fn generate(&self, request: &RouteRequest) -> Result<Vec<RouteResult>, EngineError> {
        request.validate()?;

        let start = self.resolver.resolve(&request.start_text).await?;
        let end = match (&request.topology, request.end_text.as_deref()) {
            (Topology::PointToPoint, Some(end_text)) => {
                Some(self.resolver.resolve(end_text).await?)
            }
            _ => None,
        };

        let plan = plan_template(request, start.coords, end.as_ref().map(|e| e.coords));
        let target = SearchTarget {
            distance_km: request.distance_km,
            tier: request.elevation_tier,
        };

        let orchestrator =
            VariantOrchestrator::with_limits(&self.provider, self.desired_count, self.variant_cap);
        let variants = orchestrator.generate(&target, &plan).await?;

        Ok(variants
            .into_iter()
            .map(|variant| assemble_result(request, &start, variant.variant_index, variant.result))
            .collect())
    }
}

/// The per-request plan skeleton: anchors, vehicle, and bearing. Length,
/// waypoint, and seed knobs are filled in by the search.
fn plan_template(
    request: &RouteRequest,
    start: veloroute_core::LatLng,
    end: Option<veloroute_core::LatLng>,
) -> RoutePlan {
    RoutePlan {
        start,
        end,
        params: SearchParameters {
            target_length_m: 0.0,
            waypoint_count: 0,
            seed: 0,
            bearing_degrees: request.direction.bearing_degrees(),
        },
        vehicle: VehicleProfile::from_terrain(request.terrain),
    }
}
