//! HTTP client for the directions provider's routing API.
//!
//! The provider exposes two request flavours sharing one endpoint:
//! point-to-point routing between two coordinates, and "round trip" loop
//! generation from a single coordinate plus length/seed/waypoint knobs. A
//! parallel request with `type=gpx` yields a GPX export document.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::DirectionsError;
use crate::provider::DirectionsProvider;
use crate::retry::retry_transient;
use crate::types::{DirectionsResponse, ProviderRoute, RoutePlan};

/// Client for the directions provider.
///
/// Transient faults (HTTP 429/500/503, network-level failures) are retried
/// up to `max_retries` extra attempts with a short fixed delay; any other
/// non-2xx response aborts the attempt immediately as
/// [`DirectionsError::Fatal`].
pub struct DirectionsClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl DirectionsClient {
    /// # Errors
    ///
    /// Returns [`DirectionsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DirectionsError::InvalidUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        api_key: &str,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, DirectionsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| DirectionsError::InvalidUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Builds the routing URL for `plan`, optionally as a GPX export request.
    fn build_url(&self, plan: &RoutePlan, gpx: bool) -> Result<Url, DirectionsError> {
        let mut url = self
            .base_url
            .join("route")
            .map_err(|e| DirectionsError::InvalidUrl(format!("cannot build route URL: {e}")))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            pairs.append_pair("vehicle", plan.vehicle.as_str());
            pairs.append_pair("points_encoded", "false");
            pairs.append_pair("elevation", "true");
            pairs.append_pair("calc_points", "true");
            pairs.append_pair("instructions", "false");

            let start = format!("{},{}", plan.start.lat, plan.start.lng);
            if let Some(end) = plan.end {
                pairs.append_pair("point", &start);
                pairs.append_pair("point", &format!("{},{}", end.lat, end.lng));
            } else {
                let params = &plan.params;
                pairs.append_pair("point", &start);
                pairs.append_pair("algorithm", "round_trip");
                pairs.append_pair(
                    "round_trip.distance",
                    &format!("{}", params.target_length_m.round()),
                );
                pairs.append_pair("round_trip.seed", &params.seed.to_string());
                pairs.append_pair("round_trip.points", &params.waypoint_count.to_string());
                if let Some(bearing) = params.bearing_degrees {
                    pairs.append_pair("heading", &bearing.to_string());
                }
            }

            if gpx {
                pairs.append_pair("type", "gpx");
            }
        }

        Ok(url)
    }

    /// Sends one GET and triages the status into typed errors.
    async fn request_text(&self, url: Url, accept: &str) -> Result<String, DirectionsError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await?;
        let status = response.status();

        if matches!(
            status,
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::INTERNAL_SERVER_ERROR
                | StatusCode::SERVICE_UNAVAILABLE
        ) {
            return Err(DirectionsError::Transient {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectionsError::Fatal {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

impl DirectionsProvider for DirectionsClient {
    /// Requests one route, retrying transient faults.
    ///
    /// A 2xx response carrying zero paths is a geometrically invalid request
    /// (e.g. a point in open water), not a transient fault, and is returned
    /// as [`DirectionsError::EmptyPaths`] without retrying.
    async fn route(&self, plan: &RoutePlan) -> Result<ProviderRoute, DirectionsError> {
        let url = self.build_url(plan, false)?;

        retry_transient(self.max_retries, self.retry_delay_ms, || {
            let url = url.clone();
            async move {
                let body = self.request_text(url.clone(), "application/json").await?;
                let parsed = serde_json::from_str::<DirectionsResponse>(&body).map_err(|e| {
                    DirectionsError::Deserialize {
                        context: "route response".to_owned(),
                        source: e,
                    }
                })?;

                let Some(path) = parsed.paths.into_iter().next() else {
                    return Err(DirectionsError::EmptyPaths);
                };

                Ok(path.into_provider_route())
            }
        })
        .await
    }

    /// Requests the GPX export for `plan`. Transient faults are retried the
    /// same way as [`DirectionsClient::route`]; the caller decides whether a
    /// failure matters.
    async fn export_gpx(&self, plan: &RoutePlan) -> Result<String, DirectionsError> {
        let url = self.build_url(plan, true)?;

        retry_transient(self.max_retries, self.retry_delay_ms, || {
            let url = url.clone();
            async move { self.request_text(url, "application/gpx+xml").await }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VehicleProfile;
    use veloroute_core::{LatLng, SearchParameters};

    fn test_client(base_url: &str) -> DirectionsClient {
        DirectionsClient::new("test-key", base_url, 30, "veloroute-tests/0.1", 1, 0)
            .expect("client construction should not fail")
    }

    fn loop_plan() -> RoutePlan {
        RoutePlan {
            start: LatLng {
                lat: 55.6415,
                lng: 12.0803,
            },
            end: None,
            params: SearchParameters {
                target_length_m: 50_000.0,
                waypoint_count: 5,
                seed: 137,
                bearing_degrees: Some(90),
            },
            vehicle: VehicleProfile::RacingBike,
        }
    }

    #[test]
    fn round_trip_url_carries_generation_knobs() {
        let client = test_client("https://graphhopper.example/api/1");
        let url = client.build_url(&loop_plan(), false).expect("url builds");
        let s = url.as_str();
        assert!(s.contains("algorithm=round_trip"), "{s}");
        assert!(s.contains("round_trip.distance=50000"), "{s}");
        assert!(s.contains("round_trip.seed=137"), "{s}");
        assert!(s.contains("round_trip.points=5"), "{s}");
        assert!(s.contains("heading=90"), "{s}");
        assert!(s.contains("vehicle=racingbike"), "{s}");
    }

    #[test]
    fn point_to_point_url_has_two_points_and_no_length_knobs() {
        let mut plan = loop_plan();
        plan.end = Some(LatLng {
            lat: 55.6761,
            lng: 12.5683,
        });
        let client = test_client("https://graphhopper.example/api/1");
        let url = client.build_url(&plan, false).expect("url builds");
        let s = url.as_str();
        assert_eq!(s.matches("point=").count(), 2, "{s}");
        assert!(!s.contains("round_trip"), "{s}");
        assert!(!s.contains("algorithm"), "{s}");
    }

    #[test]
    fn gpx_url_requests_gpx_type() {
        let client = test_client("https://graphhopper.example/api/1");
        let url = client.build_url(&loop_plan(), true).expect("url builds");
        assert!(url.as_str().contains("type=gpx"));
    }

    #[test]
    fn base_url_trailing_slash_is_normalised() {
        let client = test_client("https://graphhopper.example/api/1/");
        let url = client.build_url(&loop_plan(), false).expect("url builds");
        assert!(url.as_str().starts_with("https://graphhopper.example/api/1/route?"));
    }
}
