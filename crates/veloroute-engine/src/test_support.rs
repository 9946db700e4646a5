//! Deterministic fake directions provider for engine tests.
//!
//! Replays a script of provider responses in order and records every plan it
//! was called with, so tests can assert on attempt counts, parameter
//! adjustments, and seed windows without any network mocking.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use veloroute_core::{ElevationTier, LatLng, SearchParameters};
use veloroute_directions::{
    DirectionsError, DirectionsProvider, ProviderRoute, RoutePlan, VehicleProfile,
};

use crate::search::SearchTarget;

pub(crate) struct ScriptedProvider {
    script: Mutex<VecDeque<Result<ProviderRoute, DirectionsError>>>,
    plans: Mutex<Vec<RoutePlan>>,
    calls: AtomicU32,
    gpx: Result<String, ()>,
}

impl ScriptedProvider {
    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn recorded_plans(&self) -> Vec<RoutePlan> {
        self.plans.lock().expect("plans lock poisoned").clone()
    }

    pub(crate) fn with_failing_gpx(mut self) -> Self {
        self.gpx = Err(());
        self
    }
}

impl DirectionsProvider for ScriptedProvider {
    async fn route(&self, plan: &RoutePlan) -> Result<ProviderRoute, DirectionsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.plans
            .lock()
            .expect("plans lock poisoned")
            .push(plan.clone());
        self.script
            .lock()
            .expect("script lock poisoned")
            .pop_front()
            .unwrap_or(Err(DirectionsError::EmptyPaths))
    }

    async fn export_gpx(&self, _plan: &RoutePlan) -> Result<String, DirectionsError> {
        self.gpx
            .clone()
            .map_err(|()| DirectionsError::Transient { status: 503 })
    }
}

pub(crate) fn scripted_provider(
    script: Vec<Result<ProviderRoute, DirectionsError>>,
) -> ScriptedProvider {
    ScriptedProvider {
        script: Mutex::new(script.into()),
        plans: Mutex::new(Vec::new()),
        calls: AtomicU32::new(0),
        gpx: Ok("<gpx version=\"1.1\"/>".to_owned()),
    }
}

/// A plausible loop route of the given length and climb. The three-point
/// path is geometrically meaningless but structurally valid.
pub(crate) fn scripted_route(distance_m: f64, elevation_gain_m: f64) -> ProviderRoute {
    ProviderRoute {
        path: vec![
            LatLng {
                lat: 55.6415,
                lng: 12.0803,
            },
            LatLng {
                lat: 55.6502,
                lng: 12.1101,
            },
            LatLng {
                lat: 55.6415,
                lng: 12.0803,
            },
        ],
        distance_m,
        elevation_gain_m,
        time_ms: 7_200_000,
    }
}

pub(crate) fn target(distance_km: f64, tier: ElevationTier) -> SearchTarget {
    SearchTarget { distance_km, tier }
}

pub(crate) fn loop_plan() -> RoutePlan {
    RoutePlan {
        start: LatLng {
            lat: 55.6415,
            lng: 12.0803,
        },
        end: None,
        params: SearchParameters {
            target_length_m: 0.0,
            waypoint_count: 0,
            seed: 0,
            bearing_degrees: None,
        },
        vehicle: VehicleProfile::Bike,
    }
}
