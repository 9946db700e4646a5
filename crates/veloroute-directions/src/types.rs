//! Wire types and request plans for the directions provider.

use serde::Deserialize;

use veloroute_core::{LatLng, SearchParameters, Terrain};

/// Routing profile the provider should use for a given terrain preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleProfile {
    RacingBike,
    Bike,
    Mtb,
}

impl VehicleProfile {
    #[must_use]
    pub fn from_terrain(terrain: Terrain) -> Self {
        match terrain {
            Terrain::Road => VehicleProfile::RacingBike,
            Terrain::Mtb => VehicleProfile::Mtb,
            Terrain::Gravel | Terrain::Mixed => VehicleProfile::Bike,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleProfile::RacingBike => "racingbike",
            VehicleProfile::Bike => "bike",
            VehicleProfile::Mtb => "mtb",
        }
    }
}

/// Everything one provider call needs: anchors, generation knobs, profile.
///
/// `end = None` selects the provider's round-trip mode, where the route is a
/// loop generated from `start` and the parameters; `end = Some(..)` is plain
/// point-to-point routing and the length knobs are ignored by the provider.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub start: LatLng,
    pub end: Option<LatLng>,
    pub params: SearchParameters,
    pub vehicle: VehicleProfile,
}

impl RoutePlan {
    #[must_use]
    pub fn is_round_trip(&self) -> bool {
        self.end.is_none()
    }
}

/// One route as returned by the provider, in provider units.
#[derive(Debug, Clone)]
pub struct ProviderRoute {
    pub path: Vec<LatLng>,
    pub distance_m: f64,
    pub elevation_gain_m: f64,
    pub time_ms: u64,
}

/// Raw response envelope: a list of candidate paths, best first.
#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    #[serde(default)]
    pub paths: Vec<PathBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PathBody {
    pub distance: f64,
    #[serde(default)]
    pub ascend: f64,
    pub time: u64,
    pub points: PointsBody,
}

/// GeoJSON-style geometry: coordinates arrive longitude-first.
#[derive(Debug, Deserialize)]
pub(crate) struct PointsBody {
    pub coordinates: Vec<Vec<f64>>,
}

impl PathBody {
    /// Converts the lon-first coordinate rows into `LatLng`, skipping any
    /// row with fewer than two components.
    pub(crate) fn into_provider_route(self) -> ProviderRoute {
        let path = self
            .points
            .coordinates
            .into_iter()
            .filter_map(|row| match row.as_slice() {
                [lon, lat, ..] => Some(LatLng {
                    lat: *lat,
                    lng: *lon,
                }),
                _ => None,
            })
            .collect();
        ProviderRoute {
            path,
            distance_m: self.distance,
            elevation_gain_m: self.ascend,
            time_ms: self.time,
        }
    }
}
