//! Route-side domain model: resolved locations, search parameters, provider
//! candidates, and the caller-facing result record.
//!
//! Everything here is request-scoped. Instances are created while one
//! generation request is being served and discarded with the response; there
//! is no persistence and no cross-request sharing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A geographic coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A free-text place name resolved to coordinates by the geocoding provider.
///
/// Immutable once produced; `matched_candidate` records which query variant
/// actually succeeded so callers can see how fuzzy the match was.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub coords: LatLng,
    pub display_name: String,
    pub matched_candidate: String,
}

/// Generation knobs understood by the directions provider.
///
/// Mutated only by the parameter search between attempts of a single search;
/// never shared across concurrent searches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParameters {
    /// Requested route length in metres. The provider treats this as a hint,
    /// not a promise.
    pub target_length_m: f64,
    /// Number of intermediate waypoints the provider may place, in `[3, 10]`.
    pub waypoint_count: u8,
    /// Random seed; distinct seeds yield geometrically distinct loops.
    pub seed: u64,
    /// Compass heading hint in degrees for the loop's initial leg.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearing_degrees: Option<u16>,
}

impl SearchParameters {
    pub const MIN_WAYPOINTS: u8 = 3;
    pub const MAX_WAYPOINTS: u8 = 10;
    pub const MIN_TARGET_LENGTH_M: f64 = 1_000.0;
    pub const MAX_TARGET_LENGTH_M: f64 = 300_000.0;
}

/// One concrete route returned by the directions provider, annotated with
/// how far its actual distance landed from the requested one.
///
/// Immutable once constructed; the search produces one per attempt and keeps
/// the one with the smallest error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCandidate {
    pub path: Vec<LatLng>,
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub duration_min: f64,
    /// GPX export payload; empty when the best-effort export failed.
    pub gpx: String,
    /// `|actual - requested| / requested` distance error.
    pub distance_error_fraction: f64,
    pub params_used: SearchParameters,
}

/// Terminal state of one parameter search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOutcome {
    /// The candidate landed inside the distance tolerance band.
    Accepted,
    /// Attempts ran out; the candidate is the best one seen, outside the band.
    Exhausted,
}

/// The caller-facing route record: the accepted or best-known candidate plus
/// the originally requested figures, so any discrepancy is always visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub estimated_time: String,
    pub start_point: String,
    pub outcome: SearchOutcome,
    pub requested_distance_km: f64,
    pub candidate: RouteCandidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

impl Difficulty {
    /// Difficulty from requested distance: under 30 km easy, under 60 km
    /// moderate, otherwise hard.
    #[must_use]
    pub fn from_distance_km(distance_km: f64) -> Self {
        if distance_km < 30.0 {
            Difficulty::Easy
        } else if distance_km < 60.0 {
            Difficulty::Moderate
        } else {
            Difficulty::Hard
        }
    }

    /// Lowercase label for display surfaces.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Hard => "hard",
        }
    }
}
