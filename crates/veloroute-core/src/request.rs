//! Incoming route-generation request and its enumerated preferences.

use serde::{Deserialize, Serialize};

use crate::RequestError;

/// How much climbing the rider wants.
///
/// The tier seeds the initial waypoint count of the parameter search and
/// supplies the low-end climb rate used to decide whether a candidate route
/// is too flat for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationTier {
    Flat,
    Hilly,
    Mountainous,
}

impl ElevationTier {
    /// Starting waypoint count for the search, before clamping to `[3, 10]`.
    #[must_use]
    pub fn initial_waypoints(self) -> u8 {
        match self {
            ElevationTier::Flat => 3,
            ElevationTier::Hilly => 5,
            ElevationTier::Mountainous => 8,
        }
    }

    /// Low end of the expected climb rate for this tier, in metres of gain
    /// per kilometre of distance. Flat is zero: a flat route can never be
    /// "too flat".
    #[must_use]
    pub fn low_end_climb_rate(self) -> f64 {
        match self {
            ElevationTier::Flat => 0.0,
            ElevationTier::Hilly => 8.0,
            ElevationTier::Mountainous => 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Road,
    Gravel,
    Mtb,
    Mixed,
}

impl Terrain {
    /// Human-readable label used when composing route descriptions.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Terrain::Road => "road",
            Terrain::Gravel => "gravel",
            Terrain::Mtb => "mountain bike",
            Terrain::Mixed => "mixed terrain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Topology {
    Loop,
    PointToPoint,
}

/// Compass preference for which way a loop should initially head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    None,
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Bearing in degrees for the directions provider, or `None` when the
    /// rider expressed no preference.
    #[must_use]
    pub fn bearing_degrees(self) -> Option<u16> {
        match self {
            Direction::None => None,
            Direction::North => Some(0),
            Direction::East => Some(90),
            Direction::South => Some(180),
            Direction::West => Some(270),
        }
    }

    /// Label for route descriptions, `None` when no preference was given.
    #[must_use]
    pub fn label(self) -> Option<&'static str> {
        match self {
            Direction::None => None,
            Direction::North => Some("north"),
            Direction::East => Some("east"),
            Direction::South => Some("south"),
            Direction::West => Some("west"),
        }
    }
}

/// A rider's route-generation request, as received from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub distance_km: f64,
    pub elevation_tier: ElevationTier,
    pub terrain: Terrain,
    pub topology: Topology,
    #[serde(default = "default_direction")]
    pub direction: Direction,
    pub start_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_text: Option<String>,
}

fn default_direction() -> Direction {
    Direction::None
}

impl RouteRequest {
    /// Checks the structural invariants of the request before any network
    /// call is made: positive finite distance, non-empty start text, and an
    /// end location present exactly when the topology is point-to-point.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] naming the first violated invariant.
    pub fn validate(&self) -> Result<(), RequestError> {
        if !self.distance_km.is_finite() || self.distance_km <= 0.0 {
            return Err(RequestError::InvalidDistance(self.distance_km));
        }
        if self.start_text.trim().is_empty() {
            return Err(RequestError::MissingStart);
        }
        let has_end = self
            .end_text
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty());
        match self.topology {
            Topology::PointToPoint if !has_end => Err(RequestError::MissingEnd),
            Topology::Loop if has_end => Err(RequestError::UnexpectedEnd),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loop_request() -> RouteRequest {
        RouteRequest {
            distance_km: 50.0,
            elevation_tier: ElevationTier::Hilly,
            terrain: Terrain::Road,
            topology: Topology::Loop,
            direction: Direction::None,
            start_text: "Roskilde".to_owned(),
            end_text: None,
        }
    }

    #[test]
    fn valid_loop_request_passes() {
        assert!(loop_request().validate().is_ok());
    }

    #[test]
    fn zero_distance_is_rejected() {
        let mut req = loop_request();
        req.distance_km = 0.0;
        assert!(matches!(
            req.validate(),
            Err(RequestError::InvalidDistance(_))
        ));
    }

    #[test]
    fn nan_distance_is_rejected() {
        let mut req = loop_request();
        req.distance_km = f64::NAN;
        assert!(matches!(
            req.validate(),
            Err(RequestError::InvalidDistance(_))
        ));
    }

    #[test]
    fn blank_start_is_rejected() {
        let mut req = loop_request();
        req.start_text = "   ".to_owned();
        assert!(matches!(req.validate(), Err(RequestError::MissingStart)));
    }

    #[test]
    fn point_to_point_requires_end() {
        let mut req = loop_request();
        req.topology = Topology::PointToPoint;
        assert!(matches!(req.validate(), Err(RequestError::MissingEnd)));

        req.end_text = Some("Copenhagen".to_owned());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn loop_rejects_end_location() {
        let mut req = loop_request();
        req.end_text = Some("Copenhagen".to_owned());
        assert!(matches!(req.validate(), Err(RequestError::UnexpectedEnd)));
    }

    #[test]
    fn direction_defaults_to_none_when_absent() {
        let req: RouteRequest = serde_json::from_value(serde_json::json!({
            "distanceKm": 40.0,
            "elevationTier": "flat",
            "terrain": "gravel",
            "topology": "loop",
            "startText": "Odense"
        }))
        .expect("request should deserialize");
        assert_eq!(req.direction, Direction::None);
    }

    #[test]
    fn tier_waypoints_match_expected_seeds() {
        assert_eq!(ElevationTier::Flat.initial_waypoints(), 3);
        assert_eq!(ElevationTier::Hilly.initial_waypoints(), 5);
        assert_eq!(ElevationTier::Mountainous.initial_waypoints(), 8);
    }

    #[test]
    fn bearing_mapping_matches_compass() {
        assert_eq!(Direction::North.bearing_degrees(), Some(0));
        assert_eq!(Direction::East.bearing_degrees(), Some(90));
        assert_eq!(Direction::South.bearing_degrees(), Some(180));
        assert_eq!(Direction::West.bearing_degrees(), Some(270));
        assert_eq!(Direction::None.bearing_degrees(), None);
    }
}
