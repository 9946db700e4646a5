//! The parameter-convergence search.
//!
//! The directions provider accepts a target length, waypoint count, seed, and
//! bearing, but offers no way to ask for "a route of exactly X km", and its
//! response length is not linear in the target length. This module searches
//! that parameter space: call the provider, measure the distance error,
//! over-correct the target length, and repeat until the result lands inside
//! the tolerance band or attempts run out. The best candidate seen is always
//! retained, so exhaustion still yields the closest known route.

use rand::Rng;

use veloroute_core::{ElevationTier, RouteCandidate, SearchOutcome, SearchParameters};
use veloroute_directions::{DirectionsError, DirectionsProvider, ProviderRoute, RoutePlan};

/// What the search is converging on: a distance and a climb expectation.
#[derive(Debug, Clone, Copy)]
pub struct SearchTarget {
    pub distance_km: f64,
    pub tier: ElevationTier,
}

/// Distance error at or under this fraction is accepted immediately.
pub const DISTANCE_TOLERANCE: f64 = 0.05;

/// Exponent applied to the naive `requested / actual` correction factor.
/// Over-correcting on purpose escapes the slow convergence a provider with a
/// sub-linear length response would otherwise cause.
const CORRECTION_EXPONENT: f64 = 1.2;

/// Attempt cap for loop routes. Point-to-point routes get exactly one
/// attempt: with both endpoints fixed there is no length knob to tune.
const MAX_LOOP_ATTEMPTS: u32 = 10;

/// Seeds are re-randomized within `[seed_base, seed_base + SEED_JITTER)` on
/// every attempt so a retry never replays a poor local solution.
const SEED_JITTER: u64 = 50;

/// A candidate is "too flat" when its climb falls below this fraction of the
/// tier's low-end expectation, and earns the search an extra waypoint.
const ELEVATION_SHORTFALL_FACTOR: f64 = 0.6;

/// Terminal report of one search: where it ended, what it found, and how
/// many provider attempts it took.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub outcome: SearchOutcome,
    pub candidate: RouteCandidate,
    pub attempts: u32,
}

/// Pure transition decision for one observed candidate.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Verdict {
    /// Inside the tolerance band; stop here.
    Accept,
    /// Outside the band; try again with these corrected parameters.
    Adjust(SearchParameters),
}

/// Decides, from one provider response, whether the search is done or how
/// its parameters should move. Pure: no provider, no randomness; the seed
/// of the adjusted parameters is re-randomized by the caller.
pub(crate) fn verdict(
    target: &SearchTarget,
    params: &SearchParameters,
    actual_km: f64,
    elevation_gain_m: f64,
) -> Verdict {
    if distance_error_fraction(target.distance_km, actual_km) <= DISTANCE_TOLERANCE {
        return Verdict::Accept;
    }

    let mut next = *params;

    let factor = (target.distance_km / actual_km).powf(CORRECTION_EXPONENT);
    next.target_length_m = (params.target_length_m * factor).clamp(
        SearchParameters::MIN_TARGET_LENGTH_M,
        SearchParameters::MAX_TARGET_LENGTH_M,
    );

    let expected_low_gain = target.tier.low_end_climb_rate() * target.distance_km;
    if elevation_gain_m < expected_low_gain * ELEVATION_SHORTFALL_FACTOR {
        next.waypoint_count = (next.waypoint_count + 1).min(SearchParameters::MAX_WAYPOINTS);
    }

    Verdict::Adjust(next)
}

pub(crate) fn distance_error_fraction(requested_km: f64, actual_km: f64) -> f64 {
    (actual_km - requested_km).abs() / requested_km
}

/// Initial parameters for a search: target length straight from the request,
/// waypoints seeded by the elevation tier, seed left for the loop to fill.
pub(crate) fn initial_parameters(target: &SearchTarget, bearing: Option<u16>) -> SearchParameters {
    SearchParameters {
        target_length_m: (target.distance_km * 1_000.0).clamp(
            SearchParameters::MIN_TARGET_LENGTH_M,
            SearchParameters::MAX_TARGET_LENGTH_M,
        ),
        waypoint_count: target
            .tier
            .initial_waypoints()
            .clamp(SearchParameters::MIN_WAYPOINTS, SearchParameters::MAX_WAYPOINTS),
        seed: 0,
        bearing_degrees: bearing,
    }
}

fn candidate_from(route: ProviderRoute, target: &SearchTarget, params: SearchParameters) -> RouteCandidate {
    let distance_km = route.distance_m / 1_000.0;
    #[allow(clippy::cast_precision_loss)]
    let duration_min = route.time_ms as f64 / 60_000.0;
    RouteCandidate {
        path: route.path,
        distance_km,
        elevation_gain_m: route.elevation_gain_m,
        duration_min,
        gpx: String::new(),
        distance_error_fraction: distance_error_fraction(target.distance_km, distance_km),
        params_used: params,
    }
}

/// Drives the convergence loop against a [`DirectionsProvider`].
pub struct ParameterSearch<'a, P> {
    provider: &'a P,
}

impl<'a, P: DirectionsProvider> ParameterSearch<'a, P> {
    #[must_use]
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Runs one search. `plan` carries the anchors, vehicle, and bearing;
    /// its length/waypoint/seed parameters are owned by the search from here
    /// on. `seed_base` anchors the per-attempt seed jitter so distinct
    /// variants explore distinct geometry.
    ///
    /// Fatal provider errors abort only the attempt they occur in; the
    /// search moves on with a fresh seed. The search as a whole fails only
    /// when every attempt erred and there is no best-so-far to fall back on.
    ///
    /// # Errors
    ///
    /// Returns the last provider error when no attempt yielded a candidate.
    pub async fn run(
        &self,
        target: &SearchTarget,
        mut plan: RoutePlan,
        seed_base: u64,
    ) -> Result<SearchResult, DirectionsError> {
        plan.params = initial_parameters(target, plan.params.bearing_degrees);

        let max_attempts = if plan.is_round_trip() {
            MAX_LOOP_ATTEMPTS
        } else {
            1
        };

        let mut best: Option<RouteCandidate> = None;
        let mut last_error: Option<DirectionsError> = None;
        let mut attempts = 0u32;

        while attempts < max_attempts {
            attempts += 1;
            plan.params.seed = reseed(seed_base);

            let route = match self.provider.route(&plan).await {
                Ok(route) => route,
                Err(err) => {
                    tracing::warn!(
                        attempt = attempts,
                        max_attempts,
                        error = %err,
                        "route attempt failed"
                    );
                    last_error = Some(err);
                    continue;
                }
            };

            let candidate = candidate_from(route, target, plan.params);
            tracing::debug!(
                attempt = attempts,
                actual_km = candidate.distance_km,
                error_fraction = candidate.distance_error_fraction,
                elevation_gain_m = candidate.elevation_gain_m,
                "route attempt measured"
            );

            let is_new_best = best
                .as_ref()
                .is_none_or(|b| candidate.distance_error_fraction < b.distance_error_fraction);

            match verdict(
                target,
                &plan.params,
                candidate.distance_km,
                candidate.elevation_gain_m,
            ) {
                Verdict::Accept => {
                    tracing::info!(
                        attempt = attempts,
                        actual_km = candidate.distance_km,
                        error_fraction = candidate.distance_error_fraction,
                        "route accepted within tolerance"
                    );
                    return Ok(SearchResult {
                        outcome: SearchOutcome::Accepted,
                        candidate,
                        attempts,
                    });
                }
                Verdict::Adjust(next) => {
                    tracing::debug!(
                        target_length_m = next.target_length_m,
                        waypoint_count = next.waypoint_count,
                        "adjusting search parameters"
                    );
                    plan.params = next;
                }
            }

            if is_new_best {
                best = Some(candidate);
            }
        }

        match best {
            Some(candidate) => {
                tracing::info!(
                    attempts,
                    error_fraction = candidate.distance_error_fraction,
                    "search exhausted, returning best-known candidate"
                );
                Ok(SearchResult {
                    outcome: SearchOutcome::Exhausted,
                    candidate,
                    attempts,
                })
            }
            None => Err(last_error.unwrap_or(DirectionsError::EmptyPaths)),
        }
    }
}

fn reseed(seed_base: u64) -> u64 {
    seed_base + rand::rng().random_range(0..SEED_JITTER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loop_plan, scripted_provider, scripted_route, target};
    use veloroute_core::{ElevationTier, LatLng, SearchParameters};
    use veloroute_directions::RoutePlan;

    fn params(target_length_m: f64, waypoint_count: u8) -> SearchParameters {
        SearchParameters {
            target_length_m,
            waypoint_count,
            seed: 0,
            bearing_degrees: None,
        }
    }

    #[test]
    fn verdict_accepts_within_tolerance() {
        let t = target(50.0, ElevationTier::Hilly);
        let p = params(50_000.0, 5);
        assert_eq!(verdict(&t, &p, 49.8, 300.0), Verdict::Accept);
        assert_eq!(verdict(&t, &p, 52.5, 300.0), Verdict::Accept);
    }

    #[test]
    fn verdict_rejects_just_outside_tolerance() {
        let t = target(50.0, ElevationTier::Hilly);
        let p = params(50_000.0, 5);
        assert!(matches!(verdict(&t, &p, 53.0, 300.0), Verdict::Adjust(_)));
    }

    #[test]
    fn correction_over_corrects_with_exponent() {
        let t = target(50.0, ElevationTier::Flat);
        let p = params(50_000.0, 3);
        let Verdict::Adjust(next) = verdict(&t, &p, 80.0, 0.0) else {
            panic!("80 km against 50 km must adjust");
        };
        // (50/80)^1.2 ≈ 0.5693, deliberately below the linear 0.625.
        let expected = 50_000.0 * (50.0f64 / 80.0).powf(1.2);
        assert!((next.target_length_m - expected).abs() < 1.0);
        assert!(next.target_length_m < 50_000.0 * 0.625);
    }

    #[test]
    fn corrected_target_length_is_clamped_low() {
        let t = target(2.0, ElevationTier::Flat);
        let p = params(1_200.0, 3);
        let Verdict::Adjust(next) = verdict(&t, &p, 40.0, 0.0) else {
            panic!("must adjust");
        };
        assert!((next.target_length_m - 1_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn corrected_target_length_is_clamped_high() {
        let t = target(280.0, ElevationTier::Flat);
        let p = params(280_000.0, 3);
        let Verdict::Adjust(next) = verdict(&t, &p, 100.0, 0.0) else {
            panic!("must adjust");
        };
        assert!((next.target_length_m - 300_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn flat_routes_never_earn_extra_waypoints() {
        let t = target(50.0, ElevationTier::Flat);
        let p = params(50_000.0, 3);
        let Verdict::Adjust(next) = verdict(&t, &p, 80.0, 0.0) else {
            panic!("must adjust");
        };
        assert_eq!(next.waypoint_count, 3);
    }

    #[test]
    fn hilly_shortfall_bumps_waypoints() {
        let t = target(50.0, ElevationTier::Hilly);
        let p = params(50_000.0, 5);
        // Low end for hilly is 8 m/km: 50 km → 400 m, shortfall line at 240 m.
        let Verdict::Adjust(next) = verdict(&t, &p, 80.0, 100.0) else {
            panic!("must adjust");
        };
        assert_eq!(next.waypoint_count, 6);

        let Verdict::Adjust(kept) = verdict(&t, &p, 80.0, 300.0) else {
            panic!("must adjust");
        };
        assert_eq!(kept.waypoint_count, 5);
    }

    #[test]
    fn waypoint_bump_caps_at_ten() {
        let t = target(50.0, ElevationTier::Mountainous);
        let p = params(50_000.0, 10);
        let Verdict::Adjust(next) = verdict(&t, &p, 80.0, 0.0) else {
            panic!("must adjust");
        };
        assert_eq!(next.waypoint_count, 10);
    }

    #[test]
    fn initial_parameters_derive_from_tier_and_distance() {
        let p = initial_parameters(&target(50.0, ElevationTier::Mountainous), Some(180));
        assert!((p.target_length_m - 50_000.0).abs() < f64::EPSILON);
        assert_eq!(p.waypoint_count, 8);
        assert_eq!(p.bearing_degrees, Some(180));
    }

    #[tokio::test]
    async fn accepts_first_candidate_within_tolerance() {
        let provider = scripted_provider(vec![Ok(scripted_route(49_800.0, 310.0))]);
        let search = ParameterSearch::new(&provider);
        let result = search
            .run(&target(50.0, ElevationTier::Hilly), loop_plan(), 100)
            .await
            .expect("search should succeed");

        assert_eq!(result.outcome, SearchOutcome::Accepted);
        assert_eq!(result.attempts, 1);
        assert_eq!(provider.calls(), 1);
        assert!(result.candidate.distance_error_fraction <= DISTANCE_TOLERANCE);
        assert!((result.candidate.distance_error_fraction - 0.004).abs() < 1e-9);
    }

    #[tokio::test]
    async fn exhaustion_returns_minimum_error_candidate() {
        // Ten attempts, never inside tolerance; the best (60 km against
        // 50 km) sits in the middle, with worse ones after it.
        let mut script: Vec<_> = vec![
            Ok(scripted_route(80_000.0, 0.0)),
            Ok(scripted_route(72_000.0, 0.0)),
            Ok(scripted_route(60_000.0, 0.0)),
        ];
        for _ in 0..7 {
            script.push(Ok(scripted_route(75_000.0, 0.0)));
        }

        let provider = scripted_provider(script);
        let search = ParameterSearch::new(&provider);
        let result = search
            .run(&target(50.0, ElevationTier::Flat), loop_plan(), 100)
            .await
            .expect("search should fall back to best-so-far");

        assert_eq!(result.outcome, SearchOutcome::Exhausted);
        assert_eq!(result.attempts, 10);
        assert_eq!(provider.calls(), 10);
        assert!((result.candidate.distance_km - 60.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn provider_that_never_converges_exhausts_at_cap() {
        let script = (0..10).map(|_| Ok(scripted_route(80_000.0, 0.0))).collect();
        let provider = scripted_provider(script);
        let search = ParameterSearch::new(&provider);
        let result = search
            .run(&target(50.0, ElevationTier::Flat), loop_plan(), 100)
            .await
            .expect("search should return best-so-far");

        assert_eq!(result.outcome, SearchOutcome::Exhausted);
        assert_eq!(provider.calls(), 10);
        assert!((result.candidate.distance_km - 80.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn point_to_point_makes_exactly_one_attempt() {
        let mut plan = loop_plan();
        plan.end = Some(LatLng {
            lat: 55.6761,
            lng: 12.5683,
        });
        // Way off target, but point-to-point has no length knob to tune.
        let provider = scripted_provider(vec![Ok(scripted_route(80_000.0, 120.0))]);
        let search = ParameterSearch::new(&provider);
        let result = search
            .run(&target(50.0, ElevationTier::Flat), plan, 100)
            .await
            .expect("search should succeed");

        assert_eq!(provider.calls(), 1);
        assert_eq!(result.attempts, 1);
        assert_eq!(result.outcome, SearchOutcome::Exhausted);
    }

    #[tokio::test]
    async fn fatal_attempt_is_skipped_not_terminal() {
        let provider = scripted_provider(vec![
            Err(veloroute_directions::DirectionsError::EmptyPaths),
            Ok(scripted_route(49_900.0, 200.0)),
        ]);
        let search = ParameterSearch::new(&provider);
        let result = search
            .run(&target(50.0, ElevationTier::Hilly), loop_plan(), 100)
            .await
            .expect("second attempt should succeed");

        assert_eq!(result.outcome, SearchOutcome::Accepted);
        assert_eq!(result.attempts, 2);
    }

    #[tokio::test]
    async fn all_attempts_fatal_is_an_error() {
        let script = (0..10)
            .map(|_| Err(veloroute_directions::DirectionsError::EmptyPaths))
            .collect();
        let provider = scripted_provider(script);
        let search = ParameterSearch::new(&provider);
        let result = search
            .run(&target(50.0, ElevationTier::Flat), loop_plan(), 100)
            .await;

        assert!(result.is_err());
        assert_eq!(provider.calls(), 10);
    }

    #[tokio::test]
    async fn seeds_stay_within_the_variant_window() {
        let script = (0..10).map(|_| Ok(scripted_route(80_000.0, 0.0))).collect();
        let provider = scripted_provider(script);
        let search = ParameterSearch::new(&provider);
        search
            .run(&target(50.0, ElevationTier::Flat), loop_plan(), 300)
            .await
            .expect("search should run");

        for plan in provider.recorded_plans() {
            assert!((300..350).contains(&plan.params.seed), "seed {} outside window", plan.params.seed);
        }
    }
}
