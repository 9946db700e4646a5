//! Final assembly of a caller-facing route record.
//!
//! Pure transformation: descriptive fields come from the request, geometry
//! and export payload from the search's candidate. No I/O and no failure
//! modes of its own.

use uuid::Uuid;

use veloroute_core::{Difficulty, ResolvedLocation, RouteRequest, RouteResult, Topology};

use crate::search::SearchResult;

/// Merges the request's descriptive fields with a search result into the
/// record handed back to the caller. `variant_index` is 1-based; only
/// indices above 1 get a variant suffix in the name.
#[must_use]
pub fn assemble_result(
    request: &RouteRequest,
    start: &ResolvedLocation,
    variant_index: u32,
    search: SearchResult,
) -> RouteResult {
    RouteResult {
        id: Uuid::new_v4(),
        name: route_name(request, variant_index),
        description: route_description(request),
        difficulty: Difficulty::from_distance_km(request.distance_km),
        estimated_time: estimated_time(search.candidate.duration_min),
        start_point: start.display_name.clone(),
        outcome: search.outcome,
        requested_distance_km: request.distance_km,
        candidate: search.candidate,
    }
}

fn route_name(request: &RouteRequest, variant_index: u32) -> String {
    let base = match request.topology {
        Topology::Loop => format!("{} Loop", request.start_text),
        Topology::PointToPoint => format!(
            "{} to {}",
            request.start_text,
            request.end_text.as_deref().unwrap_or_default()
        ),
    };
    if variant_index > 1 {
        format!("{base} (variant {variant_index})")
    } else {
        base
    }
}

fn route_description(request: &RouteRequest) -> String {
    let mut description = format!(
        "A {} route of about {:.0} km",
        request.terrain.label(),
        request.distance_km
    );
    if let Some(direction) = request.direction.label() {
        description.push_str(&format!(" heading {direction}"));
    }
    description
}

/// Rough ride time for display: whole hours above one hour, minutes below.
fn estimated_time(duration_min: f64) -> String {
    if duration_min < 60.0 {
        format!("{} min", duration_min.round())
    } else {
        format!("{} h", (duration_min / 60.0).round())
    }
}
