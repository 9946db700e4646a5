//! Query-variant generation for location resolution.
//!
//! A free-text place name is tried against the geocoding provider in a fixed
//! sequence of variants, from most to least specific, stopping at the first
//! one that yields a hit.

/// Builds the ordered candidate queries for `input`, given the configured
/// region qualifier (e.g. `"Denmark"`):
///
/// 1. the raw trimmed input;
/// 2. the input with `", <qualifier>"` appended, unless the qualifier is
///    already present (case-insensitive substring check);
/// 3. if the input has comma-separated components, the last component alone;
/// 4. the last component with the qualifier appended, under the same guard.
///
/// An empty or whitespace-only input yields no candidates.
#[must_use]
pub fn geocode_candidates(input: &str, region_qualifier: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let base = input.trim();
    if base.is_empty() {
        return candidates;
    }

    let qualifier_lower = region_qualifier.to_lowercase();
    let has_qualifier = |s: &str| s.to_lowercase().contains(&qualifier_lower);

    candidates.push(base.to_owned());
    if !has_qualifier(base) {
        candidates.push(format!("{base}, {region_qualifier}"));
    }

    let parts: Vec<&str> = base
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() > 1 {
        if let Some(last) = parts.last() {
            candidates.push((*last).to_owned());
            if !has_qualifier(last) {
                candidates.push(format!("{last}, {region_qualifier}"));
            }
        }
    }

    candidates
}
