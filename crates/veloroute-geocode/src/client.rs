//! HTTP client for the Nominatim-style geocoding provider, and the
//! fallback-driven location resolver built on top of it.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use veloroute_core::{LatLng, ResolvedLocation};

use crate::candidates::geocode_candidates;
use crate::error::GeocodeError;
use crate::limiter::RateLimiter;

const RESULT_LIMIT: u32 = 3;
const ACCEPT_LANGUAGE: &str = "da,en";

/// One entry of the provider's search response. Coordinates arrive as
/// strings and are parsed on conversion.
#[derive(Debug, Deserialize)]
pub struct GeocodePlace {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

impl GeocodePlace {
    fn coords(&self) -> Result<LatLng, GeocodeError> {
        let lat = self
            .lat
            .parse::<f64>()
            .map_err(|e| GeocodeError::MalformedCoordinates {
                reason: format!("lat \"{}\": {e}", self.lat),
            })?;
        let lng = self
            .lon
            .parse::<f64>()
            .map_err(|e| GeocodeError::MalformedCoordinates {
                reason: format!("lon \"{}\": {e}", self.lon),
            })?;
        Ok(LatLng { lat, lng })
    }
}

/// Thin client for the geocoding provider's `/search` endpoint.
///
/// Use [`GeocodeClient::new`] for production or point `base_url` at a mock
/// server in tests.
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
}

impl GeocodeClient {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Keep exactly one trailing slash so joined paths land under the
        // base rather than replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GeocodeError::InvalidUrl(format!("'{base_url}': {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Submits one search query and returns the provider's candidate list.
    ///
    /// An empty list is a valid response; deciding what to do about it is
    /// the resolver's job.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or a non-2xx status.
    /// - [`GeocodeError::Deserialize`] if the body is not the expected JSON.
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodePlace>, GeocodeError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| GeocodeError::InvalidUrl(format!("cannot build search URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", &RESULT_LIMIT.to_string());

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
            context: format!("geocode search(q={query})"),
            source: e,
        })
    }
}

/// Resolves free-text place names to coordinates, trying the fixed candidate
/// sequence from [`geocode_candidates`] and serializing all provider calls
/// through a shared [`RateLimiter`].
pub struct LocationResolver {
    client: GeocodeClient,
    limiter: Arc<RateLimiter>,
    region_qualifier: String,
}

impl LocationResolver {
    #[must_use]
    pub fn new(client: GeocodeClient, limiter: Arc<RateLimiter>, region_qualifier: String) -> Self {
        Self {
            client,
            limiter,
            region_qualifier,
        }
    }

    /// Resolves `text` to a location, stopping at the first candidate query
    /// that yields a usable hit.
    ///
    /// A failed candidate (non-2xx, malformed body, empty result list, or
    /// unparseable coordinates) is logged and skipped, never fatal on its
    /// own; resolution fails only once every candidate has been tried.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Unresolvable`] when the candidate list is
    /// exhausted without a hit.
    pub async fn resolve(&self, text: &str) -> Result<ResolvedLocation, GeocodeError> {
        let candidates = geocode_candidates(text, &self.region_qualifier);
        let candidates_tried = candidates.len();

        for candidate in candidates {
            self.limiter.acquire().await;

            let places = match self.client.search(&candidate).await {
                Ok(places) => places,
                Err(err) => {
                    tracing::warn!(candidate = %candidate, error = %err, "geocode candidate failed");
                    continue;
                }
            };

            let Some(place) = places.first() else {
                tracing::debug!(candidate = %candidate, "geocode candidate returned no results");
                continue;
            };

            match place.coords() {
                Ok(coords) => {
                    tracing::info!(
                        candidate = %candidate,
                        display_name = %place.display_name,
                        "location resolved"
                    );
                    return Ok(ResolvedLocation {
                        coords,
                        display_name: place.display_name.clone(),
                        matched_candidate: candidate,
                    });
                }
                Err(err) => {
                    tracing::warn!(candidate = %candidate, error = %err, "geocode hit unusable");
                }
            }
        }

        Err(GeocodeError::Unresolvable {
            query: text.to_owned(),
            candidates_tried,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_coords_parse_valid_strings() {
        let place = GeocodePlace {
            lat: "55.6415".to_owned(),
            lon: "12.0803".to_owned(),
            display_name: "Roskilde, Denmark".to_owned(),
        };
        let coords = place.coords().expect("coords should parse");
        assert!((coords.lat - 55.6415).abs() < 1e-9);
        assert!((coords.lng - 12.0803).abs() < 1e-9);
    }

    #[test]
    fn place_coords_reject_garbage() {
        let place = GeocodePlace {
            lat: "north-ish".to_owned(),
            lon: "12.0".to_owned(),
            display_name: "nowhere".to_owned(),
        };
        assert!(matches!(
            place.coords(),
            Err(GeocodeError::MalformedCoordinates { .. })
        ));
    }
}
