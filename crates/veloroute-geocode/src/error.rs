use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "could not resolve location \"{query}\" after trying {candidates_tried} variants; \
         try a larger town or add a region qualifier"
    )]
    Unresolvable {
        query: String,
        candidates_tried: usize,
    },

    #[error("geocoding result has malformed coordinates: {reason}")]
    MalformedCoordinates { reason: String },

    #[error("invalid geocoder URL: {0}")]
    InvalidUrl(String),
}
