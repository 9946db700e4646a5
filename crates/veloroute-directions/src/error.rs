use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transient directions provider error: HTTP {status}")]
    Transient { status: u16 },

    #[error("directions provider rejected the request: HTTP {status}: {body}")]
    Fatal { status: u16, body: String },

    #[error("directions provider returned no usable paths")]
    EmptyPaths,

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid directions URL: {0}")]
    InvalidUrl(String),
}

impl DirectionsError {
    /// Transient faults are worth one more try; everything else indicates a
    /// request the provider will keep rejecting.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            DirectionsError::Transient { .. } => true,
            DirectionsError::Http(e) => e.is_timeout() || e.is_connect(),
            DirectionsError::Fatal { .. }
            | DirectionsError::EmptyPaths
            | DirectionsError::Deserialize { .. }
            | DirectionsError::InvalidUrl(_) => false,
        }
    }
}
