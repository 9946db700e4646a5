use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use veloroute_core::{RouteRequest, RouteResult};
use veloroute_directions::{DirectionsClient, DirectionsProvider};
use veloroute_engine::{EngineError, RouteEngine};
use veloroute_geocode::GeocodeError;

pub struct AppState<P = DirectionsClient> {
    pub engine: Arc<RouteEngine<P>>,
    pub generation_timeout: Duration,
}

// Derived Clone would demand P: Clone; the engine is behind an Arc.
impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            generation_timeout: self.generation_timeout,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<RouteResult>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "invalid_request" => StatusCode::BAD_REQUEST,
            "unresolvable_location" => StatusCode::UNPROCESSABLE_ENTITY,
            "upstream_failed" => StatusCode::BAD_GATEWAY,
            "timeout" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_app<P: DirectionsProvider + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/routes", post(generate_routes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthData { status: "ok" }))
}

async fn generate_routes<P: DirectionsProvider>(
    State(state): State<AppState<P>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RoutesResponse>, ApiError> {
    let generation = state.engine.generate(&request);
    let routes = match tokio::time::timeout(state.generation_timeout, generation).await {
        Ok(result) => result.map_err(map_engine_error)?,
        Err(_elapsed) => {
            tracing::warn!(
                timeout_secs = state.generation_timeout.as_secs(),
                "route generation timed out"
            );
            return Err(ApiError::new(
                "timeout",
                "route generation did not finish in time",
            ));
        }
    };
    Ok(Json(RoutesResponse { routes }))
}

fn map_engine_error(error: EngineError) -> ApiError {
    match &error {
        EngineError::InvalidRequest(_) => ApiError::new("invalid_request", error.to_string()),
        EngineError::Geocode(GeocodeError::Unresolvable { .. }) => {
            ApiError::new("unresolvable_location", error.to_string())
        }
        EngineError::Geocode(_)
        | EngineError::Directions(_)
        | EngineError::AllVariantsFailed { .. } => {
            tracing::error!(error = %error, "route generation failed");
            ApiError::new("upstream_failed", error.to_string())
        }
    }
}
