//! HTTP presentation boundary over a shared [`AddressResolver`].
//!
//! A rendering layer (web page, mobile shell) binds its inputs to these
//! routes: one setter per editable field, the masked zip code setter, and a
//! snapshot of the form for display and the busy overlay.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::{FailureKind, LookupError};
use crate::form::{AddressForm, FormField};
use crate::resolver::AddressResolver;
use crate::types::Address;
use crate::zipcode;

/// Application state shared across all requests
#[derive(Clone)]
struct AppState {
    resolver: AddressResolver,
    metrics: Arc<Metrics>,
}

/// Server metrics
struct Metrics {
    total_requests: AtomicU64,
    lookups_started: AtomicU64,
    requests_in_flight: AtomicU64,
    start_time: Instant,
}

/// RAII guard for tracking in-flight requests
struct RequestGuard<'a>(&'a AtomicU64);

impl<'a> RequestGuard<'a> {
    fn enter(metrics: &'a Metrics) -> Self {
        metrics.total_requests.fetch_add(1, Ordering::Relaxed);
        metrics.requests_in_flight.fetch_add(1, Ordering::Relaxed);
        Self(&metrics.requests_in_flight)
    }
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Build the Axum application with routes and middleware
pub fn build_app(resolver: AddressResolver) -> Router {
    let metrics = Arc::new(Metrics {
        total_requests: AtomicU64::new(0),
        lookups_started: AtomicU64::new(0),
        requests_in_flight: AtomicU64::new(0),
        start_time: Instant::now(),
    });

    let state = AppState { resolver, metrics };

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Form routes
        .route("/api/form", get(get_form))
        .route("/api/form/zip-code", put(set_zip_code))
        .route("/api/form/:field", put(set_field))
        // Direct lookup
        .route("/api/cep/:code", get(lookup_cep))
        .route("/api/metrics", get(get_metrics))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn get_form(State(state): State<AppState>) -> Json<AddressForm> {
    let _guard = RequestGuard::enter(&state.metrics);
    Json(state.resolver.snapshot())
}

#[derive(Deserialize)]
struct FieldUpdate {
    value: String,
}

#[derive(Serialize)]
struct ZipCodeResponse {
    #[serde(flatten)]
    form: AddressForm,
    lookup_started: bool,
}

/// Masked zip code setter; a completing edit starts a lookup in the background
async fn set_zip_code(
    State(state): State<AppState>,
    Json(update): Json<FieldUpdate>,
) -> Json<ZipCodeResponse> {
    let _guard = RequestGuard::enter(&state.metrics);

    let lookup_started = state.resolver.on_zip_code_changed(&update.value).is_some();
    if lookup_started {
        state.metrics.lookups_started.fetch_add(1, Ordering::Relaxed);
    }

    Json(ZipCodeResponse {
        form: state.resolver.snapshot(),
        lookup_started,
    })
}

async fn set_field(
    State(state): State<AppState>,
    Path(field): Path<String>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<AddressForm>, ApiError> {
    let _guard = RequestGuard::enter(&state.metrics);

    let field = FormField::from_slug(&field)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown form field: {}", field)))?;
    state.resolver.set_field(field, update.value);

    Ok(Json(state.resolver.snapshot()))
}

/// Look up a postal code without touching the form
async fn lookup_cep(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LookupResponse>, ApiError> {
    let _guard = RequestGuard::enter(&state.metrics);
    state.metrics.lookups_started.fetch_add(1, Ordering::Relaxed);

    let normalized = zipcode::normalize_code(&code);
    tracing::info!("Direct lookup for postal code {}", normalized);

    let address = state
        .resolver
        .client()
        .lookup(&normalized)
        .await
        .map_err(ApiError::from_lookup)?;

    Ok(Json(LookupResponse {
        success: true,
        data: address,
    }))
}

#[derive(Serialize)]
struct LookupResponse {
    success: bool,
    data: Address,
}

/// Get server metrics
async fn get_metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        total_requests: state.metrics.total_requests.load(Ordering::Relaxed),
        lookups_started: state.metrics.lookups_started.load(Ordering::Relaxed),
        requests_in_flight: state.metrics.requests_in_flight.load(Ordering::Relaxed),
        uptime_seconds: state.metrics.start_time.elapsed().as_secs(),
    })
}

#[derive(Serialize)]
struct MetricsResponse {
    total_requests: u64,
    lookups_started: u64,
    requests_in_flight: u64,
    uptime_seconds: u64,
}

/// API error types
enum ApiError {
    BadRequest(String),
    NotFound(String),
    BadGateway(String),
}

impl ApiError {
    fn from_lookup(err: LookupError) -> Self {
        match (&err, err.kind()) {
            (LookupError::InvalidCode { .. }, _) => ApiError::BadRequest(err.to_string()),
            (_, FailureKind::LookupNotFound) => ApiError::NotFound(err.to_string()),
            (_, FailureKind::TransportFailure) => {
                tracing::error!("Lookup error: {}", err);
                ApiError::BadGateway(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(serde_json::json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}
