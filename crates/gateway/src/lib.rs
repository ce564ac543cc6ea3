#![forbid(unsafe_code)]

//! HTTP REST gateway for the exercise store.
//!
//! A stateless façade: each handler parses the request, calls the
//! [`ExerciseStore`] it was constructed with, and maps the result straight
//! onto an HTTP status. No retries, no caching, no cross-request state
//! beyond the store handle itself. Until that handle is attached every
//! `/api/*` request fails fast with 503 — the startup race, not steady
//! state.

mod limit;

use anyhow::Result;
use axum::{
    async_trait,
    error_handling::HandleErrorLayer,
    extract::{FromRequest, Path, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use ipnetwork::IpNetwork;
use limit::{rate_limit_middleware, IpLimiter};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use sortlab_api::ExerciseStore;
use sortlab_telemetry::metrics::{install_http_metrics, metrics_handler, observe_request};
use sortlab_types::{CreateExercise, Exercise, ExerciseId, ExercisePatch, ServiceConfig, StoreError};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tower::{
    limit::ConcurrencyLimitLayer, load_shed::LoadShedLayer, timeout::TimeoutLayer, BoxError,
    ServiceBuilder,
};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

// --- Error Handling ---

/// Request-level failures, mapped onto the wire contract: every non-2xx
/// response body is `{"error": <message>}`.
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Unavailable(String),
    Internal(anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidId(_) => Self::BadRequest(e.to_string()),
            StoreError::NotFound => Self::NotFound(e.to_string()),
            StoreError::Unavailable => Self::Unavailable(e.to_string()),
            StoreError::Backend(_) | StoreError::Encode(_) | StoreError::Decode(_) => {
                Self::Internal(anyhow::Error::new(e))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AppError::BadRequest(s) => (StatusCode::BAD_REQUEST, s),
            AppError::NotFound(s) => (StatusCode::NOT_FOUND, s),
            AppError::Unavailable(s) => (StatusCode::SERVICE_UNAVAILABLE, s),
            AppError::Internal(e) => {
                tracing::error!(target: "gateway", "Internal error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

/// A `Json` extractor whose rejections honor the wire contract: malformed
/// or mistyped request bodies come back as `{"error": <message>}` with a
/// 400, not axum's plain-text rejection.
struct ApiJson<T>(T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

// --- Shared State ---

/// State shared by every handler: the store handle, attached once the
/// backend connection is established.
#[derive(Default)]
pub struct GatewayState {
    store: OnceCell<Arc<dyn ExerciseStore>>,
}

impl GatewayState {
    /// A state with no store yet; `/api/*` requests return 503 until
    /// [`attach_store`](Self::attach_store) runs.
    pub fn new() -> Self {
        Self::default()
    }

    /// A state with the store already attached (tests, synchronous startup).
    pub fn with_store(store: Arc<dyn ExerciseStore>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(store);
        Self { store: cell }
    }

    /// Attaches the store. Returns false if one was already attached.
    pub fn attach_store(&self, store: Arc<dyn ExerciseStore>) -> bool {
        self.store.set(store).is_ok()
    }

    fn store(&self) -> Result<&Arc<dyn ExerciseStore>, AppError> {
        self.store
            .get()
            .ok_or_else(|| AppError::from(StoreError::Unavailable))
    }
}

// --- Handlers ---

/// Records the per-route metrics for a finished handler call.
fn track<T>(
    route: &'static str,
    method: &'static str,
    started: Instant,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    let label = if result.is_ok() { "ok" } else { "error" };
    observe_request(route, method, label, started);
    result
}

async fn create_exercise(
    State(state): State<Arc<GatewayState>>,
    ApiJson(payload): ApiJson<CreateExercise>,
) -> Result<(StatusCode, Json<Exercise>), AppError> {
    let started = Instant::now();
    let result = async {
        let created = state.store()?.insert(payload).await?;
        tracing::debug!(target: "gateway", id = %created.id, "created exercise");
        Ok((StatusCode::CREATED, Json(created)))
    }
    .await;
    track("/api/exercises", "POST", started, result)
}

async fn list_exercises(
    State(state): State<Arc<GatewayState>>,
) -> Result<Json<Vec<Exercise>>, AppError> {
    let started = Instant::now();
    let result = async { Ok(Json(state.store()?.list().await?)) }.await;
    track("/api/exercises", "GET", started, result)
}

async fn get_exercise(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
) -> Result<Json<Exercise>, AppError> {
    let started = Instant::now();
    let result = async {
        let store = state.store()?;
        let id = ExerciseId::from_str(&id)?;
        Ok(Json(store.get(&id).await?))
    }
    .await;
    track("/api/exercises/:id", "GET", started, result)
}

async fn update_exercise(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ExercisePatch>,
) -> Result<Json<Exercise>, AppError> {
    let started = Instant::now();
    let result = async {
        let store = state.store()?;
        let id = ExerciseId::from_str(&id)?;
        Ok(Json(store.update(&id, patch).await?))
    }
    .await;
    track("/api/exercises/:id", "PUT", started, result)
}

async fn delete_exercise(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let started = Instant::now();
    let result = async {
        let store = state.store()?;
        let id = ExerciseId::from_str(&id)?;
        store.delete(&id).await?;
        Ok(Json(serde_json::json!({
            "success": true,
            "message": "Exercise deleted successfully"
        })))
    }
    .await;
    track("/api/exercises/:id", "DELETE", started, result)
}

// Small helper used by HandleErrorLayer to produce structured responses.
async fn map_middleware_error(err: BoxError) -> impl IntoResponse {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(serde_json::json!({ "error": "request timed out" })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
    }
}

// --- Router / Server ---

/// Builds the service router. Fails only on unusable configuration (a
/// `client_origin` that is not a valid header value).
pub fn router(state: Arc<GatewayState>, config: &ServiceConfig) -> Result<Router> {
    let cidrs: Arc<Vec<IpNetwork>> = Arc::new(
        config
            .trusted_proxies
            .iter()
            .filter_map(|s| IpNetwork::from_str(s).ok())
            .collect(),
    );
    let limiter = IpLimiter::new(config.rps, config.burst, cidrs);

    let origin: HeaderValue = config
        .client_origin
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid client_origin {:?}: {e}", config.client_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Ok(Router::new()
        .route("/api/exercises", post(create_exercise).get(list_exercises))
        .route(
            "/api/exercises/:id",
            get(get_exercise).put(update_exercise).delete(delete_exercise),
        )
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ))
        .with_state(state)
        // Apply layers. The order is important: `HandleErrorLayer` must wrap
        // the fallible layers to make the service infallible.
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(map_middleware_error))
                .layer(LoadShedLayer::new())
                .layer(ConcurrencyLimitLayer::new(128))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.request_timeout_secs,
                ))),
        )
        // These layers are infallible and can be applied outside the
        // error-handling wrapper.
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(config.body_limit_kb * 1024))
        .layer(cors))
}

/// Runs the gateway until the shutdown channel fires.
pub async fn run_server(
    config: &ServiceConfig,
    state: Arc<GatewayState>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    install_http_metrics();

    let app = router(state, config)?;
    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(target: "gateway", "exercise API listening on {}", addr);

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_rx.changed().await.ok();
        tracing::info!(target: "gateway", "shutting down gracefully");
    });

    if let Err(e) = server.await {
        tracing::error!(target: "gateway", error = %e, "server error");
    }

    Ok(())
}

#[cfg(test)]
mod tests;
