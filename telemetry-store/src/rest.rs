use crate::errors::{Error, Result};
use crate::metrics::{
    gather_metrics, RECORDS_DELETED_TOTAL, RECORDS_INGESTED_TOTAL, RECORDS_REJECTED_TOTAL,
    STORE_FAILURES_TOTAL, STORE_LATENCY_SECONDS,
};
use crate::model::{GpsPageResponse, GpsPayload, IngestResponse, MessageResponse};
use crate::pagination::{PageQuery, Pagination};
use crate::store::GpsStore;
use crate::validate::{validate, ValidationMode};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

const MAX_BODY_BYTES: usize = 100 * 1024;

/// Handler context: the shared store plus request policy
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GpsStore>,
    pub validation: ValidationMode,
}

impl AppState {
    pub fn new(store: Arc<dyn GpsStore>, validation: ValidationMode) -> Self {
        Self { store, validation }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/gps", post(ingest_gps))
        .route("/api/get", get(list_gps))
        .route("/api/delete-all", delete(delete_all_gps))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ingest_gps(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GpsPayload>, JsonRejection>,
) -> std::result::Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        debug!("Rejected ingest body: {}", rejection.body_text());
        RECORDS_REJECTED_TOTAL.inc();
        ApiError::Validation("Invalid JSON body".to_string())
    })?;

    debug!(?payload, "Received GPS reading");

    let reading = validate(&payload, state.validation).map_err(|e| {
        RECORDS_REJECTED_TOTAL.inc();
        ApiError::from_error(e, "Failed to save data")
    })?;

    let record = timed("insert", state.store.insert(reading))
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to save data"))?;

    RECORDS_INGESTED_TOTAL.inc();

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            message: "Data saved successfully",
            data: record,
        }),
    ))
}

async fn list_gps(
    State(state): State<AppState>,
    query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> std::result::Result<Json<GpsPageResponse>, ApiError> {
    let query = query
        .map(|Query(pairs)| PageQuery::from_pairs(pairs))
        .unwrap_or_default();
    let pagination = Pagination::from_query(&query);

    let data = timed(
        "find_page",
        state.store.find_page(pagination.offset(), pagination.limit),
    )
    .await
    .map_err(ApiError::internal)?;

    let total_items = timed("count", state.store.count())
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(GpsPageResponse {
        data,
        page: pagination.page,
        limit: pagination.limit,
        total_pages: pagination.total_pages(total_items),
        total_items,
    }))
}

async fn delete_all_gps(
    State(state): State<AppState>,
) -> std::result::Result<Json<MessageResponse>, ApiError> {
    let removed = timed("delete_all", state.store.delete_all())
        .await
        .map_err(ApiError::internal)?;

    info!("Deleted {} GPS records", removed);
    RECORDS_DELETED_TOTAL.inc_by(removed as f64);

    Ok(Json(MessageResponse {
        message: "All data deleted successfully".to_string(),
    }))
}

async fn metrics_handler() -> Response {
    match gather_metrics() {
        Ok(text) => text.into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Records latency and failure counts for one storage call.
async fn timed<T, F>(operation: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let timer = STORE_LATENCY_SECONDS
        .with_label_values(&[operation])
        .start_timer();
    let result = fut.await;
    timer.observe_duration();

    if result.is_err() {
        STORE_FAILURES_TOTAL.inc();
    }
    result
}

/// Error surfaced at the handler boundary.
///
/// Validation failures carry their message to the client. Everything else is
/// logged here and answered with a fixed, generic message.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Persistence { message: &'static str, source: Error },
}

impl ApiError {
    fn from_error(err: Error, message: &'static str) -> Self {
        match err {
            Error::Validation(msg) => ApiError::Validation(msg),
            source => ApiError::Persistence { message, source },
        }
    }

    fn internal(err: Error) -> Self {
        Self::from_error(err, "Internal Server Error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => {
                debug!("Validation failed: {}", message);
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::Persistence { message, source } => {
                error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}
