//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{Coordinate, IntervalMins, InvalidInterval};
use crate::onemap::{OneMapError, RouteProvider, convert_route_response};
use crate::planner::{AnnotateError, RouteAnnotator, SpatialError, SpatialOracle};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<P, O>(state: AppState<P, O>) -> Router
where
    P: RouteProvider + 'static,
    O: SpatialOracle + 'static,
{
    Router::new()
        .route("/", get(health))
        .route("/api/v1/search", get(search::<P, O>))
        .route("/api/v1/routes", get(routes::<P, O>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Cycling routes API is running",
    })
}

/// Proxy a free-text location search to OneMap.
async fn search<P: RouteProvider, O: SpatialOracle>(
    State(state): State<AppState<P, O>>,
    req: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Json<Vec<Value>>, AppError> {
    let Query(req) = req?;

    let results = state.onemap.search(&req.search_val, req.page_num).await?;
    Ok(Json(results.to_vec()))
}

/// Cycling routes between two points with parking spots at each stop
/// interval, fastest first.
async fn routes<P: RouteProvider, O: SpatialOracle>(
    State(state): State<AppState<P, O>>,
    req: Result<Query<RoutesRequest>, QueryRejection>,
) -> Result<Json<Vec<RouteResult>>, AppError> {
    let Query(req) = req?;

    // Validate everything before calling out
    let interval = req
        .interval_mins
        .map(IntervalMins::new)
        .transpose()?
        .unwrap_or_default();
    let start = parse_point("start", &req.start)?;
    let end = parse_point("end", &req.end)?;

    let response = state.onemap.route(start, end).await?;
    let (primary, alternates) = convert_route_response(&response);

    let annotator = RouteAnnotator::new(state.parking.as_ref(), state.planner.as_ref());
    let annotated = annotator.annotate_all(primary, alternates, interval).await?;

    Ok(Json(annotated.iter().map(RouteResult::from).collect()))
}

fn parse_point(name: &str, value: &str) -> Result<Coordinate, AppError> {
    Coordinate::parse_lat_lon(value).map_err(|e| AppError::BadRequest {
        message: format!("invalid {name}: {e}"),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<InvalidInterval> for AppError {
    fn from(e: InvalidInterval) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<OneMapError> for AppError {
    fn from(e: OneMapError) -> Self {
        AppError::ServiceUnavailable {
            message: e.to_string(),
        }
    }
}

impl From<AnnotateError> for AppError {
    fn from(e: AnnotateError) -> Self {
        match e {
            AnnotateError::Spatial(SpatialError::Unavailable { .. }) => {
                AppError::ServiceUnavailable {
                    message: e.to_string(),
                }
            }
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::ServiceUnavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
