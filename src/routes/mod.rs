use std::time::Duration;

use axum::{
    Json, Router,
    http::{HeaderName, HeaderValue, Request, Response, StatusCode, Uri},
    middleware::map_response,
    response::IntoResponse,
    routing::get,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    error::ErrorData,
    response::ApiResponse,
    state::AppState,
};

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod doc;
pub mod health;
pub mod params;
pub mod trips;

pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;
pub const MAX_IN_FLIGHT: usize = 100;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/buses", trips::router())
        .nest("/bookings", bookings::router())
        .nest("/admin", admin::router())
}

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match allow_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(err)) => {
            tracing::warn!(error = %err, "ignoring malformed CORS_ALLOW_ORIGIN");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

/// The whole HTTP application: API, health, docs, fallback and middleware.
pub fn build_router(state: AppState, cors_allow_origin: Option<&str>) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_request(|request: &Request<_>, _span: &tracing::Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "request started"
            );
        })
        .on_response(|response: &Response<_>, latency: Duration, _span: &tracing::Span| {
            tracing::info!(
                status = %response.status(),
                ms = %latency.as_millis(),
                "request finished"
            );
        });

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors_layer(cors_allow_origin))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(map_response(body_too_large))
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT))
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<ErrorData>>) {
    tracing::debug!(path = %uri.path(), "no route");
    let body = ApiResponse::failure(
        format!("Route {} not found", uri.path()),
        Some(ErrorData {
            error: "not_found".to_string(),
        }),
    );
    (StatusCode::NOT_FOUND, Json(body))
}

/// Rewrites the body-limit layer's plain-text 413 into the error envelope.
async fn body_too_large(response: axum::response::Response) -> axum::response::Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }
    let body: ApiResponse<ErrorData> = ApiResponse::failure(
        "Request body too large",
        Some(ErrorData {
            error: "payload_too_large".to_string(),
        }),
    );
    (StatusCode::PAYLOAD_TOO_LARGE, Json(body)).into_response()
}
