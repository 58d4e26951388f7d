use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::auth::{LoginRequest, OtpIssued, RequestOtpRequest, SessionResponse, VerifyOtpRequest},
    entity::enums::AccountRole,
    error::AppResult,
    extract::{ApiJson, ValidatedJson},
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request-otp", post(request_otp))
        .route("/verify-otp", post(verify_otp))
        .route("/login", post(login))
}

#[utoipa::path(
    post,
    path = "/api/auth/request-otp",
    request_body = RequestOtpRequest,
    responses(
        (status = 200, description = "Registration code emailed", body = ApiResponse<OtpIssued>),
        (status = 400, description = "Email already registered or invalid"),
        (status = 500, description = "Email could not be sent")
    ),
    tag = "Auth"
)]
pub async fn request_otp(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RequestOtpRequest>,
) -> AppResult<Json<ApiResponse<OtpIssued>>> {
    let resp = auth_service::request_otp(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Missing fields, bad or expired code")
    ),
    tag = "Auth"
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<VerifyOtpRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SessionResponse>>)> {
    let resp = auth_service::verify_otp_and_register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<SessionResponse>),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<SessionResponse>>> {
    let resp = auth_service::login(&state, payload, AccountRole::User).await?;
    Ok(Json(resp))
}
