use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{
            AdminBooking, ClearedBookings, DashboardStats, MonthlyBookings, TripSchedule,
            TripsOnDate, WeeklyTripStats,
        },
        auth::{LoginRequest, SessionResponse},
        trips::{CreateTripRequest, UpdateTripRequest},
    },
    entity::enums::AccountRole,
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery, ValidatedJson},
    middleware::auth::{AuthUser, ensure_admin},
    models::Trip,
    response::ApiResponse,
    routes::params::{AdminBookingQuery, DateQuery, DateRangeQuery, MonthQuery, WeeklyStatsQuery},
    services::{admin_service, auth_service, trip_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(admin_login))
        .route("/dashboard-stats", get(dashboard_stats))
        .route("/buses", post(create_trip))
        .route("/buses/{id}", put(update_trip).delete(delete_trip))
        .route("/bookings", get(list_bookings))
        .route("/bookings/clear-all", delete(clear_all_bookings))
        .route("/buses-by-date", get(trips_for_date))
        .route("/buses-for-date-range", get(trips_for_date_range))
        .route("/bus-weekly-stats/{bus_id}", get(trip_weekly_stats))
        .route("/monthly-bookings", get(monthly_bookings))
}

#[utoipa::path(
    post,
    path = "/api/admin/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin logged in", body = ApiResponse<SessionResponse>),
        (status = 401, description = "Invalid admin credentials")
    ),
    tag = "Admin"
)]
pub async fn admin_login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<SessionResponse>>> {
    let resp = auth_service::login(&state, payload, AccountRole::Admin).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard-stats",
    responses(
        (status = 200, description = "Dashboard totals", body = ApiResponse<DashboardStats>),
        (status = 403, description = "Admins only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    ensure_admin(&user)?;
    let resp = admin_service::dashboard_stats(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/buses",
    request_body = CreateTripRequest,
    responses(
        (status = 201, description = "Bus created", body = ApiResponse<Trip>),
        (status = 400, description = "Validation failed or number taken"),
        (status = 403, description = "Admins only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_trip(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateTripRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Trip>>)> {
    ensure_admin(&user)?;
    let resp = trip_service::create_trip(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/buses/{id}",
    params(
        ("id" = Uuid, Path, description = "Bus ID")
    ),
    request_body = UpdateTripRequest,
    responses(
        (status = 200, description = "Bus updated", body = ApiResponse<Trip>),
        (status = 400, description = "Validation failed or number taken"),
        (status = 404, description = "Bus not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_trip(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTripRequest>,
) -> AppResult<Json<ApiResponse<Trip>>> {
    ensure_admin(&user)?;
    let resp = trip_service::update_trip(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/buses/{id}",
    params(
        ("id" = Uuid, Path, description = "Bus ID")
    ),
    responses(
        (status = 200, description = "Bus deleted"),
        (status = 400, description = "Bus has bookings"),
        (status = 404, description = "Bus not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_trip(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    ensure_admin(&user)?;
    let resp = trip_service::delete_trip(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/bookings",
    params(AdminBookingQuery),
    responses(
        (status = 200, description = "Bookings with owner details", body = ApiResponse<Vec<AdminBooking>>),
        (status = 403, description = "Admins only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<AdminBookingQuery>,
) -> AppResult<Json<ApiResponse<Vec<AdminBooking>>>> {
    ensure_admin(&user)?;
    let resp = admin_service::list_bookings(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/bookings/clear-all",
    responses(
        (status = 200, description = "Every booking deleted", body = ApiResponse<ClearedBookings>),
        (status = 403, description = "Admins only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn clear_all_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ClearedBookings>>> {
    ensure_admin(&user)?;
    let resp = admin_service::clear_all_bookings(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/buses-by-date",
    params(DateQuery),
    responses(
        (status = 200, description = "Buses on one date with seat counts", body = ApiResponse<TripsOnDate>),
        (status = 400, description = "Date missing")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn trips_for_date(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<DateQuery>,
) -> AppResult<Json<ApiResponse<TripsOnDate>>> {
    ensure_admin(&user)?;
    let resp = admin_service::trips_for_date(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/buses-for-date-range",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Per-day bus schedule", body = ApiResponse<TripSchedule>),
        (status = 400, description = "Range missing, reversed or too long")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn trips_for_date_range(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<TripSchedule>>> {
    ensure_admin(&user)?;
    let resp = admin_service::trips_for_date_range(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/bus-weekly-stats/{bus_id}",
    params(
        ("bus_id" = Uuid, Path, description = "Bus ID"),
        WeeklyStatsQuery
    ),
    responses(
        (status = 200, description = "Seven days of booking stats", body = ApiResponse<WeeklyTripStats>),
        (status = 404, description = "Bus not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn trip_weekly_stats(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(bus_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<WeeklyStatsQuery>,
) -> AppResult<Json<ApiResponse<WeeklyTripStats>>> {
    ensure_admin(&user)?;
    let resp = admin_service::trip_weekly_stats(&state, bus_id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/monthly-bookings",
    params(MonthQuery),
    responses(
        (status = 200, description = "Per-day bookings and revenue", body = ApiResponse<MonthlyBookings>),
        (status = 400, description = "Year or month missing")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn monthly_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> AppResult<Json<ApiResponse<MonthlyBookings>>> {
    ensure_admin(&user)?;
    let resp = admin_service::monthly_bookings(&state, query).await?;
    Ok(Json(resp))
}
