use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::trips::SearchTripsRequest,
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    models::Trip,
    response::ApiResponse,
    routes::{admin, params::DateQuery},
    services::trip_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(admin::create_trip))
        .route("/search", post(search_trips))
        // write routes mirror /api/admin/buses and stay admin-only
        .route(
            "/{id}",
            get(get_trip)
                .put(admin::update_trip)
                .delete(admin::delete_trip),
        )
}

#[utoipa::path(
    get,
    path = "/api/buses",
    params(DateQuery),
    responses(
        (status = 200, description = "All buses, by date then departure", body = ApiResponse<Vec<Trip>>)
    ),
    tag = "Buses"
)]
pub async fn list_trips(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DateQuery>,
) -> AppResult<Json<ApiResponse<Vec<Trip>>>> {
    let resp = trip_service::list_trips(&state, query.date).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/buses/{id}",
    params(
        ("id" = Uuid, Path, description = "Bus ID")
    ),
    responses(
        (status = 200, description = "Bus", body = ApiResponse<Trip>),
        (status = 404, description = "Bus not found")
    ),
    tag = "Buses"
)]
pub async fn get_trip(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ApiResponse<Trip>>> {
    let resp = trip_service::get_trip(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/buses/search",
    request_body = SearchTripsRequest,
    responses(
        (status = 200, description = "Matching buses, by departure", body = ApiResponse<Vec<Trip>>),
        (status = 400, description = "Missing fields or past date")
    ),
    tag = "Buses"
)]
pub async fn search_trips(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SearchTripsRequest>,
) -> AppResult<Json<ApiResponse<Vec<Trip>>>> {
    let resp = trip_service::search_trips(&state, payload).await?;
    Ok(Json(resp))
}
