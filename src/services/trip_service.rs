use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    dto::trips::{CreateTripRequest, SearchTripsRequest, UpdateTripRequest},
    entity::{
        bookings::{Column as BookingCol, Entity as Bookings},
        enums::TripType,
        seat_reservations::{Column as SeatCol, Entity as SeatReservations},
        trips::{ActiveModel as TripActive, Column as TripCol, Entity as Trips, Model as TripModel},
    },
    error::{AppError, AppResult, is_unique_violation},
    models::{Trip, strings_to_json},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const DEFAULT_TOTAL_SEATS: i32 = 40;
pub const DEFAULT_RATING: f64 = 4.0;

/// Parses a zero-padded or loose `H:MM` time of day.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let (hours, minutes) = value.trim().split_once(':')?;
    if minutes.len() != 2 || hours.is_empty() || hours.len() > 2 {
        return None;
    }
    NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)
}

fn normalized_time(value: &str, field: &str) -> AppResult<String> {
    parse_hhmm(value)
        .map(|t| t.format("%H:%M").to_string())
        .ok_or_else(|| AppError::BadRequest(format!("{field} must be in HH:MM format")))
}

fn clean_amenities(amenities: Vec<String>) -> Vec<String> {
    amenities
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

/// Live reservations for the given trips, keyed by trip id.
pub async fn booked_seats_by_trip<C: ConnectionTrait>(
    conn: &C,
    trip_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<i32>>, DbErr> {
    let mut seats: HashMap<Uuid, Vec<i32>> = HashMap::new();
    if trip_ids.is_empty() {
        return Ok(seats);
    }
    let rows = SeatReservations::find()
        .filter(SeatCol::TripId.is_in(trip_ids.iter().copied()))
        .all(conn)
        .await?;
    for row in rows {
        seats.entry(row.trip_id).or_default().push(row.seat_number);
    }
    Ok(seats)
}

/// Attaches booked seats to each trip, keeping the input order.
pub async fn with_booked_seats<C: ConnectionTrait>(
    conn: &C,
    trips: Vec<TripModel>,
) -> Result<Vec<Trip>, DbErr> {
    let ids: Vec<Uuid> = trips.iter().map(|t| t.id).collect();
    let mut seats = booked_seats_by_trip(conn, &ids).await?;
    Ok(trips
        .into_iter()
        .map(|trip| {
            let booked = seats.remove(&trip.id).unwrap_or_default();
            Trip::from_entity(trip, booked)
        })
        .collect())
}

pub async fn list_trips(
    state: &AppState,
    date: Option<NaiveDate>,
) -> AppResult<ApiResponse<Vec<Trip>>> {
    let mut finder = Trips::find();
    if let Some(date) = date {
        finder = finder.filter(TripCol::TravelDate.eq(date));
    }
    let trips = finder
        .order_by_asc(TripCol::TravelDate)
        .order_by_asc(TripCol::DepartureTime)
        .all(&state.orm)
        .await?;

    let items = with_booked_seats(&state.orm, trips).await?;
    let total = items.len() as u64;
    Ok(ApiResponse::success(
        "Buses",
        items,
        Some(Meta {
            total: Some(total),
            ..Meta::empty()
        }),
    ))
}

pub async fn get_trip(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Trip>> {
    let trip = Trips::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Bus"))?;
    let seats = booked_seats_by_trip(&state.orm, &[trip.id])
        .await?
        .remove(&trip.id)
        .unwrap_or_default();
    Ok(ApiResponse::success("Bus", Trip::from_entity(trip, seats), None))
}

pub async fn search_trips(
    state: &AppState,
    payload: SearchTripsRequest,
) -> AppResult<ApiResponse<Vec<Trip>>> {
    let from = payload.from.as_deref().map(str::trim).unwrap_or_default();
    let to = payload.to.as_deref().map(str::trim).unwrap_or_default();
    let (Some(date), false, false) = (payload.date, from.is_empty(), to.is_empty()) else {
        return Err(AppError::BadRequest(
            "From, to, and date are required fields".into(),
        ));
    };

    let today = state.clock.today();
    if date < today {
        return Err(AppError::BadRequest(
            "Tickets for past dates are not available for booking".into(),
        ));
    }

    let from = from.to_lowercase();
    let to = to.to_lowercase();
    let now = state.clock.time_of_day();

    let trips: Vec<TripModel> = Trips::find()
        .filter(TripCol::TravelDate.eq(date))
        .filter(TripCol::IsActive.eq(true))
        .order_by_asc(TripCol::DepartureTime)
        .all(&state.orm)
        .await?
        .into_iter()
        .filter(|trip| trip.origin.to_lowercase().contains(&from))
        .filter(|trip| trip.destination.to_lowercase().contains(&to))
        .filter(|trip| {
            date != today || parse_hhmm(&trip.departure_time).is_some_and(|dep| dep > now)
        })
        .collect();

    tracing::debug!(%from, %to, %date, found = trips.len(), "trip search");
    let items = with_booked_seats(&state.orm, trips).await?;
    Ok(ApiResponse::success("Buses", items, None))
}

pub async fn create_trip(
    state: &AppState,
    payload: CreateTripRequest,
) -> AppResult<ApiResponse<Trip>> {
    let number = payload.number.trim().to_string();
    if number.is_empty() {
        return Err(AppError::BadRequest("Bus number is required".into()));
    }
    let departure_time = normalized_time(&payload.departure_time, "Departure time")?;
    let arrival_time = normalized_time(&payload.arrival_time, "Arrival time")?;

    let taken = Trips::find()
        .filter(TripCol::Number.eq(number.as_str()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict("Bus number already exists".into()));
    }

    let now = state.clock.now();
    let amenities = clean_amenities(payload.amenities.unwrap_or_default());
    let trip = TripActive {
        id: Set(Uuid::new_v4()),
        number: Set(number),
        name: Set(payload.name.trim().to_string()),
        origin: Set(payload.from.trim().to_string()),
        destination: Set(payload.to.trim().to_string()),
        travel_date: Set(payload.date),
        departure_time: Set(departure_time),
        arrival_time: Set(arrival_time),
        total_seats: Set(payload.total_seats.unwrap_or(DEFAULT_TOTAL_SEATS)),
        fare: Set(payload.fare),
        trip_type: Set(payload.trip_type.unwrap_or(TripType::Ac)),
        amenities: Set(strings_to_json(&amenities)),
        rating: Set(payload.rating.unwrap_or(DEFAULT_RATING)),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await
    .map_err(number_conflict)?;

    tracing::info!(trip_id = %trip.id, number = %trip.number, "bus created");
    Ok(ApiResponse::success(
        "Bus created",
        Trip::from_entity(trip, Vec::new()),
        None,
    ))
}

pub async fn update_trip(
    state: &AppState,
    id: Uuid,
    payload: UpdateTripRequest,
) -> AppResult<ApiResponse<Trip>> {
    let number = payload.number.trim().to_string();
    if number.is_empty() {
        return Err(AppError::BadRequest("Bus number is required".into()));
    }

    let taken = Trips::find()
        .filter(TripCol::Number.eq(number.as_str()))
        .filter(TripCol::Id.ne(id))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict("Bus number already exists".into()));
    }

    let existing = Trips::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Bus"))?;

    let mut active: TripActive = existing.into();
    active.number = Set(number);
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(from) = payload.from {
        active.origin = Set(from.trim().to_string());
    }
    if let Some(to) = payload.to {
        active.destination = Set(to.trim().to_string());
    }
    if let Some(date) = payload.date {
        active.travel_date = Set(date);
    }
    if let Some(departure) = payload.departure_time {
        active.departure_time = Set(normalized_time(&departure, "Departure time")?);
    }
    if let Some(arrival) = payload.arrival_time {
        active.arrival_time = Set(normalized_time(&arrival, "Arrival time")?);
    }
    if let Some(fare) = payload.fare {
        active.fare = Set(fare);
    }
    if let Some(amenities) = payload.amenities {
        active.amenities = Set(strings_to_json(&clean_amenities(amenities)));
    }
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(state.clock.now());

    let trip = active.update(&state.orm).await.map_err(number_conflict)?;
    let seats = booked_seats_by_trip(&state.orm, &[trip.id])
        .await?
        .remove(&trip.id)
        .unwrap_or_default();

    tracing::info!(trip_id = %trip.id, "bus updated");
    Ok(ApiResponse::success(
        "Bus updated",
        Trip::from_entity(trip, seats),
        None,
    ))
}

pub async fn delete_trip(state: &AppState, id: Uuid) -> AppResult<ApiResponse<()>> {
    Trips::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Bus"))?;

    let bookings = Bookings::find()
        .filter(BookingCol::TripId.eq(id))
        .count(&state.orm)
        .await?;
    if bookings > 0 {
        tracing::debug!(trip_id = %id, bookings, "refusing to delete bus with bookings");
        return Err(AppError::BadRequest(
            "Cannot delete bus. There are existing bookings for this bus.".into(),
        ));
    }

    Trips::delete_by_id(id).exec(&state.orm).await?;
    tracing::info!(trip_id = %id, "bus deleted");
    Ok(ApiResponse::success("Bus deleted successfully", (), None))
}

fn number_conflict(err: DbErr) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict("Bus number already exists".into())
    } else {
        err.into()
    }
}
