use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::bookings::CreateBookingRequest,
    entity::{
        bookings::{
            ActiveModel as BookingActive, Column as BookingCol, Entity as Bookings,
            Model as BookingModel,
        },
        enums::{BookingStatus, PaymentMethod, PaymentStatus},
        seat_reservations::{
            ActiveModel as SeatActive, Column as SeatCol, Entity as SeatReservations,
        },
        trips::{Entity as Trips, Model as TripModel},
    },
    error::{AppError, AppResult, is_unique_violation},
    middleware::auth::AuthUser,
    models::{Booking, seats_to_json},
    response::{ApiResponse, Meta},
    services::trip_service::parse_hhmm,
    state::AppState,
};

/// A booking request that has passed every check that needs no store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingCommand {
    pub trip_id: Uuid,
    /// Ascending, unique, positive.
    pub seats: Vec<i32>,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
}

impl BookingCommand {
    pub fn parse(request: CreateBookingRequest) -> AppResult<Self> {
        let CreateBookingRequest {
            bus_id,
            seats,
            payment_method,
            payment_status,
        } = request;

        let bus_id = bus_id.map(|id| id.trim().to_string()).unwrap_or_default();
        if bus_id.is_empty() || seats.is_empty() {
            return Err(AppError::BadRequest("Bus ID and seats are required".into()));
        }
        let trip_id = Uuid::parse_str(&bus_id)
            .map_err(|_| AppError::BadRequest("Invalid ID format".into()))?;

        let mut unique = BTreeSet::new();
        for seat in &seats {
            let seat = seat
                .as_i64()
                .filter(|n| *n > 0)
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| {
                    AppError::BadRequest(
                        "Invalid seat numbers. Seats must be positive numbers.".into(),
                    )
                })?;
            if !unique.insert(seat) {
                return Err(AppError::BadRequest(format!(
                    "Seat {seat} is requested more than once"
                )));
            }
        }

        let payment_method = match payment_method.as_deref() {
            None => PaymentMethod::CreditCard,
            Some(label) => PaymentMethod::from_label(label).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Invalid payment method. Valid options are: {}",
                    PaymentMethod::ALL.map(|m| m.label()).join(", ")
                ))
            })?,
        };
        let payment_status = match payment_status.as_deref() {
            None => PaymentStatus::Completed,
            Some(label) => PaymentStatus::from_label(label).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Invalid payment status. Valid options are: {}",
                    PaymentStatus::ALL.map(|s| s.label()).join(", ")
                ))
            })?,
        };

        Ok(Self {
            trip_id,
            seats: unique.into_iter().collect(),
            payment_method,
            payment_status,
        })
    }
}

/// Reserves the requested seats and records the booking in one transaction.
///
/// The trip row is locked where the backend supports it; the unique
/// (trip, seat) index settles any race that slips past the read check.
pub async fn create_booking(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    let command = BookingCommand::parse(payload)?;
    let txn = state.orm.begin().await?;

    let trip = Trips::find_by_id(command.trip_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Bus"))?;

    if !trip.is_active {
        return Err(AppError::BadRequest(
            "This bus is not available for booking".into(),
        ));
    }

    let today = state.clock.today();
    if trip.travel_date < today {
        tracing::debug!(trip_id = %trip.id, "booking rejected: past date");
        return Err(AppError::BadRequest(
            "Tickets for past dates are not available for booking".into(),
        ));
    }
    if trip.travel_date == today {
        let departure = parse_hhmm(&trip.departure_time).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "bus {} has malformed departure time {:?}",
                trip.id,
                trip.departure_time
            ))
        })?;
        if state.clock.time_of_day() >= departure {
            tracing::debug!(trip_id = %trip.id, "booking rejected: departed");
            return Err(AppError::BadRequest(
                "Cannot book tickets after departure time".into(),
            ));
        }
    }

    if let Some(seat) = command.seats.iter().find(|s| **s > trip.total_seats) {
        return Err(AppError::BadRequest(format!(
            "Invalid seat number {seat}. This bus has {} seats.",
            trip.total_seats
        )));
    }

    let taken = SeatReservations::find()
        .filter(SeatCol::TripId.eq(trip.id))
        .filter(SeatCol::SeatNumber.is_in(command.seats.iter().copied()))
        .count(&txn)
        .await?;
    if taken > 0 {
        tracing::debug!(trip_id = %trip.id, taken, "booking rejected: seats taken");
        return Err(seats_taken());
    }

    let now = state.clock.now();
    let booking = record_booking(&txn, &trip, &command, user.user_id, now).await?;

    txn.commit().await?;

    tracing::info!(
        booking_id = %booking.id,
        trip_id = %trip.id,
        user_id = %user.user_id,
        seats = ?command.seats,
        "booking created"
    );
    Ok(ApiResponse::success(
        "Booking successful",
        Booking::from_entity(booking),
        None,
    ))
}

/// Writes the booking snapshot and one reservation row per seat.
///
/// Runs inside the caller's transaction. A seat already held on the trip
/// violates the unique (trip, seat) index and comes back as a conflict; the
/// caller then drops the transaction and the booking row goes with it.
pub async fn record_booking<C: ConnectionTrait>(
    conn: &C,
    trip: &TripModel,
    command: &BookingCommand,
    user_id: Uuid,
    now: DateTime<FixedOffset>,
) -> AppResult<BookingModel> {
    let booking = BookingActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        trip_id: Set(trip.id),
        trip_name: Set(trip.name.clone()),
        trip_number: Set(trip.number.clone()),
        trip_type: Set(trip.trip_type),
        trip_origin: Set(trip.origin.clone()),
        trip_destination: Set(trip.destination.clone()),
        seats: Set(seats_to_json(&command.seats)),
        total_amount: Set(command.seats.len() as i64 * trip.fare),
        travel_date: Set(trip.travel_date),
        payment_method: Set(command.payment_method),
        payment_status: Set(command.payment_status),
        status: Set(BookingStatus::for_payment(command.payment_status)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;

    let reservations = command.seats.iter().map(|seat| SeatActive {
        id: Set(Uuid::new_v4()),
        trip_id: Set(trip.id),
        booking_id: Set(booking.id),
        seat_number: Set(*seat),
    });
    SeatReservations::insert_many(reservations)
        .exec_without_returning(conn)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                seats_taken()
            } else {
                err.into()
            }
        })?;

    Ok(booking)
}

fn seats_taken() -> AppError {
    AppError::Conflict("Some seats are already booked".into())
}

/// Newest first.
pub async fn list_my_bookings(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<Booking>>> {
    let items: Vec<Booking> = Bookings::find()
        .filter(BookingCol::UserId.eq(user.user_id))
        .order_by_desc(BookingCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Booking::from_entity)
        .collect();

    let message = if items.is_empty() {
        "No bookings found"
    } else {
        "Bookings fetched successfully"
    };
    let total = items.len() as u64;
    Ok(ApiResponse::success(
        message,
        items,
        Some(Meta {
            total: Some(total),
            ..Meta::empty()
        }),
    ))
}

/// Releases the booking's seats and marks it cancelled. The record itself is
/// kept.
pub async fn cancel_booking(
    state: &AppState,
    user: &AuthUser,
    booking_id: Uuid,
) -> AppResult<ApiResponse<Booking>> {
    let txn = state.orm.begin().await?;

    let booking = Bookings::find_by_id(booking_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Booking"))?;

    if booking.user_id != user.user_id && !user.is_admin() {
        tracing::warn!(%booking_id, user_id = %user.user_id, "cancel attempt on foreign booking");
        return Err(AppError::Forbidden(
            "Not authorized to cancel this booking".into(),
        ));
    }
    if booking.status == BookingStatus::Cancelled {
        return Err(AppError::BadRequest("Booking is already cancelled".into()));
    }

    let released = SeatReservations::delete_many()
        .filter(SeatCol::BookingId.eq(booking.id))
        .exec(&txn)
        .await?
        .rows_affected;

    let mut active: BookingActive = booking.into();
    active.status = Set(BookingStatus::Cancelled);
    active.updated_at = Set(state.clock.now());
    let booking = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(%booking_id, released, "booking cancelled");
    Ok(ApiResponse::success(
        "Booking cancelled successfully",
        Booking::from_entity(booking),
        None,
    ))
}
