mod common;

use bus_booking_api::{
    dto::bookings::CreateBookingRequest,
    entity::{
        bookings::Entity as Bookings,
        enums::{BookingStatus, PaymentStatus},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Booking,
    response::ApiResponse,
    services::{
        booking_service::{self, BookingCommand},
        trip_service,
    },
    state::AppState,
};
use common::{TripSeed, admin, clock_at, day, insert_trip, rider, spawn_app, today};
use sea_orm::{EntityTrait, PaginatorTrait, TransactionTrait};
use uuid::Uuid;

async fn book(
    state: &AppState,
    user: &AuthUser,
    trip_id: Uuid,
    seats: &[i64],
) -> AppResult<ApiResponse<Booking>> {
    let request = CreateBookingRequest {
        bus_id: Some(trip_id.to_string()),
        seats: seats.iter().map(|s| serde_json::json!(s)).collect(),
        payment_method: Some("UPI".into()),
        payment_status: None,
    };
    booking_service::create_booking(state, user, request).await
}

async fn booked_seats(state: &AppState, trip_id: Uuid) -> anyhow::Result<(Vec<i32>, i32)> {
    let trip = trip_service::get_trip(state, trip_id).await?.data.unwrap();
    Ok((trip.booked_seats, trip.available_seats))
}

#[tokio::test]
async fn booking_reserves_seats_and_snapshots_the_trip() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let user = rider(&app.state, "rider@example.com").await?;
    let trip = insert_trip(&app.state, TripSeed { fare: 750, ..Default::default() }).await?;

    let booking = book(&app.state, &user, trip.id, &[7, 3]).await?.data.unwrap();

    assert_eq!(booking.seats_booked, vec![3, 7]);
    assert_eq!(booking.total_amount, 1500);
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.payment_status, PaymentStatus::Completed);
    assert_eq!(booking.bus_number, trip.number);
    assert_eq!(booking.bus_from, "Bangalore");
    assert_eq!(booking.travel_date, trip.travel_date);
    assert_eq!(booking.user_id, user.user_id);

    let (seats, available) = booked_seats(&app.state, trip.id).await?;
    assert_eq!(seats, vec![3, 7]);
    assert_eq!(available, 38);
    Ok(())
}

#[tokio::test]
async fn overlapping_request_is_rejected_without_side_effects() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let first = rider(&app.state, "first@example.com").await?;
    let second = rider(&app.state, "second@example.com").await?;
    let trip = insert_trip(&app.state, TripSeed::default()).await?;

    book(&app.state, &first, trip.id, &[3, 4]).await?;
    let err = book(&app.state, &second, trip.id, &[4, 5]).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(ref m) if m == "Some seats are already booked"));
    let (seats, available) = booked_seats(&app.state, trip.id).await?;
    assert_eq!(seats, vec![3, 4]);
    assert_eq!(available, 38);
    assert_eq!(Bookings::find().count(&app.state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn seat_index_rejects_a_writer_that_passed_the_read_check() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let winner = rider(&app.state, "winner@example.com").await?;
    let loser = rider(&app.state, "loser@example.com").await?;
    let trip = insert_trip(&app.state, TripSeed::default()).await?;
    book(&app.state, &winner, trip.id, &[5]).await?;

    // the loser saw seat 5 free before the winner committed
    let command = BookingCommand::parse(CreateBookingRequest {
        bus_id: Some(trip.id.to_string()),
        seats: vec![serde_json::json!(5), serde_json::json!(6)],
        ..Default::default()
    })?;
    let txn = app.state.orm.begin().await?;
    let err = booking_service::record_booking(
        &txn,
        &trip,
        &command,
        loser.user_id,
        app.state.clock.now(),
    )
    .await
    .unwrap_err();
    txn.rollback().await?;

    assert!(matches!(err, AppError::Conflict(ref m) if m == "Some seats are already booked"));
    assert_eq!(Bookings::find().count(&app.state.orm).await?, 1);
    assert_eq!(booked_seats(&app.state, trip.id).await?, (vec![5], 39));
    Ok(())
}

#[tokio::test]
async fn past_trips_cannot_be_booked() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let user = rider(&app.state, "rider@example.com").await?;
    let trip = insert_trip(
        &app.state,
        TripSeed {
            date: day(-1),
            ..Default::default()
        },
    )
    .await?;

    let err = book(&app.state, &user, trip.id, &[1]).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Tickets for past dates are not available for booking"
    );
    Ok(())
}

#[tokio::test]
async fn departure_time_is_the_cutoff_for_same_day_trips() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let user = rider(&app.state, "rider@example.com").await?;
    let departed = insert_trip(
        &app.state,
        TripSeed {
            number: "EARLY",
            date: today(),
            departure: "09:30",
            ..Default::default()
        },
    )
    .await?;
    let upcoming = insert_trip(
        &app.state,
        TripSeed {
            number: "LATER",
            date: today(),
            departure: "09:31",
            ..Default::default()
        },
    )
    .await?;

    let err = book(&app.state, &user, departed.id, &[1]).await.unwrap_err();
    assert_eq!(err.to_string(), "Cannot book tickets after departure time");

    let just_before = app.state.with_clock(clock_at("2030-05-01T09:30:59+05:30"));
    let booking = book(&just_before, &user, upcoming.id, &[1]).await?;
    assert!(booking.success);
    Ok(())
}

#[tokio::test]
async fn seat_numbers_must_fit_the_bus() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let user = rider(&app.state, "rider@example.com").await?;
    let trip = insert_trip(&app.state, TripSeed { seats: 10, ..Default::default() }).await?;

    let err = book(&app.state, &user, trip.id, &[10, 11]).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = book(&app.state, &user, trip.id, &[0]).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid seat numbers. Seats must be positive numbers."
    );
    assert_eq!(booked_seats(&app.state, trip.id).await?.0, Vec::<i32>::new());
    Ok(())
}

#[tokio::test]
async fn unknown_and_inactive_buses_are_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let user = rider(&app.state, "rider@example.com").await?;
    let parked = insert_trip(&app.state, TripSeed { active: false, ..Default::default() }).await?;

    let err = book(&app.state, &user, Uuid::new_v4(), &[1]).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Bus not found"));

    let err = book(&app.state, &user, parked.id, &[1]).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn pending_payment_creates_pending_booking() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let user = rider(&app.state, "rider@example.com").await?;
    let trip = insert_trip(&app.state, TripSeed::default()).await?;

    let request = CreateBookingRequest {
        bus_id: Some(trip.id.to_string()),
        seats: vec![serde_json::json!(2)],
        payment_method: None,
        payment_status: Some("Pending".into()),
    };
    let booking = booking_service::create_booking(&app.state, &user, request)
        .await?
        .data
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.payment_method.label(), "Credit Card");
    Ok(())
}

#[tokio::test]
async fn cancelling_twice_releases_seats_once() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let user = rider(&app.state, "rider@example.com").await?;
    let trip = insert_trip(&app.state, TripSeed::default()).await?;
    let booking = book(&app.state, &user, trip.id, &[1, 2]).await?.data.unwrap();
    // someone else's seats must survive the cancellation
    let other = rider(&app.state, "other@example.com").await?;
    book(&app.state, &other, trip.id, &[5]).await?;

    let cancelled = booking_service::cancel_booking(&app.state, &user, booking.id)
        .await?
        .data
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.seats_booked, vec![1, 2]);
    assert_eq!(booked_seats(&app.state, trip.id).await?, (vec![5], 39));

    let err = booking_service::cancel_booking(&app.state, &user, booking.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Booking is already cancelled");
    assert_eq!(booked_seats(&app.state, trip.id).await?, (vec![5], 39));

    // released seats can be sold again
    book(&app.state, &other, trip.id, &[1]).await?;
    Ok(())
}

#[tokio::test]
async fn only_owner_or_admin_may_cancel() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let owner = rider(&app.state, "owner@example.com").await?;
    let stranger = rider(&app.state, "stranger@example.com").await?;
    let admin = admin(&app.state).await?;
    let trip = insert_trip(&app.state, TripSeed::default()).await?;
    let booking = book(&app.state, &owner, trip.id, &[9]).await?.data.unwrap();

    let err = booking_service::cancel_booking(&app.state, &stranger, booking.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(ref m) if m == "Not authorized to cancel this booking"));

    let resp = booking_service::cancel_booking(&app.state, &admin, booking.id).await?;
    assert_eq!(resp.data.unwrap().status, BookingStatus::Cancelled);

    let err = booking_service::cancel_booking(&app.state, &owner, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn my_bookings_are_newest_first_and_private() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let user = rider(&app.state, "rider@example.com").await?;
    let other = rider(&app.state, "other@example.com").await?;
    let trip = insert_trip(&app.state, TripSeed::default()).await?;

    let older = book(&app.state, &user, trip.id, &[1]).await?.data.unwrap();
    let later_state = app.state.with_clock(clock_at("2030-05-01T10:00:00+05:30"));
    let newer = book(&later_state, &user, trip.id, &[2]).await?.data.unwrap();
    book(&app.state, &other, trip.id, &[3]).await?;

    let mine = booking_service::list_my_bookings(&app.state, &user).await?;
    let ids: Vec<Uuid> = mine.data.unwrap().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    let none = booking_service::list_my_bookings(&app.state, &admin(&app.state).await?).await?;
    assert_eq!(none.message, "No bookings found");
    assert!(none.data.unwrap().is_empty());
    Ok(())
}
