mod common;

use bus_booking_api::{
    dto::bookings::CreateBookingRequest,
    entity::{bookings::Entity as Bookings, seat_reservations::Entity as SeatReservations},
    error::AppError,
    middleware::auth::AuthUser,
    models::Booking,
    routes::params::{AdminBookingQuery, DateQuery, DateRangeQuery, MonthQuery, WeeklyStatsQuery},
    services::{admin_service, booking_service, trip_service},
    state::AppState,
};
use common::{TripSeed, admin, clock_at, day, insert_trip, rider, spawn_app};
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

async fn book(
    state: &AppState,
    user: &AuthUser,
    trip_id: Uuid,
    seats: &[i64],
) -> anyhow::Result<Booking> {
    let request = CreateBookingRequest {
        bus_id: Some(trip_id.to_string()),
        seats: seats.iter().map(|s| serde_json::json!(s)).collect(),
        ..Default::default()
    };
    Ok(booking_service::create_booking(state, user, request)
        .await?
        .data
        .unwrap())
}

#[tokio::test]
async fn dashboard_revenue_leaves_out_cancelled_bookings() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let s = &app.state;
    let user = rider(s, "rider@example.com").await?;
    rider(s, "second@example.com").await?;
    admin(s).await?;
    let trip = insert_trip(s, TripSeed { fare: 100, ..Default::default() }).await?;

    // yesterday's booking does not count towards today
    let yesterday = s.with_clock(clock_at("2030-04-30T20:00:00+05:30"));
    book(&yesterday, &user, trip.id, &[1]).await?;
    book(s, &user, trip.id, &[2, 3]).await?;
    let dropped = book(s, &user, trip.id, &[4, 5, 6]).await?;
    booking_service::cancel_booking(s, &user, dropped.id).await?;

    let stats = admin_service::dashboard_stats(s).await?.data.unwrap();
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.total_buses, 1);
    assert_eq!(stats.total_bookings, 3);
    assert_eq!(stats.confirmed_bookings, 2);
    assert_eq!(stats.cancelled_bookings, 1);
    assert_eq!(stats.pending_bookings, 0);
    assert_eq!(stats.today_bookings, 2);
    assert_eq!(stats.total_revenue, 300);
    assert_eq!(stats.recent_bookings.len(), 3);
    let owner = stats.recent_bookings[0].user.as_ref().unwrap();
    assert_eq!(owner.email, "rider@example.com");
    Ok(())
}

#[tokio::test]
async fn admin_booking_search_covers_owner_and_trip_fields() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let s = &app.state;
    let asha = rider(s, "asha@example.com").await?;
    let ravi = rider(s, "ravi@example.com").await?;
    let hyd = insert_trip(s, TripSeed { number: "HYD-1", ..Default::default() }).await?;
    let che = insert_trip(
        s,
        TripSeed { number: "CHE-1", to: "Chennai", date: day(5), ..Default::default() },
    )
    .await?;
    book(s, &asha, hyd.id, &[1]).await?;
    book(s, &ravi, che.id, &[1]).await?;

    let by_owner = admin_service::list_bookings(
        s,
        AdminBookingQuery { search_term: Some("ASHA".into()), ..Default::default() },
    )
    .await?;
    assert_eq!(by_owner.data.unwrap().len(), 1);

    let by_city = admin_service::list_bookings(
        s,
        AdminBookingQuery { search_term: Some("chennai".into()), ..Default::default() },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(by_city.len(), 1);
    assert_eq!(by_city[0].booking.bus_number, "CHE-1");

    let by_date = admin_service::list_bookings(
        s,
        AdminBookingQuery { date: Some(day(3)), ..Default::default() },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(by_date.len(), 1);
    assert_eq!(by_date[0].booking.bus_number, "HYD-1");

    let paged = admin_service::list_bookings(
        s,
        AdminBookingQuery { page: Some(2), per_page: Some(1), ..Default::default() },
    )
    .await?;
    let meta = paged.meta.unwrap();
    assert_eq!(meta.total, Some(2));
    // ordered by travel date, so page two holds the later trip
    assert_eq!(paged.data.unwrap()[0].booking.bus_number, "CHE-1");
    Ok(())
}

#[tokio::test]
async fn buses_by_date_count_only_live_bookings() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let s = &app.state;
    let user = rider(s, "rider@example.com").await?;
    let trip = insert_trip(s, TripSeed { seats: 20, ..Default::default() }).await?;
    book(s, &user, trip.id, &[1, 2]).await?;
    let cancelled = book(s, &user, trip.id, &[3]).await?;
    booking_service::cancel_booking(s, &user, cancelled.id).await?;

    let day_view = admin_service::trips_for_date(s, DateQuery { date: Some(day(3)) })
        .await?
        .data
        .unwrap();
    assert_eq!(day_view.buses.len(), 1);
    let bus = &day_view.buses[0];
    assert_eq!(bus.bookings_count, 1);
    assert_eq!(bus.booked_seats_count, 2);
    assert_eq!(bus.available_seats_count, 18);
    assert_eq!(bus.trip.booked_seats, vec![1, 2]);

    let err = admin_service::trips_for_date(s, DateQuery { date: None })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Date parameter is required");
    Ok(())
}

#[tokio::test]
async fn date_range_yields_one_entry_per_day() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let s = &app.state;
    insert_trip(s, TripSeed { number: "D1", date: day(1), ..Default::default() }).await?;
    insert_trip(s, TripSeed { number: "D3", date: day(3), ..Default::default() }).await?;
    insert_trip(s, TripSeed { number: "D9", date: day(9), ..Default::default() }).await?;

    let schedule = admin_service::trips_for_date_range(
        s,
        DateRangeQuery { start_date: Some(day(1)), end_date: Some(day(4)) },
    )
    .await?
    .data
    .unwrap()
    .bus_schedule;
    assert_eq!(schedule.len(), 4);
    assert_eq!(schedule[0].date, day(1));
    assert_eq!(schedule[0].buses.len(), 1);
    assert!(schedule[1].buses.is_empty());
    assert_eq!(schedule[2].buses[0].trip.number, "D3");
    assert!(schedule[3].buses.is_empty());

    let err = admin_service::trips_for_date_range(
        s,
        DateRangeQuery { start_date: Some(day(4)), end_date: Some(day(1)) },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = admin_service::trips_for_date_range(
        s,
        DateRangeQuery { start_date: Some(day(0)), end_date: Some(day(92)) },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Date range cannot exceed 92 days");
    Ok(())
}

#[tokio::test]
async fn weekly_stats_cover_seven_days_of_one_bus() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let s = &app.state;
    let user = rider(s, "rider@example.com").await?;
    let trip = insert_trip(s, TripSeed { seats: 30, ..Default::default() }).await?;
    book(s, &user, trip.id, &[8, 4]).await?;
    book(s, &user, trip.id, &[1]).await?;

    let week = admin_service::trip_weekly_stats(s, trip.id, WeeklyStatsQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(week.bus_id, trip.id);
    assert_eq!(week.weekly_stats.len(), 7);
    assert_eq!(week.weekly_stats[0].date, day(0));
    assert_eq!(week.weekly_stats[0].day_of_week, "Wednesday");

    let travel_day = &week.weekly_stats[3];
    assert_eq!(travel_day.total_bookings, 2);
    assert_eq!(travel_day.booked_seats, vec![1, 4, 8]);
    assert_eq!(travel_day.available_seats_count, 27);
    assert_eq!(week.weekly_stats[4].available_seats_count, 30);

    let err = admin_service::trip_weekly_stats(s, Uuid::new_v4(), WeeklyStatsQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn monthly_summary_buckets_live_bookings_by_travel_day() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let s = &app.state;
    let user = rider(s, "rider@example.com").await?;
    let trip = insert_trip(s, TripSeed { fare: 250, ..Default::default() }).await?;
    book(s, &user, trip.id, &[1, 2]).await?;
    let cancelled = book(s, &user, trip.id, &[3]).await?;
    booking_service::cancel_booking(s, &user, cancelled.id).await?;

    let month = admin_service::monthly_bookings(s, MonthQuery { year: Some(2030), month: Some(5) })
        .await?
        .data
        .unwrap();
    assert_eq!(month.monthly_summary.len(), 31);
    let travel_day = &month.monthly_summary[3];
    assert_eq!(travel_day.date, day(3));
    assert_eq!(travel_day.total_bookings, 1);
    assert_eq!(travel_day.total_revenue, 500);
    assert_eq!(month.monthly_summary[0].total_bookings, 0);

    let err = admin_service::monthly_bookings(s, MonthQuery { year: Some(2030), month: None })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Year and month parameters are required");
    Ok(())
}

#[tokio::test]
async fn clear_all_removes_bookings_and_frees_every_seat() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let s = &app.state;
    let user = rider(s, "rider@example.com").await?;
    let trip = insert_trip(s, TripSeed::default()).await?;
    book(s, &user, trip.id, &[1, 2, 3]).await?;
    book(s, &user, trip.id, &[10]).await?;

    let cleared = admin_service::clear_all_bookings(s).await?.data.unwrap();
    assert_eq!(cleared.deleted_bookings, 2);
    assert_eq!(cleared.released_seats, 4);

    assert_eq!(Bookings::find().count(&s.orm).await?, 0);
    assert_eq!(SeatReservations::find().count(&s.orm).await?, 0);
    let trip = trip_service::get_trip(s, trip.id).await?.data.unwrap();
    assert_eq!(trip.available_seats, 40);
    Ok(())
}
