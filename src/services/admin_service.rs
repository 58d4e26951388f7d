use std::collections::HashMap;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::admin::{
        AdminBooking, BookingOwner, ClearedBookings, DailyBookingSummary, DailyTripStats,
        DashboardStats, MonthlyBookings, TripSchedule, TripWithStats, TripsOnDate,
        WeeklyTripStats,
    },
    entity::{
        accounts::{Column as AccountCol, Entity as Accounts, Model as AccountModel},
        bookings::{Column as BookingCol, Entity as Bookings, Model as BookingModel},
        enums::{AccountRole, BookingStatus},
        seat_reservations::Entity as SeatReservations,
        trips::{Column as TripCol, Entity as Trips},
    },
    error::{AppError, AppResult},
    models::{Booking, Trip, json_to_seats},
    response::{ApiResponse, Meta},
    routes::params::{AdminBookingQuery, DateQuery, DateRangeQuery, MonthQuery, WeeklyStatsQuery},
    services::trip_service::with_booked_seats,
    state::AppState,
};

pub const MAX_RANGE_DAYS: i64 = 92;
pub const WEEK_DAYS: u64 = 7;
const RECENT_BOOKINGS: u64 = 5;

/// Every calendar day from `start` to `end`, both included.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Last day of the week that begins on `start`.
pub fn week_end(start: NaiveDate) -> AppResult<NaiveDate> {
    start
        .checked_add_days(Days::new(WEEK_DAYS - 1))
        .ok_or_else(|| AppError::BadRequest("Invalid start date".into()))
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

fn owner(account: Option<AccountModel>) -> Option<BookingOwner> {
    account.map(|a| BookingOwner {
        id: a.id,
        name: a.name,
        email: a.email,
        phone: a.phone,
    })
}

fn admin_booking((booking, account): (BookingModel, Option<AccountModel>)) -> AdminBooking {
    AdminBooking {
        booking: Booking::from_entity(booking),
        user: owner(account),
    }
}

fn live() -> Condition {
    Condition::all().add(BookingCol::Status.ne(BookingStatus::Cancelled))
}

pub async fn dashboard_stats(state: &AppState) -> AppResult<ApiResponse<DashboardStats>> {
    let total_users = Accounts::find()
        .filter(AccountCol::Role.eq(AccountRole::User))
        .count(&state.orm)
        .await?;
    let total_buses = Trips::find().count(&state.orm).await?;

    let bookings = Bookings::find().all(&state.orm).await?;
    let today = state.clock.today();
    let offset = *state.clock.now().offset();

    let mut stats = DashboardStats {
        total_users,
        total_buses,
        total_bookings: bookings.len() as u64,
        confirmed_bookings: 0,
        pending_bookings: 0,
        cancelled_bookings: 0,
        today_bookings: 0,
        total_revenue: 0,
        recent_bookings: Vec::new(),
    };
    for booking in &bookings {
        match booking.status {
            BookingStatus::Confirmed => stats.confirmed_bookings += 1,
            BookingStatus::Pending => stats.pending_bookings += 1,
            BookingStatus::Cancelled => stats.cancelled_bookings += 1,
        }
        if booking.status != BookingStatus::Cancelled {
            stats.total_revenue += booking.total_amount;
        }
        if booking.created_at.with_timezone(&offset).date_naive() >= today {
            stats.today_bookings += 1;
        }
    }

    stats.recent_bookings = Bookings::find()
        .find_also_related(Accounts)
        .order_by_desc(BookingCol::CreatedAt)
        .limit(RECENT_BOOKINGS)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(admin_booking)
        .collect();

    Ok(ApiResponse::success("Dashboard stats", stats, None))
}

fn matches_search(entry: &AdminBooking, needle: &str) -> bool {
    let b = &entry.booking;
    let owner_hit = entry.user.as_ref().is_some_and(|u| {
        u.name.to_lowercase().contains(needle) || u.email.to_lowercase().contains(needle)
    });
    owner_hit
        || [&b.bus_name, &b.bus_number, &b.bus_from, &b.bus_to]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

pub async fn list_bookings(
    state: &AppState,
    query: AdminBookingQuery,
) -> AppResult<ApiResponse<Vec<AdminBooking>>> {
    let (page, per_page, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    match (query.start_date, query.end_date) {
        (Some(start), Some(end)) => {
            condition = condition
                .add(BookingCol::TravelDate.gte(start))
                .add(BookingCol::TravelDate.lte(end));
        }
        _ => {
            if let Some(date) = query.date {
                condition = condition.add(BookingCol::TravelDate.eq(date));
            }
        }
    }

    let needle = query
        .search_term
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let matching: Vec<AdminBooking> = Bookings::find()
        .filter(condition)
        .find_also_related(Accounts)
        .order_by_asc(BookingCol::TravelDate)
        .order_by_desc(BookingCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(admin_booking)
        .filter(|entry| needle.as_deref().is_none_or(|n| matches_search(entry, n)))
        .collect();

    let total = matching.len() as u64;
    let items = matching
        .into_iter()
        .skip(offset as usize)
        .take(per_page as usize)
        .collect();

    Ok(ApiResponse::success(
        "Bookings",
        items,
        Some(Meta::new(page, per_page, total)),
    ))
}

/// Non-cancelled bookings travelling between `start` and `end`, grouped by
/// trip and travel date.
async fn live_bookings_by_trip_day(
    state: &AppState,
    trip_ids: &[Uuid],
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<HashMap<(Uuid, NaiveDate), Vec<BookingModel>>> {
    let mut grouped: HashMap<(Uuid, NaiveDate), Vec<BookingModel>> = HashMap::new();
    if trip_ids.is_empty() {
        return Ok(grouped);
    }
    let bookings = Bookings::find()
        .filter(live())
        .filter(BookingCol::TripId.is_in(trip_ids.iter().copied()))
        .filter(BookingCol::TravelDate.gte(start))
        .filter(BookingCol::TravelDate.lte(end))
        .all(&state.orm)
        .await?;
    for booking in bookings {
        grouped
            .entry((booking.trip_id, booking.travel_date))
            .or_default()
            .push(booking);
    }
    Ok(grouped)
}

fn seat_count(bookings: &[BookingModel]) -> i32 {
    bookings
        .iter()
        .map(|b| json_to_seats(&b.seats).len() as i32)
        .sum()
}

fn with_stats(trip: Trip, bookings: &[BookingModel]) -> TripWithStats {
    let booked = seat_count(bookings);
    TripWithStats {
        booked_seats_count: booked,
        available_seats_count: (trip.total_seats - booked).max(0),
        bookings_count: bookings.len() as u64,
        trip,
    }
}

async fn trips_with_stats(
    state: &AppState,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<TripWithStats>> {
    let trips = Trips::find()
        .filter(TripCol::TravelDate.gte(start))
        .filter(TripCol::TravelDate.lte(end))
        .order_by_asc(TripCol::DepartureTime)
        .all(&state.orm)
        .await?;
    let trips = with_booked_seats(&state.orm, trips).await?;

    let ids: Vec<Uuid> = trips.iter().map(|t| t.id).collect();
    let grouped = live_bookings_by_trip_day(state, &ids, start, end).await?;

    Ok(trips
        .into_iter()
        .map(|trip| {
            let bookings = grouped
                .get(&(trip.id, trip.date))
                .map(Vec::as_slice)
                .unwrap_or_default();
            with_stats(trip, bookings)
        })
        .collect())
}

pub async fn trips_for_date(
    state: &AppState,
    query: DateQuery,
) -> AppResult<ApiResponse<TripsOnDate>> {
    let date = query
        .date
        .ok_or_else(|| AppError::BadRequest("Date parameter is required".into()))?;
    let buses = trips_with_stats(state, date, date).await?;
    Ok(ApiResponse::success(
        "Buses for date",
        TripsOnDate { date, buses },
        None,
    ))
}

pub async fn trips_for_date_range(
    state: &AppState,
    query: DateRangeQuery,
) -> AppResult<ApiResponse<TripSchedule>> {
    let (Some(start), Some(end)) = (query.start_date, query.end_date) else {
        return Err(AppError::BadRequest(
            "Start date and end date parameters are required".into(),
        ));
    };
    if end < start {
        return Err(AppError::BadRequest(
            "End date must not be before start date".into(),
        ));
    }
    if (end - start).num_days() + 1 > MAX_RANGE_DAYS {
        return Err(AppError::BadRequest(format!(
            "Date range cannot exceed {MAX_RANGE_DAYS} days"
        )));
    }

    let mut by_day: HashMap<NaiveDate, Vec<TripWithStats>> = HashMap::new();
    for trip in trips_with_stats(state, start, end).await? {
        by_day.entry(trip.trip.date).or_default().push(trip);
    }

    let bus_schedule = days_inclusive(start, end)
        .map(|date| TripsOnDate {
            date,
            buses: by_day.remove(&date).unwrap_or_default(),
        })
        .collect();

    Ok(ApiResponse::success(
        "Bus schedule",
        TripSchedule { bus_schedule },
        None,
    ))
}

pub async fn trip_weekly_stats(
    state: &AppState,
    trip_id: Uuid,
    query: WeeklyStatsQuery,
) -> AppResult<ApiResponse<WeeklyTripStats>> {
    let trip = Trips::find_by_id(trip_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Bus"))?;

    let start = query.start_date.unwrap_or_else(|| state.clock.today());
    let end = week_end(start)?;
    let grouped = live_bookings_by_trip_day(state, &[trip.id], start, end).await?;

    let weekly_stats = days_inclusive(start, end)
        .map(|date| {
            let bookings = grouped
                .get(&(trip.id, date))
                .map(Vec::as_slice)
                .unwrap_or_default();
            let mut booked_seats: Vec<i32> = bookings
                .iter()
                .flat_map(|b| json_to_seats(&b.seats))
                .collect();
            booked_seats.sort_unstable();
            let count = booked_seats.len() as i32;
            DailyTripStats {
                date,
                day_of_week: day_name(date.weekday()).to_string(),
                total_bookings: bookings.len() as u64,
                booked_seats,
                booked_seats_count: count,
                available_seats_count: (trip.total_seats - count).max(0),
            }
        })
        .collect();

    Ok(ApiResponse::success(
        "Weekly stats",
        WeeklyTripStats {
            bus_id: trip.id,
            weekly_stats,
        },
        None,
    ))
}

pub async fn monthly_bookings(
    state: &AppState,
    query: MonthQuery,
) -> AppResult<ApiResponse<MonthlyBookings>> {
    let (Some(year), Some(month)) = (query.year, query.month) else {
        return Err(AppError::BadRequest(
            "Year and month parameters are required".into(),
        ));
    };
    let (first, last) = month_bounds(year, month)
        .ok_or_else(|| AppError::BadRequest("Invalid year or month".into()))?;

    let mut by_day: HashMap<NaiveDate, Vec<BookingModel>> = HashMap::new();
    let bookings = Bookings::find()
        .filter(live())
        .filter(BookingCol::TravelDate.gte(first))
        .filter(BookingCol::TravelDate.lte(last))
        .order_by_asc(BookingCol::CreatedAt)
        .all(&state.orm)
        .await?;
    for booking in bookings {
        by_day.entry(booking.travel_date).or_default().push(booking);
    }

    let monthly_summary = days_inclusive(first, last)
        .map(|date| {
            let day = by_day.remove(&date).unwrap_or_default();
            DailyBookingSummary {
                date,
                total_bookings: day.len() as u64,
                total_revenue: day.iter().map(|b| b.total_amount).sum(),
                bookings: day.into_iter().map(Booking::from_entity).collect(),
            }
        })
        .collect();

    Ok(ApiResponse::success(
        "Monthly bookings",
        MonthlyBookings {
            year,
            month,
            monthly_summary,
        },
        None,
    ))
}

/// Deletes every booking and frees every seat in one transaction.
pub async fn clear_all_bookings(state: &AppState) -> AppResult<ApiResponse<ClearedBookings>> {
    let txn = state.orm.begin().await?;
    let released_seats = SeatReservations::delete_many()
        .exec(&txn)
        .await?
        .rows_affected;
    let deleted_bookings = Bookings::delete_many().exec(&txn).await?.rows_affected;
    txn.commit().await?;

    tracing::warn!(deleted_bookings, released_seats, "all bookings cleared");
    Ok(ApiResponse::success(
        "All bookings have been cleared and bus seats have been reset",
        ClearedBookings {
            deleted_bookings,
            released_seats,
        },
        None,
    ))
}
