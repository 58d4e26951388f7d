use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Booking, Trip};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingOwner {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminBooking {
    #[serde(flatten)]
    pub booking: Booking,
    pub user: Option<BookingOwner>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_buses: u64,
    pub total_bookings: u64,
    pub confirmed_bookings: u64,
    pub pending_bookings: u64,
    pub cancelled_bookings: u64,
    pub today_bookings: u64,
    /// Sum over bookings that are not cancelled.
    pub total_revenue: i64,
    pub recent_bookings: Vec<AdminBooking>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripWithStats {
    #[serde(flatten)]
    pub trip: Trip,
    pub booked_seats_count: i32,
    pub available_seats_count: i32,
    pub bookings_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripsOnDate {
    pub date: NaiveDate,
    pub buses: Vec<TripWithStats>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripSchedule {
    pub bus_schedule: Vec<TripsOnDate>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyTripStats {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub total_bookings: u64,
    pub booked_seats: Vec<i32>,
    pub booked_seats_count: i32,
    pub available_seats_count: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTripStats {
    pub bus_id: Uuid,
    pub weekly_stats: Vec<DailyTripStats>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyBookingSummary {
    pub date: NaiveDate,
    pub bookings: Vec<Booking>,
    pub total_bookings: u64,
    pub total_revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBookings {
    pub year: i32,
    pub month: u32,
    pub monthly_summary: Vec<DailyBookingSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearedBookings {
    pub deleted_bookings: u64,
    pub released_seats: u64,
}
