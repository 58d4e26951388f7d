use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::{
            AdminBooking, BookingOwner, ClearedBookings, DailyBookingSummary, DailyTripStats,
            DashboardStats, MonthlyBookings, TripSchedule, TripWithStats, TripsOnDate,
            WeeklyTripStats,
        },
        auth::{LoginRequest, OtpIssued, RequestOtpRequest, SessionResponse, VerifyOtpRequest},
        bookings::CreateBookingRequest,
        trips::{CreateTripRequest, SearchTripsRequest, UpdateTripRequest},
    },
    entity::enums::{AccountRole, BookingStatus, PaymentMethod, PaymentStatus, TripType},
    error::ErrorData,
    models::{Account, Booking, Trip},
    response::{ApiResponse, Meta},
    routes::{admin, auth, bookings, health, trips},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::request_otp,
        auth::verify_otp,
        auth::login,
        trips::list_trips,
        trips::get_trip,
        trips::search_trips,
        bookings::create_booking,
        bookings::my_bookings,
        bookings::cancel_booking,
        admin::admin_login,
        admin::dashboard_stats,
        admin::create_trip,
        admin::update_trip,
        admin::delete_trip,
        admin::list_bookings,
        admin::clear_all_bookings,
        admin::trips_for_date,
        admin::trips_for_date_range,
        admin::trip_weekly_stats,
        admin::monthly_bookings
    ),
    components(
        schemas(
            Account,
            Trip,
            Booking,
            AccountRole,
            TripType,
            PaymentMethod,
            PaymentStatus,
            BookingStatus,
            RequestOtpRequest,
            VerifyOtpRequest,
            LoginRequest,
            SessionResponse,
            OtpIssued,
            SearchTripsRequest,
            CreateTripRequest,
            UpdateTripRequest,
            CreateBookingRequest,
            AdminBooking,
            BookingOwner,
            DashboardStats,
            TripWithStats,
            TripsOnDate,
            TripSchedule,
            DailyTripStats,
            WeeklyTripStats,
            DailyBookingSummary,
            MonthlyBookings,
            ClearedBookings,
            ErrorData,
            Meta,
            ApiResponse<Trip>,
            ApiResponse<Booking>,
            ApiResponse<SessionResponse>,
            ApiResponse<ErrorData>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Buses", description = "Public bus queries"),
        (name = "Bookings", description = "Seat booking and cancellation"),
        (name = "Admin", description = "Bus management and booking reports"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
