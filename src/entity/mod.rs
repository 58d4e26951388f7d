pub mod accounts;
pub mod bookings;
pub mod enums;
pub mod otp_codes;
pub mod seat_reservations;
pub mod trips;

pub use accounts::Entity as Accounts;
pub use bookings::Entity as Bookings;
pub use otp_codes::Entity as OtpCodes;
pub use seat_reservations::Entity as SeatReservations;
pub use trips::Entity as Trips;
