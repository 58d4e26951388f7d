use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    accounts::Model as AccountModel,
    bookings::Model as BookingModel,
    enums::{AccountRole, BookingStatus, PaymentMethod, PaymentStatus, TripType},
    trips::Model as TripModel,
};

/// An account as seen by clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: AccountRole,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub number: String,
    pub name: String,
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub departure_time: String,
    pub arrival_time: String,
    pub total_seats: i32,
    pub fare: i64,
    #[serde(rename = "type")]
    pub trip_type: TripType,
    pub amenities: Vec<String>,
    pub rating: f64,
    pub booked_seats: Vec<i32>,
    pub available_seats: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bus_id: Uuid,
    pub bus_name: String,
    pub bus_number: String,
    pub bus_type: TripType,
    pub bus_from: String,
    pub bus_to: String,
    pub seats_booked: Vec<i32>,
    pub total_amount: i64,
    pub travel_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn from_entity(model: AccountModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            is_admin: model.role == AccountRole::Admin,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl Trip {
    /// `booked_seats` must be the trip's live reservations.
    pub fn from_entity(model: TripModel, mut booked_seats: Vec<i32>) -> Self {
        booked_seats.sort_unstable();
        let available_seats = (model.total_seats - booked_seats.len() as i32).max(0);
        Self {
            id: model.id,
            number: model.number,
            name: model.name,
            from: model.origin,
            to: model.destination,
            date: model.travel_date,
            departure_time: model.departure_time,
            arrival_time: model.arrival_time,
            total_seats: model.total_seats,
            fare: model.fare,
            trip_type: model.trip_type,
            amenities: json_to_strings(&model.amenities),
            rating: model.rating,
            booked_seats,
            available_seats,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl Booking {
    pub fn from_entity(model: BookingModel) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            bus_id: model.trip_id,
            bus_name: model.trip_name,
            bus_number: model.trip_number,
            bus_type: model.trip_type,
            bus_from: model.trip_origin,
            bus_to: model.trip_destination,
            seats_booked: json_to_seats(&model.seats),
            total_amount: model.total_amount,
            travel_date: model.travel_date,
            payment_method: model.payment_method,
            payment_status: model.payment_status,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

pub fn seats_to_json(seats: &[i32]) -> Value {
    Value::from(seats.to_vec())
}

pub fn json_to_seats(value: &Value) -> Vec<i32> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_i64())
                .filter_map(|n| i32::try_from(n).ok())
                .collect()
        })
        .unwrap_or_default()
}

pub fn strings_to_json(items: &[String]) -> Value {
    Value::from(items.to_vec())
}

pub fn json_to_strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_json_ignores_foreign_values() {
        let value = serde_json::json!([3, "4", 5, 1.5, -2]);
        assert_eq!(json_to_seats(&value), vec![3, 5, -2]);
        assert_eq!(json_to_seats(&Value::Null), Vec::<i32>::new());
        assert_eq!(json_to_seats(&seats_to_json(&[7, 8])), vec![7, 8]);
    }
}
