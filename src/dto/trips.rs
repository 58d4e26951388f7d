use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::entity::enums::TripType;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchTripsRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    #[validate(length(min = 1, max = 20, message = "Bus number is required (max 20 characters)"))]
    pub number: String,
    #[validate(length(min = 1, max = 100, message = "Bus name is required (max 100 characters)"))]
    pub name: String,
    #[validate(length(min = 1, message = "Departure city is required"))]
    pub from: String,
    #[validate(length(min = 1, message = "Arrival city is required"))]
    pub to: String,
    pub date: NaiveDate,
    pub departure_time: String,
    pub arrival_time: String,
    #[validate(range(min = 10, max = 60, message = "Total seats must be between 10 and 60"))]
    pub total_seats: Option<i32>,
    #[validate(range(min = 1, message = "Fare must be a positive amount"))]
    pub fare: i64,
    #[serde(rename = "type")]
    pub trip_type: Option<TripType>,
    #[validate(length(max = 5, message = "Maximum 5 amenities are allowed"))]
    pub amenities: Option<Vec<String>>,
    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1 and 5"))]
    pub rating: Option<f64>,
    pub is_active: Option<bool>,
}

/// Seat count and coach type are fixed once a trip exists.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    #[validate(length(min = 1, max = 20, message = "Bus number is required (max 20 characters)"))]
    pub number: String,
    #[validate(length(min = 1, max = 100, message = "Bus name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Departure city must not be empty"))]
    pub from: Option<String>,
    #[validate(length(min = 1, message = "Arrival city must not be empty"))]
    pub to: Option<String>,
    pub date: Option<NaiveDate>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    #[validate(range(min = 1, message = "Fare must be a positive amount"))]
    pub fare: Option<i64>,
    #[validate(length(max = 5, message = "Maximum 5 amenities are allowed"))]
    pub amenities: Option<Vec<String>>,
    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1 and 5"))]
    pub rating: Option<f64>,
    pub is_active: Option<bool>,
}
