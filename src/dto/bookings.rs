use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Raw booking body as clients send it. `BookingCommand::parse` turns it
/// into a typed command before any store access.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub bus_id: Option<String>,
    #[serde(default, alias = "seatsBooked")]
    #[schema(value_type = Vec<i32>)]
    pub seats: Vec<Value>,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
}
