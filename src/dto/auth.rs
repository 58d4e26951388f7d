use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Account;

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct RequestOtpRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
}

/// Every field is required. Missing ones deserialize as empty and are
/// rejected by the registration flow with a single message.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub user: Account,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OtpIssued {
    pub email: String,
    pub expires_in_seconds: i64,
}
