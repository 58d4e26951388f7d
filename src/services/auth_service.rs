use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Duration;
use password_hash::rand_core::OsRng;
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    dto::auth::{LoginRequest, OtpIssued, RequestOtpRequest, SessionResponse, VerifyOtpRequest},
    entity::{
        accounts::{ActiveModel as AccountActive, Column as AccountCol, Entity as Accounts},
        enums::AccountRole,
        otp_codes::{ActiveModel as OtpActive, Column as OtpCol, Entity as OtpCodes},
    },
    error::{AppError, AppResult},
    mailer::otp_mail,
    models::Account,
    response::ApiResponse,
    state::AppState,
};

pub const OTP_TTL_MINUTES: i64 = 5;
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

/// Hashes that cannot be parsed never verify.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            tracing::error!(error = %err, "stored password hash is unreadable");
            false
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Six decimal digits, leading digit non-zero.
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

pub async fn request_otp(
    state: &AppState,
    payload: RequestOtpRequest,
) -> AppResult<ApiResponse<OtpIssued>> {
    let email = normalize_email(&payload.email);

    let existing = Accounts::find()
        .filter(AccountCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    OtpCodes::delete_many()
        .filter(OtpCol::Email.eq(email.as_str()))
        .exec(&state.orm)
        .await?;

    let code = generate_otp();
    let now = state.clock.now();
    let otp_id = Uuid::new_v4();
    OtpActive {
        id: Set(otp_id),
        email: Set(email.clone()),
        code: Set(code.clone()),
        expires_at: Set(now + Duration::minutes(OTP_TTL_MINUTES)),
        used: Set(false),
        created_at: Set(now),
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = state
        .mailer
        .send(otp_mail(&email, &code, OTP_TTL_MINUTES))
        .await
    {
        OtpCodes::delete_by_id(otp_id).exec(&state.orm).await?;
        return Err(err.into());
    }

    tracing::info!(email = %email, "registration code issued");
    Ok(ApiResponse::success(
        "OTP sent successfully",
        OtpIssued {
            email,
            expires_in_seconds: OTP_TTL_MINUTES * 60,
        },
        None,
    ))
}

pub async fn verify_otp_and_register(
    state: &AppState,
    payload: VerifyOtpRequest,
) -> AppResult<ApiResponse<SessionResponse>> {
    let VerifyOtpRequest {
        email,
        otp,
        name,
        password,
        phone,
    } = payload;
    let email = normalize_email(&email);
    let name = name.trim().to_string();
    let phone = phone.trim().to_string();
    let otp = otp.trim().to_string();

    if email.is_empty()
        || otp.is_empty()
        || name.is_empty()
        || phone.is_empty()
        || password.len() < MIN_PASSWORD_LEN
    {
        return Err(AppError::BadRequest("Missing required fields".into()));
    }

    let existing = Accounts::find()
        .filter(AccountCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let record = OtpCodes::find()
        .filter(OtpCol::Email.eq(email.as_str()))
        .order_by_desc(OtpCol::ExpiresAt)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("No OTP found. Please request a new one.".into()))?;

    if record.used || record.code != otp {
        tracing::debug!(email = %email, "registration code mismatch");
        return Err(AppError::BadRequest("Invalid OTP".into()));
    }
    let now = state.clock.now();
    if record.expires_at <= now {
        return Err(AppError::BadRequest("OTP has expired".into()));
    }

    let account = AccountActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email.clone()),
        phone: Set(phone),
        password_hash: Set(hash_password(&password)?),
        role: Set(AccountRole::User),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;

    OtpCodes::delete_many()
        .filter(OtpCol::Email.eq(email.as_str()))
        .exec(&state.orm)
        .await?;

    let token = state.sessions.issue(account.id, AccountRole::User)?;
    tracing::info!(account_id = %account.id, "account registered");

    Ok(ApiResponse::success(
        "Registration successful",
        SessionResponse {
            token,
            user: Account::from_entity(account),
        },
        None,
    ))
}

/// Password login for either role. Failures never reveal whether the email
/// exists.
pub async fn login(
    state: &AppState,
    payload: LoginRequest,
    role: AccountRole,
) -> AppResult<ApiResponse<SessionResponse>> {
    let failure = || match role {
        AccountRole::Admin => AppError::Unauthorized("Invalid admin credentials".into()),
        AccountRole::User => AppError::Unauthorized("Invalid email or password".into()),
    };

    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest("Email and password are required".into()));
    }

    let account = Accounts::find()
        .filter(AccountCol::Email.eq(email.as_str()))
        .filter(AccountCol::Role.eq(role))
        .one(&state.orm)
        .await?
        .ok_or_else(failure)?;

    if !verify_password(&payload.password, &account.password_hash) {
        tracing::debug!(account_id = %account.id, "password mismatch");
        return Err(failure());
    }

    let token = state.sessions.issue(account.id, role)?;
    tracing::info!(account_id = %account.id, role = role.as_str(), "logged in");

    Ok(ApiResponse::success(
        "Login successful",
        SessionResponse {
            token,
            user: Account::from_entity(account),
        },
        None,
    ))
}
