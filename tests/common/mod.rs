#![allow(dead_code)]

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use uuid::Uuid;

use bus_booking_api::{
    clock::FixedClock,
    db::run_migrations,
    entity::{
        accounts::{ActiveModel as AccountActive, Model as AccountModel},
        enums::{AccountRole, TripType},
        trips::{ActiveModel as TripActive, Model as TripModel},
    },
    mailer::{MailError, Mailer, OutgoingMail},
    middleware::auth::AuthUser,
    models::{Account, strings_to_json},
    services::auth_service::hash_password,
    session::SessionKeys,
    state::AppState,
};

/// Wednesday morning, India time.
pub const NOW: &str = "2030-05-01T09:30:00+05:30";
pub const JWT_SECRET: &str = "integration-test-secret";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 5, 1).unwrap()
}

pub fn day(offset: i64) -> NaiveDate {
    today() + chrono::Duration::days(offset)
}

pub fn clock_at(rfc3339: &str) -> Arc<FixedClock> {
    Arc::new(FixedClock::parse(rfc3339).unwrap())
}

/// Keeps every message instead of sending it; can be told to fail.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    failing: AtomicBool,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_next(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    /// The six digits inside the most recent code email.
    pub fn last_code(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let body = &sent.last()?.html_body;
        let start = body.find("<strong>")? + "<strong>".len();
        let end = body[start..].find("</strong>")? + start;
        Some(body[start..end].to_string())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Transport("connection refused".into()));
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
}

/// Fresh in-memory database, fully migrated, clock frozen at `NOW`.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(Duration::from_secs(3600))
        .sqlx_logging(false);
    let orm = Database::connect(options).await?;
    run_migrations(&orm).await?;

    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(
        orm,
        SessionKeys::new(JWT_SECRET, 24),
        mailer.clone(),
        clock_at(NOW),
    );
    Ok(TestApp { state, mailer })
}

pub async fn create_account(
    state: &AppState,
    role: AccountRole,
    email: &str,
    password: &str,
) -> anyhow::Result<AccountModel> {
    let now = state.clock.now();
    let account = AccountActive {
        id: Set(Uuid::new_v4()),
        name: Set(format!("{} account", role.as_str())),
        email: Set(email.to_string()),
        phone: Set("9000000000".to_string()),
        password_hash: Set(hash_password(password)?),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;
    Ok(account)
}

pub fn auth_user(account: &AccountModel) -> AuthUser {
    AuthUser {
        user_id: account.id,
        role: account.role,
        account: Account::from_entity(account.clone()),
    }
}

pub async fn rider(state: &AppState, email: &str) -> anyhow::Result<AuthUser> {
    let account = create_account(state, AccountRole::User, email, "secret123").await?;
    Ok(auth_user(&account))
}

pub async fn admin(state: &AppState) -> anyhow::Result<AuthUser> {
    let account = create_account(state, AccountRole::Admin, "admin@example.com", "admin123").await?;
    Ok(auth_user(&account))
}

pub struct TripSeed<'a> {
    pub number: &'a str,
    pub from: &'a str,
    pub to: &'a str,
    pub date: NaiveDate,
    pub departure: &'a str,
    pub seats: i32,
    pub fare: i64,
    pub active: bool,
}

impl Default for TripSeed<'_> {
    fn default() -> Self {
        Self {
            number: "KA01-1001",
            from: "Bangalore",
            to: "Hyderabad",
            date: day(3),
            departure: "21:30",
            seats: 40,
            fare: 1000,
            active: true,
        }
    }
}

pub async fn insert_trip(state: &AppState, seed: TripSeed<'_>) -> anyhow::Result<TripModel> {
    let now = state.clock.now();
    let trip = TripActive {
        id: Set(Uuid::new_v4()),
        number: Set(seed.number.to_string()),
        name: Set(format!("{} Travels", seed.from)),
        origin: Set(seed.from.to_string()),
        destination: Set(seed.to.to_string()),
        travel_date: Set(seed.date),
        departure_time: Set(seed.departure.to_string()),
        arrival_time: Set("06:00".to_string()),
        total_seats: Set(seed.seats),
        fare: Set(seed.fare),
        trip_type: Set(TripType::Ac),
        amenities: Set(strings_to_json(&["WiFi".to_string()])),
        rating: Set(4.0),
        is_active: Set(seed.active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;
    Ok(trip)
}
