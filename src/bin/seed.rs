use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use bus_booking_api::{
    clock::{Clock, SystemClock},
    config::AppConfig,
    db::{create_orm_conn, ensure_initial_admin, run_migrations},
    entity::{
        accounts::{ActiveModel as AccountActive, Column as AccountCol, Entity as Accounts},
        enums::{AccountRole, TripType},
        trips::{ActiveModel as TripActive, Column as TripCol, Entity as Trips},
    },
    models::strings_to_json,
    services::auth_service::hash_password,
};

struct Route {
    prefix: &'static str,
    name: &'static str,
    from: &'static str,
    to: &'static str,
    departure: &'static str,
    arrival: &'static str,
    seats: i32,
    fare: i64,
    trip_type: TripType,
    amenities: &'static [&'static str],
}

const ROUTES: &[Route] = &[
    Route {
        prefix: "KA01",
        name: "Deccan Express",
        from: "Bangalore",
        to: "Hyderabad",
        departure: "21:30",
        arrival: "06:00",
        seats: 40,
        fare: 1200,
        trip_type: TripType::Sleeper,
        amenities: &["WiFi", "Charging Point", "Blanket"],
    },
    Route {
        prefix: "KA02",
        name: "Garden City Travels",
        from: "Bangalore",
        to: "Hyderabad",
        departure: "08:00",
        arrival: "17:30",
        seats: 45,
        fare: 950,
        trip_type: TripType::Ac,
        amenities: &["Water Bottle", "Charging Point"],
    },
    Route {
        prefix: "TS07",
        name: "Charminar Connect",
        from: "Hyderabad",
        to: "Bangalore",
        departure: "22:00",
        arrival: "07:00",
        seats: 36,
        fare: 1100,
        trip_type: TripType::Sleeper,
        amenities: &["WiFi", "Blanket"],
    },
    Route {
        prefix: "TN09",
        name: "Marina Rider",
        from: "Chennai",
        to: "Bangalore",
        departure: "06:30",
        arrival: "12:45",
        seats: 50,
        fare: 650,
        trip_type: TripType::NonAc,
        amenities: &[],
    },
];

const DAYS_AHEAD: i64 = 7;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    ensure_initial_admin(&orm, &config.admin).await?;
    let user_id = ensure_user(&orm, "user@example.com", "user123").await?;
    let created = seed_trips(&orm, &SystemClock::from_offset_minutes(config.utc_offset_minutes)).await?;

    println!("Seed completed. User ID: {user_id}, buses created: {created}");
    Ok(())
}

async fn ensure_user(orm: &DatabaseConnection, email: &str, password: &str) -> anyhow::Result<Uuid> {
    if let Some(existing) = Accounts::find()
        .filter(AccountCol::Email.eq(email))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let now = Utc::now().fixed_offset();
    let account = AccountActive {
        id: Set(Uuid::new_v4()),
        name: Set("Sample Rider".to_string()),
        email: Set(email.to_string()),
        phone: Set("9876543210".to_string()),
        password_hash: Set(hash_password(password)?),
        role: Set(AccountRole::User),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(orm)
    .await?;
    Ok(account.id)
}

/// One bus per route per day for the next week. Numbers already present are
/// left alone, so the seed can be re-run.
async fn seed_trips(orm: &DatabaseConnection, clock: &dyn Clock) -> anyhow::Result<usize> {
    let today = clock.today();
    let now = clock.now();
    let mut created = 0;

    for offset in 0..DAYS_AHEAD {
        let date = today + Duration::days(offset);
        for route in ROUTES {
            let number = format!("{}-{}", route.prefix, date.format("%m%d"));
            let exists = Trips::find()
                .filter(TripCol::Number.eq(number.as_str()))
                .one(orm)
                .await?
                .is_some();
            if exists {
                continue;
            }

            let amenities: Vec<String> = route.amenities.iter().map(|a| a.to_string()).collect();
            TripActive {
                id: Set(Uuid::new_v4()),
                number: Set(number),
                name: Set(route.name.to_string()),
                origin: Set(route.from.to_string()),
                destination: Set(route.to.to_string()),
                travel_date: Set(date),
                departure_time: Set(route.departure.to_string()),
                arrival_time: Set(route.arrival.to_string()),
                total_seats: Set(route.seats),
                fare: Set(route.fare),
                trip_type: Set(route.trip_type),
                amenities: Set(strings_to_json(&amenities)),
                rating: Set(4.2),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(orm)
            .await?;
            created += 1;
        }
    }

    Ok(created)
}
