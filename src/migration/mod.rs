use sea_orm_migration::prelude::*;

mod m20250101_000001_create_accounts;
mod m20250101_000002_create_trips;
mod m20250101_000003_create_bookings;
mod m20250101_000004_create_otp_codes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_accounts::Migration),
            Box::new(m20250101_000002_create_trips::Migration),
            Box::new(m20250101_000003_create_bookings::Migration),
            Box::new(m20250101_000004_create_otp_codes::Migration),
        ]
    }
}
