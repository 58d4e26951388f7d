use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use crate::{
    config::AdminBootstrap,
    entity::{
        accounts::{ActiveModel as AccountActive, Column as AccountCol, Entity as Accounts},
        enums::AccountRole,
    },
    migration::Migrator,
    services::auth_service::hash_password,
};

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Apply every pending schema migration.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    Migrator::up(conn, None).await?;
    Ok(())
}

/// Creates the configured admin account when no admin exists yet.
/// Returns `true` if an account was created.
pub async fn ensure_initial_admin(
    conn: &DatabaseConnection,
    admin: &AdminBootstrap,
) -> Result<bool> {
    let admins = Accounts::find()
        .filter(AccountCol::Role.eq(AccountRole::Admin))
        .count(conn)
        .await?;
    if admins > 0 {
        tracing::info!(admins, "admin accounts present, skipping bootstrap");
        return Ok(false);
    }

    let password_hash = hash_password(&admin.password)?;
    let now = Utc::now().fixed_offset();
    AccountActive {
        id: Set(Uuid::new_v4()),
        name: Set(admin.name.clone()),
        email: Set(admin.email.trim().to_lowercase()),
        phone: Set(admin.phone.clone()),
        password_hash: Set(password_hash),
        role: Set(AccountRole::Admin),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await?;

    tracing::warn!(email = %admin.email, "created initial admin account; change its password");
    Ok(true)
}
