use bus_booking_api::{
    config::AppConfig,
    db::{create_orm_conn, ensure_initial_admin, run_migrations},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let created = ensure_initial_admin(&orm, &config.admin).await?;
    println!("Migrations applied (admin created: {created})");
    Ok(())
}
