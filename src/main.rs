use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bus_booking_api::{
    clock::SystemClock,
    config::AppConfig,
    db::{create_orm_conn, ensure_initial_admin, run_migrations},
    mailer::{ConsoleMailer, Mailer, SmtpMailer},
    routes::build_router,
    session::SessionKeys,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bus_booking_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    ensure_initial_admin(&orm, &config.admin).await?;

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "using SMTP mailer");
            Arc::new(SmtpMailer::new(smtp)?)
        }
        None => {
            tracing::warn!("SMTP_HOST not set; emails will be logged, not sent");
            Arc::new(ConsoleMailer)
        }
    };

    let state = AppState::new(
        orm,
        SessionKeys::new(&config.jwt_secret, config.jwt_ttl_hours),
        mailer,
        Arc::new(SystemClock::from_offset_minutes(config.utc_offset_minutes)),
    );

    let app = build_router(state, config.cors_allow_origin.as_deref());

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
