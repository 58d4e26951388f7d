use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub utc_offset_minutes: i32,
    pub cors_allow_origin: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub admin: AdminBootstrap,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// Credentials for the admin account created when the database has none.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL is not set"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 2000);
        let jwt_ttl_hours = parse_or("JWT_TTL_HOURS", 168);
        let utc_offset_minutes = parse_or("UTC_OFFSET_MINUTES", 330);
        let cors_allow_origin = env::var("CORS_ALLOW_ORIGIN").ok();

        let smtp = match env::var("SMTP_HOST") {
            Ok(host) if !host.trim().is_empty() => Some(SmtpConfig {
                host,
                port: parse_or("SMTP_PORT", 587),
                username: env::var("SMTP_USERNAME").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from: env::var("MAIL_FROM")
                    .map_err(|_| anyhow::anyhow!("MAIL_FROM is required when SMTP_HOST is set"))?,
            }),
            _ => None,
        };

        let admin = AdminBootstrap {
            name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string()),
            email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
            phone: env::var("ADMIN_PHONE").unwrap_or_else(|_| "1234567890".to_string()),
            password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
        };

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            jwt_ttl_hours,
            utc_offset_minutes,
            cors_allow_origin,
            smtp,
            admin,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
