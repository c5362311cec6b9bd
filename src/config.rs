use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Overrides the database named in `url` when set.
    pub name: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub from: Option<String>,
    pub frontend_url: String,
}

impl SmtpConfig {
    /// Welcome mail is only attempted when every credential is present.
    pub fn is_complete(&self) -> bool {
        self.host.is_some()
            && self.user.is_some()
            && self.from.is_some()
            && self
                .pass
                .as_deref()
                .is_some_and(|p| p != "your_smtp_password")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
    /// Registered account promoted to admin at startup.
    pub admin_email: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = DatabaseConfig {
            url: get("DATABASE_URL").context("DATABASE_URL must be set")?,
            name: get("DATABASE_NAME"),
            max_connections: get("DATABASE_MAX_CONNECTIONS")
                .map(|v| v.parse::<u32>())
                .transpose()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?
                .unwrap_or(10),
        };

        let jwt = JwtConfig {
            secret: get("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "financeflow".into()),
            audience: get("JWT_AUDIENCE").unwrap_or_else(|| "financeflow-users".into()),
        };

        let port = get("APP_PORT")
            .or_else(|| get("PORT"))
            .map(|v| v.parse::<u16>())
            .transpose()
            .context("APP_PORT must be a valid port number")?
            .unwrap_or(8080);

        let smtp = SmtpConfig {
            host: get("EMAIL_HOST"),
            port: get("EMAIL_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(587),
            user: get("EMAIL_USER"),
            pass: get("EMAIL_PASS"),
            from: get("EMAIL_FROM"),
            frontend_url: get("FRONTEND_URL").unwrap_or_else(|| "http://localhost:5173".into()),
        };

        Ok(Self {
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database,
            jwt,
            smtp,
            admin_email: get("ADMIN_EMAIL"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
