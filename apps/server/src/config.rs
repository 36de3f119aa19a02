//! Server configuration from environment variables.

use finclue_core::errors::Error;

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// Path of the SQLite database file.
    pub db_path: String,
    /// Financial Modeling Prep API key.
    pub fmp_api_key: String,
    /// Resend API key for outbound alert email.
    pub resend_api_key: String,
    /// From address used for alert email.
    pub mail_from: String,
    /// Shared secret authorizing the notification run endpoint.
    pub cron_secret: String,
    /// Whether the in-process notification scheduler runs.
    pub scheduler_enabled: bool,
}

fn required(key: &str) -> Result<String, Error> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingConfigKey(key.to_string())),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Config {
            listen_addr: std::env::var("FINCLUE_LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            db_path: std::env::var("FINCLUE_DB_PATH")
                .unwrap_or_else(|_| "finclue.db".to_string()),
            fmp_api_key: required("FMP_API_KEY")?,
            resend_api_key: required("RESEND_API_KEY")?,
            mail_from: std::env::var("FINCLUE_MAIL_FROM")
                .unwrap_or_else(|_| "FinClue Alerts <alerts@finclue.app>".to_string()),
            cron_secret: required("CRON_SECRET")?,
            scheduler_enabled: std::env::var("FINCLUE_SCHEDULER")
                .map(|v| v != "off" && v != "0" && v != "false")
                .unwrap_or(true),
        })
    }
}
