use std::env;

use crate::constants::{DEFAULT_GEOCODER_URL, DEFAULT_GEOCODER_USER_AGENT, DEFAULT_TWILIO_API_BASE};

/// Twilio credentials for the WhatsApp alert channel
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number, without the `whatsapp:` prefix
    pub from_number: String,
    pub api_base: String,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    pub session_secret: String,
    pub admin_secret_key: Option<String>,
    pub log_requests: bool,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub geocode_timeout_secs: u64,
    pub notify_timeout_secs: u64,
    pub twilio: Option<TwilioConfig>,
    pub alert_recipients: Vec<String>,
    pub whatsapp_contact: Option<String>,
    pub volunteer_email: Option<String>,
    pub volunteer_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/database.db".to_string());

        let allowed_origins = split_list(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:5000".to_string()),
        );

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| "SESSION_SECRET must be set for session token signing")?;

        let admin_secret_key = optional_var("ADMIN_SECRET_KEY");

        let log_requests = env::var("LOG_REQUESTS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let geocoder_url =
            env::var("GEOCODER_URL").unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string());
        let geocoder_user_agent = env::var("GEOCODER_USER_AGENT")
            .unwrap_or_else(|_| DEFAULT_GEOCODER_USER_AGENT.to_string());

        let geocode_timeout_secs = env::var("GEOCODE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|_| "Invalid GEOCODE_TIMEOUT_SECS")?;

        let notify_timeout_secs = env::var("NOTIFY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| "Invalid NOTIFY_TIMEOUT_SECS")?;

        let twilio = match (
            optional_var("TWILIO_ACCOUNT_SID"),
            optional_var("TWILIO_AUTH_TOKEN"),
            optional_var("TWILIO_WHATSAPP_FROM"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from_number,
                api_base: env::var("TWILIO_API_BASE")
                    .unwrap_or_else(|_| DEFAULT_TWILIO_API_BASE.to_string()),
            }),
            (None, None, None) => None,
            _ => {
                return Err("TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN and TWILIO_WHATSAPP_FROM must be set together".to_string())
            }
        };

        let alert_recipients = optional_var("ALERT_RECIPIENTS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        let whatsapp_contact = optional_var("WHATSAPP_CONTACT");

        let volunteer_email = optional_var("VOLUNTEER_EMAIL");
        let volunteer_password = optional_var("VOLUNTEER_PASSWORD");

        Ok(Config {
            server_host,
            server_port,
            database_path,
            allowed_origins,
            environment,
            session_secret,
            admin_secret_key,
            log_requests,
            geocoder_url,
            geocoder_user_agent,
            geocode_timeout_secs,
            notify_timeout_secs,
            twilio,
            alert_recipients,
            whatsapp_contact,
            volunteer_email,
            volunteer_password,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
