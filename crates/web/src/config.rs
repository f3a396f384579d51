use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub resend_api_key: Option<String>,
    pub mail_from: String,
    pub mail_api_base: String,
    pub site_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            resend_api_key: std::env::var("RESEND_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Letranido <noreply@letranido.com>".to_string()),
            mail_api_base: std::env::var("MAIL_API_BASE")
                .unwrap_or_else(|_| mailer::resend::DEFAULT_API_BASE.to_string()),
            site_url: std::env::var("SITE_URL")
                .unwrap_or_else(|_| "https://letranido.com".to_string()),
        })
    }
}
