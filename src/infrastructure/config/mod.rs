use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Secret shared with the managed auth product; used to validate access tokens.
    pub jwt_secret: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Payments
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    // Transactional email
    pub resend_api_key: Option<String>,
    pub email_from: String,
    pub app_base_url: String,
    // Object storage
    pub storage_url: String,
    pub storage_service_key: String,
    // Feed
    pub feed_page_size: i64,
    pub promoted_page_size: i64,
    pub feed_promotion_interval: usize,
    // Boosts
    pub boost_expiry_interval_secs: u64,
    // Profile cache
    pub profile_cache_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let feed_promotion_interval: usize = env::var("FEED_PROMOTION_INTERVAL")
            .unwrap_or_else(|_| "3".to_string())
            .parse()?;
        if feed_promotion_interval == 0 {
            return Err("FEED_PROMOTION_INTERVAL must be a positive integer".into());
        }

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            jwt_secret: env::var("JWT_SECRET")?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            stripe_secret_key: env::var("STRIPE_SECRET_KEY")?,
            stripe_api_base: env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            resend_api_key: env::var("RESEND_API_KEY").ok().filter(|k| !k.is_empty()),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Splikz <onboarding@resend.dev>".to_string()),
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "https://splikz.com".to_string()),
            storage_url: env::var("STORAGE_URL")?,
            storage_service_key: env::var("STORAGE_SERVICE_KEY")?,
            feed_page_size: env::var("FEED_PAGE_SIZE")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
            promoted_page_size: env::var("PROMOTED_PAGE_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            feed_promotion_interval,
            boost_expiry_interval_secs: env::var("BOOST_EXPIRY_INTERVAL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()?,
            profile_cache_enabled: env::var("PROFILE_CACHE_ENABLED")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(true),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
