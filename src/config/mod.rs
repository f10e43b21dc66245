use std::env;
use std::time::Duration;

use crate::services::resolver::ResolverConfig;
use crate::sportsdata::SportsApiConfig;

const DEFAULT_API_BASE_URL: &str = "https://v3.football.api-sports.io";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Sports-data provider
    pub football_api_key: String,
    pub football_api_base_url: String,
    pub fetch_timeout_secs: u64,

    // Resolver
    pub resolver_enabled: bool,
    pub resolver_interval_secs: u64,
    pub resolver_batch_size: i64,
    pub resolver_fetch_concurrency: usize,
    pub resolver_grace_minutes: u64,
    pub resolver_lock_ttl_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            football_api_key: env::var("FOOTBALL_API_KEY").unwrap_or_default(),
            football_api_base_url: env::var("FOOTBALL_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.into()),
            fetch_timeout_secs: parse_or("FETCH_TIMEOUT_SECS", 10),

            resolver_enabled: env::var("RESOLVER_ENABLED")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),
            resolver_interval_secs: parse_or("RESOLVER_INTERVAL_SECS", 300),
            resolver_batch_size: parse_or("RESOLVER_BATCH_SIZE", 50),
            resolver_fetch_concurrency: parse_or("RESOLVER_FETCH_CONCURRENCY", 5),
            resolver_grace_minutes: parse_or("RESOLVER_GRACE_MINUTES", 150),
            resolver_lock_ttl_secs: parse_or("RESOLVER_LOCK_TTL_SECS", 9 * 60),
        })
    }

    /// Provider settings for the fixture client.
    pub fn sports_api(&self) -> SportsApiConfig {
        SportsApiConfig {
            api_key: self.football_api_key.clone(),
            base_url: self.football_api_base_url.clone(),
            timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }

    /// Scheduler settings for the resolver.
    pub fn resolver(&self) -> ResolverConfig {
        ResolverConfig {
            batch_size: self.resolver_batch_size,
            fetch_concurrency: self.resolver_fetch_concurrency,
            grace: Duration::from_secs(self.resolver_grace_minutes * 60),
            lock_ttl: Duration::from_secs(self.resolver_lock_ttl_secs),
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
