pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod markets;
pub mod metrics;
pub mod models;
pub mod services;
pub mod sportsdata;

use crate::config::AppConfig;
use crate::services::resolver::ResolverConfig;
use crate::sportsdata::FixtureClient;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub fixture_client: FixtureClient,
    pub resolver_config: ResolverConfig,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
