use betsettle::api::router::create_router;
use betsettle::config::AppConfig;
use betsettle::services::resolver;
use betsettle::sportsdata::FixtureClient;
use betsettle::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    let metrics_handle = metrics::init_metrics();

    let fixture_client = FixtureClient::new(&config.sports_api())?;
    let resolver_config = config.resolver();

    // --- Background resolution loop ---
    if config.resolver_enabled {
        if config.football_api_key.is_empty() {
            tracing::warn!("FOOTBALL_API_KEY is empty — fixture fetches will fail until it is set");
        }
        let loop_pool = pool.clone();
        let loop_client = fixture_client.clone();
        let loop_config = resolver_config.clone();
        let interval_secs = config.resolver_interval_secs;

        tokio::spawn(async move {
            resolver::run_resolution_loop(loop_pool, loop_client, loop_config, interval_secs).await;
        });
    } else {
        tracing::info!("Resolution loop disabled (RESOLVER_ENABLED=false)");
    }

    let state = AppState {
        db: pool,
        config,
        fixture_client,
        resolver_config,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
