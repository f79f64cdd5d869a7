//! Stockroom Server - inventory tracking with barcode lookup
//!
//! REST API server for scanning, borrowing and returning inventory items.

use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockroom_server::{
    api,
    config::{AppConfig, LoggingConfig},
    notifications::NotificationBus,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    init_tracing(&config.logging);

    tracing::info!("Starting Stockroom Server v{}", env!("CARGO_PKG_VERSION"));

    let classifier = config.classifier()?;
    tracing::info!(
        priority = ?classifier.priority(),
        rules = ?classifier.rules().map(|r| r.prefix.as_str()).collect::<Vec<_>>(),
        "Barcode rules loaded"
    );

    // The pool connects on first use so the server can start while the
    // database is down; the health probe reports the outcome.
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(config.database.connect_timeout())
        .connect_lazy(&config.database.url)?;

    let notifications = NotificationBus::new(config.notifications.dwell());
    let repository = Repository::new(pool.clone());
    let services = Services::new(
        repository.clone(),
        Arc::new(repository),
        classifier,
        notifications.clone(),
        &config,
    );

    // One-shot connection probe, then migrations if the database answered
    let health = services.health.clone();
    tokio::spawn(async move {
        if health.probe().await.is_connected() {
            match sqlx::migrate!("./migrations").run(&pool).await {
                Ok(()) => tracing::info!("Database migrations completed"),
                Err(e) => tracing::error!("Failed to run database migrations: {}", e),
            }
        }
    });

    // Save server address before moving config
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        notifications,
    };

    let app = api::router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("stockroom_server={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
