use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use worldwise::{
    AppState, InMemoryCityRepository,
    config::{AppConfig, Env},
    create_router,
    repository::CityRepositoryState,
    views::{DirectoryModules, EmbeddedModules, ModuleSource},
};

/// main
///
/// Entry point: configuration, logging, city store, page module source, then the
/// HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load().expect("FATAL: invalid configuration");

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise debug for this crate and request-level HTTP logs.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "worldwise=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. City Store
    let repo = match &config.cities_file {
        Some(path) => InMemoryCityRepository::load(path).await,
        None => InMemoryCityRepository::embedded(),
    }
    .expect("FATAL: failed to load city data. Check WORLDWISE_CITIES_FILE.");
    let cities = Arc::new(repo) as CityRepositoryState;

    // 5. Page Module Source
    let source: Arc<dyn ModuleSource> = match &config.template_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Loading page templates from directory");
            Arc::new(DirectoryModules::new(dir.clone()))
        }
        None => Arc::new(EmbeddedModules::new(config.module_latency)),
    };

    // 6. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app_state =
        AppState::new(config, cities, source).expect("FATAL: failed to compile view templates");

    // 7. Router and Server Startup
    let app = create_router(app_state);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: failed to bind the HTTP listener. Check WORLDWISE_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly");
}
