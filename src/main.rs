use std::sync::Arc;

use log::info;
use player_registry_app::{Application, build_application, domain::memory::InMemoryPlayerRepository};
use player_registry_persistence_sea_orm::{
    create_db_pool, create_schema, database_url, players::PlayerRepositoryImpl,
};

mod logs;

const DEFAULT_HTTP_API_HOST: &str = "127.0.0.1";

const DEFAULT_HTTP_API_PORT: u16 = 3000;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

async fn build_app() -> Application {
    let store = std::env::var("PLAYER_STORE").unwrap_or_else(|_| "sea-orm".to_string());
    match store.as_str() {
        "memory" => {
            info!("Using in-memory player store");
            build_application(Arc::new(InMemoryPlayerRepository::new()))
        }
        "sea-orm" => {
            let url = database_url();
            let db = create_db_pool(&url)
                .await
                .expect("Failed to connect to database");
            create_schema(&db)
                .await
                .expect("Failed to create players table");
            info!("Using database player store");
            build_application(Arc::new(PlayerRepositoryImpl::new(db)))
        }
        other => panic!("PLAYER_STORE must be 'sea-orm' or 'memory', got '{}'", other),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    logs::init_logger().expect("Failed to initialize logger");

    let host =
        std::env::var("PLAYER_HTTP_API_HOST").unwrap_or_else(|_| DEFAULT_HTTP_API_HOST.to_string());
    let port = std::env::var("PLAYER_HTTP_API_PORT")
        .map(|port| {
            port.parse::<u16>()
                .expect("PLAYER_HTTP_API_PORT must be a valid u16")
        })
        .unwrap_or(DEFAULT_HTTP_API_PORT);

    let app = Arc::new(build_app().await);

    info!("Starting application");

    if let Err(e) = player_registry_http_api::run(app, &host, port, shutdown_signal()).await {
        log::error!("HTTP API failed: {}", e);
    }
}
