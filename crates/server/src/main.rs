//! Webshop server - catalog, cart, and admin panel over one SQLite database.
//!
//! # Architecture
//!
//! - Axum JSON API consumed by static browser pages
//! - SQLite via sqlx for all persistent state
//! - Cookie-backed sessions scope every cart operation to an opaque token
//!
//! Startup is fail-fast: configuration, the database pool, migrations, and
//! the session store must all come up or the process exits.

#![cfg_attr(not(test), forbid(unsafe_code))]

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use webshop_server::config::WebshopConfig;
use webshop_server::db::{self, CredentialRepository};
use webshop_server::state::AppState;
use webshop_server::{build_app, middleware};

#[tokio::main]
async fn main() {
    let config = WebshopConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "webshop_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // The database file lives under a data directory that may not exist yet
    if let Some(dir) = config.database_parent_dir() {
        std::fs::create_dir_all(&dir).expect("Failed to create data directory");
    }

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to open database");
    tracing::info!("Database pool created");

    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database migrations applied");

    let seeded = CredentialRepository::new(&pool)
        .seed_default()
        .await
        .expect("Failed to seed admin credentials");
    if seeded {
        tracing::info!("Default admin credentials created (username: admin, password: admin123)");
    }

    let session_layer = middleware::create_session_layer(&pool)
        .await
        .expect("Failed to initialize session store");

    let state = AppState::new(config.clone(), pool);
    let app = build_app(state, session_layer);

    let addr = config.socket_addr();
    tracing::info!("webshop listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
