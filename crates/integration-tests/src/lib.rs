//! Shared harness for the webshop integration tests.
//!
//! Each test spawns the fully wired server on an ephemeral port over a
//! throwaway SQLite database file, then drives it over real HTTP with a
//! cookie-aware client. No external services are required.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use secrecy::SecretString;
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;

use webshop_server::config::WebshopConfig;
use webshop_server::db::{self, CredentialRepository};
use webshop_server::state::AppState;
use webshop_server::{build_app, middleware};

/// A running server instance plus a cookie-holding client bound to it.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub pool: SqlitePool,
}

/// Spawn a fresh server on an ephemeral port with its own database.
///
/// The database is migrated and the default admin credentials are seeded,
/// exactly as the binary does at startup.
///
/// # Panics
///
/// Panics if any part of the stack fails to come up; tests cannot proceed
/// without it.
pub async fn spawn_app() -> TestApp {
    let db_path = std::env::temp_dir().join(format!("webshop-test-{}.db", Uuid::new_v4()));
    let database_url = SecretString::from(format!("sqlite:{}", db_path.display()));

    let pool = db::create_pool(&database_url)
        .await
        .expect("Failed to open test database");
    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    CredentialRepository::new(&pool)
        .seed_default()
        .await
        .expect("Failed to seed admin credentials");

    let session_layer = middleware::create_session_layer(&pool)
        .await
        .expect("Failed to initialize session store");

    let config = WebshopConfig {
        database_url,
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        public_dir: PathBuf::from("public"),
        allowed_origins: vec!["http://localhost:3000".to_owned()],
    };

    let state = AppState::new(config, pool.clone());
    let app = build_app(state, session_layer);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read listener addr");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Test server crashed");
    });

    TestApp {
        base_url: format!("http://{addr}"),
        client: new_client(),
        pool,
    }
}

/// Build a cookie-holding client, e.g. to simulate a second browser session.
#[must_use]
pub fn new_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

impl TestApp {
    /// Absolute URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Create a product through the admin API and return its assigned id.
    ///
    /// # Panics
    ///
    /// Panics if the creation request fails.
    pub async fn create_product(&self, name: &str, price: &str, stock: i64) -> i64 {
        let resp = self
            .client
            .post(self.url("/api/admin/products"))
            .json(&json!({ "name": name, "price": price, "stock": stock }))
            .send()
            .await
            .expect("Failed to create product");
        assert!(resp.status().is_success(), "create_product: {}", resp.status());

        let body: serde_json::Value = resp.json().await.expect("Failed to parse response");
        body["product"]["id"].as_i64().expect("product id missing")
    }
}
