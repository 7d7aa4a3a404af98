//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use barkpaste_core::{models::token::Token, Config, TokenStore};
use barkpaste_server::{create_app, AppState, Database};
use tempfile::TempDir;

pub(crate) const ADMIN_TOKEN: &str = "integration-admin-token";

pub(crate) fn test_config(db_path: &str) -> Config {
    Config {
        db_path: db_path.to_string(),
        listen: "127.0.0.1:0".to_string(),
        default_ttl_secs: 3_600,
        max_paste_size: 32,
        body_limit: 1024 * 1024,
        default_token: ADMIN_TOKEN.to_string(),
        sweep_interval_secs: 0,
    }
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let config = test_config(db_path.to_str().expect("db path"));
    let db = Database::new(&config.db_path).expect("open db");
    db.tokens
        .create(&Token::new(ADMIN_TOKEN))
        .expect("seed admin token");
    let state = AppState::from_database(config, &db);
    let server = TestServer::new(create_app(state)).expect("server");
    (server, temp_dir)
}

pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
