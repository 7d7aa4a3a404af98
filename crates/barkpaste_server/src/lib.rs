//! HTTP server wiring for barkpaste (routes, handlers, shared state, sweeper).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for paste and token endpoints.
pub mod handlers;
/// Periodic expiry sweep.
pub mod sweeper;

pub use barkpaste_core::{
    config, db, models, naming, service, AppError, Config, Database, PasteService,
};
pub use error::HttpError;
pub use sweeper::spawn_sweeper;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{delete, get, post},
    Router,
};
use barkpaste_core::constants::DEFAULT_LISTEN;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PasteService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state around an existing service.
    pub fn new(config: Config, service: PasteService) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }

    /// Construct state with a service over `db` configured from `config`.
    pub fn from_database(config: Config, db: &Database) -> Self {
        let service = PasteService::new(
            db.paste_store(),
            db.token_store(),
            config.service_options(),
        );
        Self::new(config, service)
    }
}

/// Create the application router with all routes and middleware.
///
/// `/token` is matched before `/:id`, so no persistent paste can be named `token`.
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.body_limit;

    Router::new()
        .route("/", post(handlers::paste::create_regular))
        .route("/token", post(handlers::token::create_token))
        .route("/token/:token", delete(handlers::token::revoke_token))
        .route(
            "/:id",
            get(handlers::paste::get_paste)
                .post(handlers::paste::create_persistent)
                .patch(handlers::paste::update_paste)
                .delete(handlers::paste::delete_paste),
        )
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
}

/// Resolve the listener address from configuration.
///
/// An unparseable `listen` value falls back to the default with a warning.
pub fn resolve_bind_address(config: &Config) -> SocketAddr {
    let fallback = || {
        DEFAULT_LISTEN
            .parse::<SocketAddr>()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8888)))
    };
    match config.listen.trim().parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(err) => {
            let default_bind = fallback();
            tracing::warn!(
                "Invalid LISTEN='{}': {}. Falling back to {}",
                config.listen,
                err,
                default_bind
            );
            default_bind
        }
    }
}

/// Run the Axum server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
