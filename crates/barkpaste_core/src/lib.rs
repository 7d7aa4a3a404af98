//! Core domain library for barkpaste (config, storage, models, paste policy).

/// Time source used for expiry stamping and sweeps.
pub mod clock;
/// Configuration loading and defaults.
pub mod config;
/// Shared defaults and limits.
pub mod constants;
/// Database access layer and store contracts.
pub mod db;
/// Application error taxonomy.
pub mod error;
/// Data models for pastes and tokens.
pub mod models;
/// Random identifier and token generation.
pub mod naming;
/// Paste lifecycle and authorization policy.
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use constants::{DEFAULT_LISTEN, DEFAULT_TTL_SECS};
pub use db::{bootstrap_default_token, Database, PasteStore, TokenStore};
pub use error::AppError;
pub use naming::{IdGenerator, RandomIds};
pub use service::{PasteService, ServiceOptions};
