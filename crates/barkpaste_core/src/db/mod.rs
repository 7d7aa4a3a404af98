//! Database layer and store contracts for barkpaste.

/// Paste storage helpers.
pub mod paste;
/// redb table definitions.
pub mod tables;
/// Token storage helpers.
pub mod token;

use crate::constants::REDB_FILE_NAME;
use crate::error::AppError;
use crate::models::{paste::Paste, token::Token};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;

/// Persisted collection of pastes keyed by unique id.
///
/// Implementations must make `create` an atomic insert-if-absent and
/// `clean_expired` a single atomic sweep.
pub trait PasteStore: Send + Sync {
    /// Insert a new paste.
    ///
    /// # Errors
    /// [`AppError::Exists`] when the id is taken; existing rows are left untouched.
    fn create(&self, paste: &Paste) -> Result<Paste, AppError>;

    /// Fetch a paste by id.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when no row has this id.
    fn get_by_id(&self, id: &str) -> Result<Paste, AppError>;

    /// Every stored paste, expired or not.
    fn list(&self) -> Result<Vec<Paste>, AppError>;

    /// Replace the content and expiry of an existing paste.
    ///
    /// The stored `is_persistent` flag is kept whatever the argument says.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when the id is absent.
    fn update(&self, paste: &Paste) -> Result<Paste, AppError>;

    /// Remove a paste and return the removed row.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when the id is absent.
    fn delete(&self, id: &str) -> Result<Paste, AppError>;

    /// Remove every non-persistent paste whose expiry is before `now`.
    ///
    /// # Returns
    /// Number of removed rows. Calling again with no writes in between removes nothing.
    fn clean_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError>;
}

/// Persisted set of valid bearer tokens.
pub trait TokenStore: Send + Sync {
    /// Insert a token.
    ///
    /// # Errors
    /// [`AppError::Exists`] when the token is already present.
    fn create(&self, token: &Token) -> Result<Token, AppError>;

    /// Every stored token.
    fn list(&self) -> Result<Vec<Token>, AppError>;

    /// Remove a token.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when the token is absent.
    fn delete(&self, token: &str) -> Result<(), AppError>;

    /// Whether `token` is valid. Always `false` for the empty string.
    fn exists(&self, token: &str) -> Result<bool, AppError>;
}

/// Insert `default_token` when the token store is empty.
///
/// Run once at startup before serving traffic.
///
/// # Returns
/// `true` when the default token was inserted.
///
/// # Errors
/// Propagates storage failures from listing or inserting.
pub fn bootstrap_default_token(
    tokens: &dyn TokenStore,
    default_token: &str,
) -> Result<bool, AppError> {
    if !tokens.list()?.is_empty() {
        return Ok(false);
    }

    if default_token.is_empty() {
        tracing::warn!("Token store is empty and no default token is configured");
        return Ok(false);
    }

    match tokens.create(&Token::new(default_token)) {
        Ok(_) => {
            tracing::warn!("Created default token from config, please replace it");
            Ok(true)
        }
        // Another process seeded the store between list and create.
        Err(AppError::Exists) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Database handle with access to the paste and token stores.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub pastes: Arc<paste::PasteDb>,
    pub tokens: Arc<token::TokenDb>,
}

impl Database {
    /// Open (or create) the database inside directory `path`.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or redb cannot open the file.
    pub fn new(path: &str) -> Result<Self, AppError> {
        std::fs::create_dir_all(path).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                path, err
            ))
        })?;
        let file = Path::new(path).join(REDB_FILE_NAME);
        let db = redb::Database::create(&file)?;
        tracing::debug!("Opened database at {}", file.display());
        Self::from_redb(db)
    }

    /// Open a throwaway database that lives only in memory.
    ///
    /// # Errors
    /// Returns an error if table initialization fails.
    pub fn in_memory() -> Result<Self, AppError> {
        let db = redb::Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::from_redb(db)
    }

    fn from_redb(db: redb::Database) -> Result<Self, AppError> {
        let db = Arc::new(db);
        Ok(Self {
            pastes: Arc::new(paste::PasteDb::new(db.clone())?),
            tokens: Arc::new(token::TokenDb::new(db.clone())?),
            db,
        })
    }

    /// Paste store as the trait object the policy engine consumes.
    pub fn paste_store(&self) -> Arc<dyn PasteStore> {
        self.pastes.clone()
    }

    /// Token store as the trait object the policy engine consumes.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        self.tokens.clone()
    }
}

#[cfg(test)]
mod tests;
