//! Paste lifecycle and authorization policy.
//!
//! [`PasteService`] owns no state of its own. Every operation consults the
//! token store for authorization, the id generator for new names and the
//! paste store for persistence, then returns a result or an [`AppError`].
//! An empty token string means the caller is anonymous.

use crate::clock::{Clock, SystemClock};
use crate::constants::DEFAULT_TTL_SECS;
use crate::db::{PasteStore, TokenStore};
use crate::error::AppError;
use crate::models::paste::{expiry_after, never_expires, Paste, PasteUpdate};
use crate::models::token::Token;
use crate::naming::{IdGenerator, RandomIds};
use chrono::Duration;
use std::sync::Arc;

/// Policy knobs for regular pastes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// TTL applied to anonymous regular pastes, and the ceiling on their requested TTL.
    pub default_ttl: Duration,
    /// Size ceiling for anonymous regular pastes, in bytes.
    pub size_limit: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            default_ttl: Duration::seconds(DEFAULT_TTL_SECS as i64),
            size_limit: crate::constants::DEFAULT_MAX_PASTE_SIZE,
        }
    }
}

/// Paste policy engine.
#[derive(Clone)]
pub struct PasteService {
    pastes: Arc<dyn PasteStore>,
    tokens: Arc<dyn TokenStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    options: ServiceOptions,
}

impl PasteService {
    /// Build a service over the given stores with random ids and the system clock.
    ///
    /// A zero default TTL is replaced by one day.
    pub fn new(
        pastes: Arc<dyn PasteStore>,
        tokens: Arc<dyn TokenStore>,
        mut options: ServiceOptions,
    ) -> Self {
        if options.default_ttl.is_zero() {
            options.default_ttl = Duration::seconds(DEFAULT_TTL_SECS as i64);
        }
        Self {
            pastes,
            tokens,
            ids: Arc::new(RandomIds),
            clock: Arc::new(SystemClock),
            options,
        }
    }

    /// Replace the id generator.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.options.default_ttl
    }

    pub fn size_limit(&self) -> usize {
        self.options.size_limit
    }

    /// Current time according to the service clock.
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Fail with [`AppError::Unauthorized`] unless `token` is valid.
    ///
    /// A token lookup that fails in storage also counts as unauthorized.
    fn require_token(&self, token: &str) -> Result<(), AppError> {
        match self.tokens.exists(token) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::Unauthorized),
            Err(err) => {
                tracing::warn!("Token lookup failed, treating caller as unauthorized: {}", err);
                Err(AppError::Unauthorized)
            }
        }
    }

    fn require_content(content: &[u8]) -> Result<(), AppError> {
        if content.is_empty() {
            return Err(AppError::InvalidRequest("content is empty".to_string()));
        }
        Ok(())
    }

    /// Create a system-named paste that expires.
    ///
    /// Anonymous callers (empty token) are held to the size limit and have
    /// their TTL capped at the default. Authorized callers get neither
    /// restriction and their TTL is used as given.
    ///
    /// # Errors
    /// - [`AppError::Unauthorized`] for a non-empty token that is not valid.
    /// - [`AppError::InvalidRequest`] for empty content.
    /// - [`AppError::TooBig`] for anonymous content over the size limit.
    /// - [`AppError::Exists`] when the generated id is already taken.
    pub fn create_regular(
        &self,
        token: &str,
        content: Vec<u8>,
        requested_ttl: Duration,
    ) -> Result<Paste, AppError> {
        let authorized = self.tokens.exists(token)?;
        if !token.is_empty() && !authorized {
            return Err(AppError::Unauthorized);
        }

        Self::require_content(&content)?;

        // Authorized callers are deliberately exempt from the size limit.
        if !authorized && content.len() > self.options.size_limit {
            return Err(AppError::TooBig);
        }

        let ttl = if authorized {
            requested_ttl
        } else {
            requested_ttl.min(self.options.default_ttl)
        };

        let paste = Paste::regular(
            self.ids.short_id(),
            content,
            expiry_after(self.clock.now(), ttl),
        );
        let paste = self.pastes.create(&paste)?;
        tracing::debug!(id = %paste.id, authorized, "Created regular paste");
        Ok(paste)
    }

    /// Create a caller-named paste that the sweep never removes.
    ///
    /// A positive TTL sets `expires_at = now + ttl`; otherwise the paste
    /// effectively never expires. No size limit applies.
    ///
    /// # Errors
    /// - [`AppError::Unauthorized`] unless `token` is valid.
    /// - [`AppError::InvalidRequest`] for empty content.
    /// - [`AppError::Exists`] when `id` is already taken.
    pub fn create_persistent(
        &self,
        token: &str,
        id: &str,
        content: Vec<u8>,
        requested_ttl: Duration,
    ) -> Result<Paste, AppError> {
        self.require_token(token)?;
        Self::require_content(&content)?;

        let expires_at = if requested_ttl > Duration::zero() {
            expiry_after(self.clock.now(), requested_ttl)
        } else {
            never_expires()
        };

        let paste = self
            .pastes
            .create(&Paste::persistent(id.to_string(), content, expires_at))?;
        tracing::debug!(id = %paste.id, "Created persistent paste");
        Ok(paste)
    }

    /// Fetch a paste as stored, without checking expiry.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when no paste has this id.
    pub fn get(&self, id: &str) -> Result<Paste, AppError> {
        self.pastes.get_by_id(id)
    }

    /// Fetch a paste, treating one past its expiry as missing even if the
    /// sweep has not removed it yet.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when absent or expired.
    pub fn get_live(&self, id: &str) -> Result<Paste, AppError> {
        let paste = self.get(id)?;
        if paste.is_expired_at(self.clock.now()) {
            return Err(AppError::NotFound);
        }
        Ok(paste)
    }

    /// Store an already-merged paste.
    ///
    /// # Errors
    /// [`AppError::Unauthorized`] unless `token` is valid, [`AppError::NotFound`]
    /// when the paste does not exist.
    pub fn update(&self, token: &str, paste: Paste) -> Result<Paste, AppError> {
        self.require_token(token)?;
        self.pastes.update(&paste)
    }

    /// Authorize, load the live paste, merge `changes` and store the result.
    ///
    /// # Errors
    /// Same as [`Self::update`], plus [`AppError::NotFound`] for an expired paste.
    pub fn update_with(
        &self,
        token: &str,
        id: &str,
        changes: PasteUpdate,
    ) -> Result<Paste, AppError> {
        self.require_token(token)?;
        let mut paste = self.get_live(id)?;
        paste.apply_update(changes, self.clock.now());
        self.pastes.update(&paste)
    }

    /// Delete a paste by id.
    ///
    /// # Errors
    /// [`AppError::Unauthorized`] unless `token` is valid, [`AppError::NotFound`]
    /// when the paste does not exist.
    pub fn delete(&self, token: &str, id: &str) -> Result<Paste, AppError> {
        self.require_token(token)?;
        let paste = self.pastes.delete(id)?;
        tracing::debug!(id = %id, "Deleted paste");
        Ok(paste)
    }

    /// Mint a new bearer token.
    ///
    /// # Errors
    /// [`AppError::Unauthorized`] unless `access_token` is valid.
    pub fn create_token(&self, access_token: &str) -> Result<String, AppError> {
        self.require_token(access_token)?;
        let token = self.tokens.create(&Token::new(self.ids.long_token()))?;
        tracing::info!("Minted a new token");
        Ok(token.token)
    }

    /// Revoke `target_token`. Any valid token may revoke any token, itself included.
    ///
    /// # Errors
    /// [`AppError::Unauthorized`] unless `access_token` is valid,
    /// [`AppError::NotFound`] when the target does not exist.
    pub fn revoke_token(&self, access_token: &str, target_token: &str) -> Result<(), AppError> {
        self.require_token(access_token)?;
        self.tokens.delete(target_token)?;
        tracing::info!("Revoked a token");
        Ok(())
    }

    /// Remove every expired non-persistent paste.
    ///
    /// # Returns
    /// Number of pastes removed.
    pub fn clean_expired(&self) -> Result<usize, AppError> {
        self.pastes.clean_expired(self.clock.now())
    }
}
