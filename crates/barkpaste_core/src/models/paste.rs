//! Paste data model and expiry helpers.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A stored content blob addressable by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paste {
    pub id: String,
    pub content: Vec<u8>,
    /// Set at creation and never changed afterwards.
    pub is_persistent: bool,
    pub expires_at: DateTime<Utc>,
}

/// Caller-requested changes to an existing paste.
#[derive(Debug, Clone, Default)]
pub struct PasteUpdate {
    /// Replacement content; ignored when empty.
    pub content: Option<Vec<u8>>,
    /// New lifetime counted from now; ignored unless positive.
    pub ttl: Option<Duration>,
}

/// Expiry used for persistent pastes created without a TTL (9999-12-31T23:59:59Z).
pub fn never_expires() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Compute `now + ttl`, saturating when out of range.
///
/// Overflow lands on [`never_expires`]; underflow from a negative TTL lands on
/// the Unix epoch so the paste is already expired.
pub fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    match now.checked_add_signed(ttl) {
        Some(at) => at.min(never_expires()),
        None if ttl < Duration::zero() => DateTime::<Utc>::UNIX_EPOCH,
        None => never_expires(),
    }
}

impl Paste {
    /// Build a system-named paste that the expiry sweep may remove.
    pub fn regular(id: String, content: Vec<u8>, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            content,
            is_persistent: false,
            expires_at,
        }
    }

    /// Build a caller-named paste that the expiry sweep never touches.
    pub fn persistent(id: String, content: Vec<u8>, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            content,
            is_persistent: true,
            expires_at,
        }
    }

    /// Whether the paste is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Whether the expiry sweep should remove this paste at `now`.
    pub fn is_sweepable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_persistent && self.is_expired_at(now)
    }

    /// Merge an update into this paste.
    ///
    /// Empty content and non-positive TTLs leave the corresponding field
    /// untouched.
    pub fn apply_update(&mut self, update: PasteUpdate, now: DateTime<Utc>) {
        if let Some(content) = update.content.filter(|content| !content.is_empty()) {
            self.content = content;
        }
        if let Some(ttl) = update.ttl.filter(|ttl| *ttl > Duration::zero()) {
            self.expires_at = expiry_after(now, ttl);
        }
    }
}
