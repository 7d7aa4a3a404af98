//! Paste storage operations backed by redb.

use super::PasteStore;
use crate::{db::tables::*, error::AppError, models::paste::Paste};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for paste-related redb tables.
pub struct PasteDb {
    db: Arc<redb::Database>,
}

fn expiry_key(expires_at: DateTime<Utc>) -> i64 {
    expires_at.timestamp_micros()
}

fn deserialize_paste(bytes: &[u8]) -> Result<Paste, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

impl PasteDb {
    /// Initialize paste tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.open_table(PASTES_BY_EXPIRY)?;
        write_txn.commit()?;
        Ok(Self { db })
    }
}

impl PasteStore for PasteDb {
    fn create(&self, paste: &Paste) -> Result<Paste, AppError> {
        let encoded = bincode::serialize(paste)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            if pastes.get(paste.id.as_str())?.is_some() {
                return Err(AppError::Exists);
            }

            pastes.insert(paste.id.as_str(), encoded.as_slice())?;
            if !paste.is_persistent {
                by_expiry.insert((expiry_key(paste.expires_at), paste.id.as_str()), ())?;
            }
        }
        write_txn.commit()?;
        tracing::debug!(id = %paste.id, persistent = paste.is_persistent, "Stored paste");
        Ok(paste.clone())
    }

    fn get_by_id(&self, id: &str) -> Result<Paste, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        match pastes.get(id)? {
            Some(value) => deserialize_paste(value.value()),
            None => Err(AppError::NotFound),
        }
    }

    fn list(&self) -> Result<Vec<Paste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes_table = read_txn.open_table(PASTES)?;
        let mut pastes = Vec::new();
        for item in pastes_table.iter()? {
            let (_, value) = item?;
            pastes.push(deserialize_paste(value.value())?);
        }
        Ok(pastes)
    }

    fn update(&self, paste: &Paste) -> Result<Paste, AppError> {
        let write_txn = self.db.begin_write()?;
        let stored = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            let Some(old_guard) = pastes.get(paste.id.as_str())? else {
                return Err(AppError::NotFound);
            };
            let old = deserialize_paste(old_guard.value())?;
            drop(old_guard);

            let next = Paste {
                is_persistent: old.is_persistent,
                ..paste.clone()
            };
            let encoded = bincode::serialize(&next)?;
            pastes.insert(next.id.as_str(), encoded.as_slice())?;

            if !old.is_persistent {
                let _ = by_expiry.remove((expiry_key(old.expires_at), old.id.as_str()))?;
                by_expiry.insert((expiry_key(next.expires_at), next.id.as_str()), ())?;
            }
            next
        };
        write_txn.commit()?;
        tracing::debug!(id = %stored.id, "Updated paste");
        Ok(stored)
    }

    fn delete(&self, id: &str) -> Result<Paste, AppError> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            let Some(old_guard) = pastes.get(id)? else {
                return Err(AppError::NotFound);
            };
            let paste = deserialize_paste(old_guard.value())?;
            drop(old_guard);

            if !paste.is_persistent {
                let _ = by_expiry.remove((expiry_key(paste.expires_at), id))?;
            }
            let _ = pastes.remove(id)?;
            paste
        };
        write_txn.commit()?;
        tracing::debug!(id = %deleted.id, "Deleted paste");
        Ok(deleted)
    }

    fn clean_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let cutoff = expiry_key(now);

        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            let mut candidates: Vec<(i64, String)> = Vec::new();
            for item in by_expiry.iter()? {
                let (key, _) = item?;
                let (expires_micros, id) = key.value();
                if expires_micros > cutoff {
                    break;
                }
                candidates.push((expires_micros, id.to_string()));
            }

            let mut removed = 0usize;
            for (expires_micros, id) in candidates {
                let paste = match pastes.get(id.as_str())? {
                    Some(guard) => Some(deserialize_paste(guard.value())?),
                    None => None,
                };
                match paste {
                    // Index row without a paste; drop it so it is not revisited.
                    None => {
                        let _ = by_expiry.remove((expires_micros, id.as_str()))?;
                    }
                    Some(paste) if paste.is_sweepable_at(now) => {
                        let _ = by_expiry.remove((expires_micros, id.as_str()))?;
                        let _ = pastes.remove(id.as_str())?;
                        removed += 1;
                    }
                    Some(_) => {}
                }
            }
            removed
        };
        write_txn.commit()?;

        if removed > 0 {
            tracing::info!("Removed {} expired paste(s)", removed);
        }
        Ok(removed)
    }
}
