//! Token storage operations backed by redb.

use super::TokenStore;
use crate::{db::tables::TOKENS, error::AppError, models::token::Token};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for the `tokens` table.
pub struct TokenDb {
    db: Arc<redb::Database>,
}

impl TokenDb {
    /// Initialize the token table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(TOKENS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }
}

impl TokenStore for TokenDb {
    fn create(&self, token: &Token) -> Result<Token, AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut tokens = write_txn.open_table(TOKENS)?;
            if tokens.get(token.token.as_str())?.is_some() {
                return Err(AppError::Exists);
            }
            tokens.insert(token.token.as_str(), ())?;
        }
        write_txn.commit()?;
        Ok(token.clone())
    }

    fn list(&self) -> Result<Vec<Token>, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TOKENS)?;
        let mut tokens = Vec::new();
        for item in table.iter()? {
            let (key, _) = item?;
            tokens.push(Token::new(key.value()));
        }
        Ok(tokens)
    }

    fn delete(&self, token: &str) -> Result<(), AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut tokens = write_txn.open_table(TOKENS)?;
            if tokens.remove(token)?.is_none() {
                return Err(AppError::NotFound);
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    fn exists(&self, token: &str) -> Result<bool, AppError> {
        if token.is_empty() {
            return Ok(false);
        }
        let read_txn = self.db.begin_read()?;
        let tokens = read_txn.open_table(TOKENS)?;
        Ok(tokens.get(token)?.is_some())
    }
}
