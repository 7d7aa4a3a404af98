//! Bearer token model.

use serde::{Deserialize, Serialize};

/// Opaque bearer credential. Presence in the token store is the whole capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
}

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}
