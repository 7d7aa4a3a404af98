//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// Canonical paste rows (`Paste`, bincode-encoded).
pub const PASTES: TableDefinition<&str, &[u8]> = TableDefinition::new("pastes");
/// Regular pastes ordered by expiry micros then id. Persistent pastes are never indexed.
pub const PASTES_BY_EXPIRY: TableDefinition<(i64, &str), ()> =
    TableDefinition::new("pastes_by_expiry");
/// Valid bearer tokens.
pub const TOKENS: TableDefinition<&str, ()> = TableDefinition::new("tokens");
