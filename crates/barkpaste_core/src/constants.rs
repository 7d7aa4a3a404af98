//! Shared constants used across barkpaste crates.

/// Default listen address for the HTTP server.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8888";

/// Default lifetime of a regular paste, in seconds (one day).
pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;

/// Default size ceiling for anonymous regular pastes.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 1024 * 1024;

/// Default maximum HTTP request body accepted by the server.
pub const DEFAULT_BODY_LIMIT: usize = 200 * 1024 * 1024;

/// Token inserted into an empty token store at first startup.
pub const DEFAULT_TOKEN: &str = "verycooltokensir";

/// Default interval between expiry sweeps, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Length of system-assigned regular paste ids.
pub const SHORT_ID_LEN: usize = 8;

/// Length of minted bearer tokens.
pub const LONG_TOKEN_LEN: usize = 32;

/// URL-safe alphabet used for ids and tokens.
pub const ID_ALPHABET: &[u8] = b"_-0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Largest TTL, in seconds, representable as a `chrono::Duration`.
pub const MAX_TTL_SECS: i64 = i64::MAX / 1_000;
