//! Data models for API requests and persistence.

/// Paste data models.
pub mod paste;
/// Bearer token models.
pub mod token;
