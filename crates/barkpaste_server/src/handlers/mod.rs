//! HTTP request handlers.

/// Header parsing shared by the handlers.
pub mod headers;
/// Paste endpoints.
pub mod paste;
/// Token endpoints.
pub mod token;
