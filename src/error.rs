//! Error types for catalog operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors surfaced by the catalog core.
///
/// A missing object is not an error: lookups return `Ok(None)`. Image lookup
/// failures are produced inside [`crate::media`] and never escape it.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The configured database file does not exist.
    #[error("Database not found: {}", .0.display())]
    MissingDatabase(PathBuf),

    /// The store could not be opened or a query failed.
    #[error("Database error: {0}")]
    Backend(#[from] sqlx::Error),

    /// The thumbnail request failed at the transport level.
    #[error("Image lookup failed: {0}")]
    ImageLookup(#[from] reqwest::Error),

    /// The thumbnail service answered with a non-success status.
    #[error("Image lookup returned status {0}")]
    ImageStatus(u16),
}

impl CatalogError {
    /// True for storage failures that a host should report as unavailable.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::MissingDatabase(_) | Self::Backend(_))
    }
}
