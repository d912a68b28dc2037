//! Error types for chatlens-store

use thiserror::Error;

/// Errors raised while reading archives from disk.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Archive file does not exist
    #[error("archive not found: {path}")]
    ArchiveNotFound { path: String },

    /// SQLite open or query error
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Directory walk error during discovery
    #[error("archive discovery failed: {0}")]
    Walk(#[from] walkdir::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::ArchiveNotFound {
            path: "/tmp/missing.db".to_string(),
        };
        assert!(err.to_string().contains("archive not found"));
        assert!(err.to_string().contains("/tmp/missing.db"));
    }
}
