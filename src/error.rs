//! Error kinds surfaced by the catalog components. Store implementations work
//! with `anyhow` internally; the components translate those failures into one
//! of three outcomes that front-ends can map onto a response.

use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed or missing caller input, e.g. a non-numeric id.
    #[error("{0}")]
    Validation(String),

    /// The addressed song does not exist.
    #[error("Song {id} not found")]
    NotFound { id: i64 },

    /// A read against the store failed.
    #[error("failed to retrieve songs: {0:#}")]
    Retrieval(#[source] anyhow::Error),

    /// A write against the store failed.
    #[error("failed to modify songs: {0:#}")]
    Mutation(#[source] anyhow::Error),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }

    /// Whether the failure came from the caller rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CatalogError::Validation(_) | CatalogError::NotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn store_failures_keep_their_context() {
        let err = CatalogError::Retrieval(anyhow!("disk I/O error").context("failed to query songs"));
        let message = err.to_string();
        assert!(message.contains("failed to query songs"));
        assert!(message.contains("disk I/O error"));
        assert!(!err.is_client_error());
    }

    #[test]
    fn not_found_names_the_id() {
        let err = CatalogError::NotFound { id: 42 };
        assert_eq!(err.to_string(), "Song 42 not found");
        assert!(err.is_client_error());
    }
}
