//! Error types for the exercise store.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors surfaced by the exercise store and its backends.
///
/// None of these are recovered locally: each maps directly to an HTTP status
/// in the gateway and is returned verbatim to the caller. No retries happen
/// anywhere in the service.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The supplied identifier is not a well-formed exercise id.
    #[error("Invalid exercise id format: {0}")]
    InvalidId(String),
    /// No stored exercise matches the identifier.
    #[error("Exercise not found")]
    NotFound,
    /// The backing store has not been attached yet. Requests fail fast
    /// rather than queue while the connection is being established.
    #[error("Database not connected yet. Please try again.")]
    Unavailable,
    /// An unexpected error from the underlying storage backend.
    #[error("Storage backend error: {0}")]
    Backend(String),
    /// A document failed to serialize for storage.
    #[error("Encode error: {0}")]
    Encode(String),
    /// A stored document failed to deserialize.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ErrorCode for StoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "STORE_INVALID_ID",
            Self::NotFound => "STORE_NOT_FOUND",
            Self::Unavailable => "STORE_UNAVAILABLE",
            Self::Backend(_) => "STORE_BACKEND_ERROR",
            Self::Encode(_) => "STORE_ENCODE_ERROR",
            Self::Decode(_) => "STORE_DECODE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let variants = [
            StoreError::InvalidId("x".into()),
            StoreError::NotFound,
            StoreError::Unavailable,
            StoreError::Backend("b".into()),
            StoreError::Encode("e".into()),
            StoreError::Decode("d".into()),
        ];
        let mut codes: Vec<_> = variants.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), variants.len());
    }

    #[test]
    fn unavailable_message_matches_wire_contract() {
        // The gateway surfaces this message verbatim in 503 bodies.
        assert_eq!(
            StoreError::Unavailable.to_string(),
            "Database not connected yet. Please try again."
        );
    }
}
