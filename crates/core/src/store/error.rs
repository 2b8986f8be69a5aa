use thiserror::Error;

/// Errors that can occur when talking to the remote document store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Remote read failed at {path}: {cause}")]
    RemoteReadFailed { path: String, cause: String },
    #[error("Subscription to {collection} failed: {cause}")]
    SubscriptionFailed { collection: String, cause: String },
    #[error("Batch commit failed: {cause}")]
    BatchFailed { cause: String },
    #[error("Invalid document path: {0}")]
    InvalidPath(String),
    #[error("Operation timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
    #[error("Failed to decode {collection} document: {cause}")]
    Decode { collection: String, cause: String },
}

impl StoreError {
    /// Returns true for failures that a retry has a chance of resolving.
    ///
    /// Path and shape errors are deterministic and never retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::RemoteReadFailed { .. } | StoreError::Timeout { .. }
        )
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_read_failed_display() {
        let error = StoreError::RemoteReadFailed {
            path: "vehicles/abc-123".to_string(),
            cause: "connection reset".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Remote read failed at vehicles/abc-123: connection reset"
        );
    }

    #[test]
    fn test_subscription_failed_display() {
        let error = StoreError::SubscriptionFailed {
            collection: "bikeTours".to_string(),
            cause: "permission denied".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Subscription to bikeTours failed: permission denied"
        );
    }

    #[test]
    fn test_batch_failed_display() {
        let error = StoreError::BatchFailed {
            cause: "update on missing document".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Batch commit failed: update on missing document"
        );
    }

    #[test]
    fn test_timeout_display() {
        let error = StoreError::Timeout { after_ms: 10_000 };
        assert_eq!(error.to_string(), "Operation timed out after 10000ms");
    }

    #[test]
    fn test_transient_classification() {
        assert!(StoreError::Timeout { after_ms: 1 }.is_transient());
        assert!(StoreError::RemoteReadFailed {
            path: "a/b".into(),
            cause: "x".into()
        }
        .is_transient());

        assert!(!StoreError::InvalidPath("vehicles".into()).is_transient());
        assert!(!StoreError::BatchFailed { cause: "x".into() }.is_transient());
        assert!(!StoreError::Decode {
            collection: "vehicles".into(),
            cause: "x".into()
        }
        .is_transient());
    }
}
