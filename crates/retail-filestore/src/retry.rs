//! Bounded retry for transient object-store failures.
//!
//! Conditional/lookup failures (not-found, precondition, already-exists)
//! signal real states the caller must see and are never retried.

use std::future::Future;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;

/// Whether a backend error is worth retrying.
pub fn is_transient(error: &object_store::Error) -> bool {
    !matches!(
        error,
        object_store::Error::NotFound { .. }
            | object_store::Error::AlreadyExists { .. }
            | object_store::Error::Precondition { .. }
            | object_store::Error::NotModified { .. }
            | object_store::Error::InvalidPath { .. }
            | object_store::Error::NotSupported { .. }
    )
}

/// Runs `action` with bounded exponential backoff on transient errors.
pub async fn with_retry<T, F, Fut>(action: F) -> Result<T, object_store::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, object_store::Error>>,
{
    let strategy = ExponentialBackoff::from_millis(50)
        .max_delay(Duration::from_secs(2))
        .map(jitter)
        .take(3);

    RetryIf::spawn(strategy, action, is_transient).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn not_found() -> object_store::Error {
        object_store::Error::NotFound {
            path: "x".into(),
            source: "gone".into(),
        }
    }

    fn generic() -> object_store::Error {
        object_store::Error::Generic {
            store: "test",
            source: "flaky".into(),
        }
    }

    #[test]
    fn test_not_found_is_not_transient() {
        assert!(!is_transient(&not_found()));
        assert!(is_transient(&generic()));
    }

    #[tokio::test]
    async fn test_retries_transient_then_succeeds() {
        let attempts = AtomicUsize::new(0);
        let result: Result<u32, _> = with_retry(|| {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(generic())
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_not_found_fails_fast() {
        let attempts = AtomicUsize::new(0);
        let result: Result<u32, _> = with_retry(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(not_found()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
