//! Timeout enforcement.
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - An attempt past its deadline is a failure, never a partial result
//! - Timeout errors are distinct from transport errors

use std::future::Future;
use std::time::Duration;

use crate::resilience::error::AttemptError;

/// Run one attempt under a hard deadline.
pub async fn with_deadline<T, F>(limit: Duration, attempt: F) -> Result<T, AttemptError>
where
    F: Future<Output = Result<T, AttemptError>>,
{
    match tokio::time::timeout(limit, attempt).await {
        Ok(result) => result,
        Err(_) => Err(AttemptError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_slow_attempt_times_out() {
        let result: Result<(), _> = with_deadline(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(AttemptError::Timeout(Duration::from_millis(20))));
    }

    #[tokio::test]
    async fn test_fast_attempt_passes_through() {
        let result = with_deadline(Duration::from_secs(1), async { Ok::<_, AttemptError>(7) }).await;
        assert_eq!(result, Ok(7));
    }
}
