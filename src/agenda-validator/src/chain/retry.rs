use std::future::Future;

use tracing::warn;

use crate::{config::RetryPolicy, errors::ChainError};

/// Run `fetch` until it yields `Some`, retrying provider errors and absent results with linear
/// backoff. After the last attempt the final outcome is returned as is.
pub async fn fetch_with_retry<T, F, Fut>(
    policy: RetryPolicy,
    what: &str,
    mut fetch: F,
) -> Result<Option<T>, ChainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, ChainError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let outcome = fetch().await;
        let retryable = !matches!(outcome, Ok(Some(_)));
        if !retryable || attempt >= attempts {
            return outcome;
        }

        match &outcome {
            Err(err) => warn!(what, attempt, error = %err, "lookup failed, retrying"),
            _ => warn!(what, attempt, "not found yet, retrying"),
        }
        tokio::time::sleep(policy.delay_after(attempt)).await;
        attempt += 1;
    }
}
