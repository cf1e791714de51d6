//! Deadline wrapper for provider calls

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::LlmError;

/// Run a provider call with a deadline
///
/// On expiry the inner future is dropped, which cancels the in-flight HTTP
/// request. A late reply can therefore never complete the call.
pub async fn with_timeout<T, F>(after: Duration, call: F) -> Result<T, LlmError>
where
    F: Future<Output = Result<T, LlmError>>,
{
    match tokio::time::timeout(after, call).await {
        Ok(result) => result,
        Err(_) => {
            debug!(?after, "with_timeout: deadline elapsed");
            Err(LlmError::Timeout(after))
        }
    }
}
