// Fixed-interval polling with a monotonic deadline and cancellation
//
// The voice pipeline exposes job state as a poll-only endpoint. This loop
// fetches on a fixed interval until the caller's predicate reports a terminal
// value, the deadline passes, or the cancellation token fires. Cancellation
// takes effect during the inter-poll sleep; an in-flight fetch is allowed to
// finish.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum PollError<E> {
    #[error("polling timed out after {waited:?}")]
    Timeout { waited: Duration },

    #[error("polling was cancelled")]
    Cancelled,

    #[error("poll fetch failed: {0}")]
    Failed(E),
}

/// Poll `fetch` every `interval` until `is_terminal` accepts a value.
///
/// The deadline is checked against a monotonic clock; a fetch that starts
/// before the deadline may complete after it and still win. A fetch error
/// aborts the loop immediately.
pub async fn poll_until<T, E, F, Fut>(
    interval: Duration,
    timeout: Duration,
    cancel: &CancellationToken,
    mut fetch: F,
    mut is_terminal: impl FnMut(&T) -> bool,
) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let started = Instant::now();
    let deadline = started + timeout;

    loop {
        if cancel.is_cancelled() {
            return Err(PollError::Cancelled);
        }

        let value = fetch().await.map_err(PollError::Failed)?;
        if is_terminal(&value) {
            return Ok(value);
        }

        let now = Instant::now();
        if now + interval > deadline {
            return Err(PollError::Timeout {
                waited: now.duration_since(started),
            });
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(PollError::Cancelled),
            _ = sleep(interval) => {}
        }
    }
}
