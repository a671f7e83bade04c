// Bounded retry with a fixed delay

use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Execute a fallible operation up to three times, waiting a flat second
/// between attempts. No backoff: the delay stays fixed across attempts.
pub async fn with_fixed_retry<F, Fut, T, E>(f: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(
                    "Request failed (attempt {}/{}): {}; retrying in {:?}",
                    attempt,
                    MAX_ATTEMPTS,
                    e,
                    RETRY_DELAY
                );
                attempt += 1;
                sleep(RETRY_DELAY).await;
            }
            Err(e) => return Err(e),
        }
    }
}
