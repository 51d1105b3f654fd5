#[cfg(test)]
#[path = "retry_test.rs"]
mod tests;

use std::future::Future;
use std::time::Duration;

use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::is_retryable;
use crate::domain::models::OVERLOADED_HINT;

pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

pub fn configured_max_retries() -> usize {
    return Config::get(ConfigKey::RetryMaxAttempts)
        .parse::<usize>()
        .unwrap_or(DEFAULT_MAX_RETRIES);
}

pub fn configured_initial_delay() -> Duration {
    let millis = Config::get(ConfigKey::RetryInitialDelay)
        .parse::<u64>()
        .unwrap_or(DEFAULT_INITIAL_DELAY.as_millis() as u64);

    return Duration::from_millis(millis);
}

/// Retries a fallible call with exponential backoff: after each retryable
/// failure the wrapper sleeps the current delay and doubles it, until the
/// budget of `max_retries` additional attempts is spent. Deterministic
/// failures (validation, unsupported media, missing sessions) propagate on
/// the first attempt without consuming any budget. The wrapper knows nothing
/// about what `operation` does beyond success or failure.
pub async fn with_retry<T, F, Fut>(
    mut operation: F,
    max_retries: usize,
    initial_delay: Duration,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut remaining = max_retries;
    let mut delay = initial_delay;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retryable(&err) {
            return Err(err);
        }

        if remaining == 0 {
            return Err(err.context(OVERLOADED_HINT));
        }

        tracing::warn!(
            error = ?err,
            remaining,
            delay_ms = delay.as_millis() as u64,
            "Retrying failed call"
        );

        tokio::time::sleep(delay).await;
        remaining -= 1;
        delay *= 2;
    }
}
