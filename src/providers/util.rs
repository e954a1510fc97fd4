use crate::core::error::ConverterError;
use std::fmt::Display;
use std::future::Future;
use tracing::debug;

/// Runs a single upstream call, turning any transport error into `ConverterError::Upstream`
/// with the original message. No retries.
///
/// # Parameters
/// - `operation`: Closure returning the request future
/// - `target`: Short label used in logs
pub async fn upstream_call<F, Fut, T, E>(operation: F, target: &str) -> Result<T, ConverterError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    operation().await.map_err(|err| {
        debug!("Upstream call to {} failed: {}", target, err);
        ConverterError::Upstream(err.to_string())
    })
}
