// src/utils/deadline.rs

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// Runs `fut` with an upper bound on wall time.
/// On expiry the error built by `on_timeout` is returned instead.
pub async fn within<T, F>(
    limit: Duration,
    fut: F,
    on_timeout: impl FnOnce(Duration) -> AppError,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(limit)),
    }
}

pub fn upstream_timeout(limit: Duration) -> AppError {
    AppError::Upstream(format!("completion timed out after {:?}", limit))
}

pub fn persistence_timeout(limit: Duration) -> AppError {
    AppError::Persistence(format!("data backend timed out after {:?}", limit))
}
