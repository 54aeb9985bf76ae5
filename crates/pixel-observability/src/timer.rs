//! Operation timing.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Times one named operation and logs the outcome when finished.
///
/// Operations slower than the warn threshold are logged at `warn`.
#[derive(Debug)]
pub struct OperationTimer {
    name: &'static str,
    started: Instant,
    warn_after: Duration,
}

impl OperationTimer {
    /// Default threshold above which an operation is reported as slow.
    pub const DEFAULT_WARN_AFTER: Duration = Duration::from_secs(2);

    /// Start timing.
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            started: Instant::now(),
            warn_after: Self::DEFAULT_WARN_AFTER,
        }
    }

    /// Override the slow-operation threshold.
    pub fn warn_after(mut self, threshold: Duration) -> Self {
        self.warn_after = threshold;
        self
    }

    /// Operation name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Log completion and hand back the operation's result untouched.
    pub fn finish<T, E: std::fmt::Display>(self, result: Result<T, E>) -> Result<T, E> {
        let elapsed_ms = self.elapsed().as_millis() as u64;
        match &result {
            Ok(_) if self.elapsed() > self.warn_after => {
                warn!(operation = self.name, elapsed_ms, "slow operation");
            }
            Ok(_) => debug!(operation = self.name, elapsed_ms, "operation finished"),
            Err(e) => warn!(operation = self.name, elapsed_ms, error = %e, "operation failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_passes_result_through() {
        let timer = OperationTimer::start("products.list");
        assert_eq!(timer.name(), "products.list");
        let ok: Result<u32, String> = timer.finish(Ok(3));
        assert_eq!(ok, Ok(3));

        let timer = OperationTimer::start("orders.create").warn_after(Duration::ZERO);
        let err: Result<u32, String> = timer.finish(Err("boom".to_string()));
        assert_eq!(err, Err("boom".to_string()));
    }
}
