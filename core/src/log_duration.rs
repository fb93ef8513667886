use std::time::{Duration, Instant};

/// Logs the time elapsed between construction and drop.
///
/// ```
/// use search_core::LogDuration;
///
/// let _guard = LogDuration::new("rank batch");
/// // work measured until `_guard` goes out of scope
/// ```
#[derive(Debug)]
pub struct LogDuration {
    operation: String,
    start: Instant,
}

impl LogDuration {
    pub fn new(operation: impl Into<String>) -> Self {
        Self { operation: operation.into(), start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for LogDuration {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        tracing::info!(
            operation = %self.operation,
            elapsed_ms = elapsed.as_millis() as u64,
            "operation finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_monotonic() {
        let guard = LogDuration::new("test");
        let first = guard.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        assert!(guard.elapsed() > first);
    }
}
