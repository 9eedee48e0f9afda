use std::fmt;

use log::{info, warn};

/// Single place for callers to record matrix workflow progress.
pub struct LogManager {
    scope: String,
}

impl LogManager {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.scope, message);
    }

    pub fn record_failure(&self, operation: &str, error: impl fmt::Display) {
        warn!("[{}] {} failed: {}", self.scope, operation, error);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("matrixcore")
    }
}
