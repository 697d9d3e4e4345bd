//! Round executor configuration from TOML (`[executor]` section)

use conclave_application::config::DEFAULT_WORKER_CAP;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw executor configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// Maximum concurrent decision calls
    pub worker_cap: usize,
    /// Timeout in seconds for a single decision call
    pub timeout_seconds: Option<u64>,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            worker_cap: DEFAULT_WORKER_CAP,
            timeout_seconds: None,
        }
    }
}

impl FileExecutorConfig {
    pub fn unit_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}
