//! Session configuration

use std::time::Duration;

/// Question session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Interval between status polls for an outstanding task
    ///
    /// The first poll fires one full interval after the task is started,
    /// never immediately.
    pub poll_interval: Duration,

    /// How many retrieved chunks the backend hands to the generator
    pub num_chunks: usize,
}

impl SessionConfig {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.num_chunks == 0 {
            anyhow::bail!("num_chunks must be greater than 0");
        }

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(3000),
            num_chunks: 5,
        }
    }
}
