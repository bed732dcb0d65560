// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::LockingConfig;
use std::cmp;
use std::time::Duration;

/// Bounded retry policy for lock acquisition: how many contended attempts to
/// make and how long to wait between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff: cmp::min(initial_backoff, max_backoff),
            max_backoff,
        }
    }

    pub fn from_config(config: &LockingConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.initial_backoff_ms),
            Duration::from_millis(config.max_backoff_ms),
        )
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    /// Fresh backoff sequence for one acquisition attempt.
    pub fn backoff(&self) -> AcquireBackoff {
        AcquireBackoff::new(self.initial_backoff, self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&LockingConfig::default())
    }
}

/// Exponential backoff sequence used while polling a contended lock.
#[derive(Debug, Clone)]
pub struct AcquireBackoff {
    cap: Duration,
    current: Duration,
}

impl AcquireBackoff {
    fn new(initial: Duration, cap: Duration) -> Self {
        Self {
            cap,
            current: cmp::min(initial, cap),
        }
    }

    /// Returns the current delay and advances the sequence.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        let next = self.current.saturating_mul(2);
        self.current = cmp::min(next, self.cap);
        delay
    }

    pub fn peek(&self) -> Duration {
        self.current
    }
}
