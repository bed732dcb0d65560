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

use crate::error::{Result, TallyError};
use log::{debug, warn};
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

/// Ownership handle for an exclusive advisory lock on a counter resource.
///
/// The lock is released exactly once: explicitly through [`release`], which
/// surfaces unlock errors, or on drop as a fallback so no exit path leaks a
/// held lock.
///
/// [`release`]: LockHandle::release
#[derive(Debug)]
pub struct LockHandle {
    resource: String,
    lock_path: PathBuf,
    file: Option<File>,
    acquired_at: Instant,
    released: bool,
}

impl LockHandle {
    pub(crate) fn new(
        resource: String,
        lock_path: PathBuf,
        file: File,
        acquired_at: Instant,
    ) -> Self {
        Self {
            resource,
            lock_path,
            file: Some(file),
            acquired_at,
            released: false,
        }
    }

    /// Label of the resource this handle guards, for logs and errors.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn path(&self) -> &PathBuf {
        &self.lock_path
    }

    pub fn release(mut self) -> Result<()> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }

        let held = self.acquired_at.elapsed();
        if let Some(file) = self.file.take() {
            if let Err(err) = file.unlock() {
                self.released = true;
                warn!(
                    "Failed to release lock for counter '{}' ({}): {err}",
                    self.resource,
                    self.lock_path.display()
                );
                return Err(TallyError::LockRelease {
                    resource: self.resource.clone(),
                    details: err.to_string(),
                });
            }
            debug!(
                "Released lock for counter '{}' after {:.3}s",
                self.resource,
                held.as_secs_f64()
            );
        }
        self.released = true;
        Ok(())
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        if let Some(file) = self.file.take() {
            if let Err(err) = file.unlock() {
                warn!(
                    "Failed to unlock {} during drop: {err}",
                    self.lock_path.display()
                );
            } else {
                debug!(
                    "Released lock for counter '{}' on drop after {:.3}s",
                    self.resource,
                    self.acquired_at.elapsed().as_secs_f64()
                );
            }
        }

        self.released = true;
    }
}
