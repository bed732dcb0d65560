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
use crate::error::{Result, TallyError};
use crate::locking::handle::LockHandle;
use crate::locking::policy::RetryPolicy;
use crate::paths::locking::lock_path_for;
use log::debug;
use std::fs::TryLockError;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::thread;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireMode {
    Blocking,
    NonBlocking,
}

/// Serialises mutations of a shared counter across worker processes.
///
/// Exclusive ownership is taken through an OS advisory lock on a sibling
/// `.lock` file, so acquisition works before the counter itself exists.
/// Contended attempts retry with capped exponential backoff up to the
/// policy's retry budget; there is no fairness guarantee between waiters.
pub struct LockController {
    policy: RetryPolicy,
}

impl LockController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn with_config(config: &LockingConfig) -> Self {
        Self::new(RetryPolicy::from_config(config))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Acquire exclusive ownership of `resource`, retrying per the policy.
    pub fn acquire(&self, resource: &Path) -> Result<LockHandle> {
        match self.acquire_with_mode(resource, AcquireMode::Blocking)? {
            Some(handle) => Ok(handle),
            None => Err(TallyError::LockAcquire {
                resource: resource.display().to_string(),
                details: "Lock acquisition unexpectedly returned without handle".to_string(),
            }),
        }
    }

    /// Single non-blocking attempt; `None` when another holder has the lock.
    pub fn try_acquire(&self, resource: &Path) -> Result<Option<LockHandle>> {
        self.acquire_with_mode(resource, AcquireMode::NonBlocking)
    }

    fn acquire_with_mode(
        &self,
        resource: &Path,
        mode: AcquireMode,
    ) -> Result<Option<LockHandle>> {
        let label = resource.display().to_string();
        let lock_path = lock_path_for(resource);

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|err| TallyError::LockAcquire {
                resource: label.clone(),
                details: format!(
                    "Failed to ensure parent directory {} exists: {err}",
                    parent.display()
                ),
            })?;
        }

        let file = prepare_lock_file(&lock_path).map_err(|err| TallyError::LockAcquire {
            resource: label.clone(),
            details: format!("Failed to open lock file {}: {err}", lock_path.display()),
        })?;

        let acquisition_start = Instant::now();
        let mut backoff = self.policy.backoff();
        let mut retries: u32 = 0;
        let mut last_detail: Option<String> = None;

        loop {
            match try_lock_exclusive(&file) {
                Ok(()) => {
                    debug!(
                        "Acquired lock for counter '{label}' after {:.3}s ({retries} retries)",
                        acquisition_start.elapsed().as_secs_f64()
                    );
                    return Ok(Some(LockHandle::new(
                        label,
                        lock_path,
                        file,
                        acquisition_start,
                    )));
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    if mode == AcquireMode::NonBlocking {
                        return Ok(None);
                    }

                    if retries >= self.policy.max_retries() {
                        let waited = acquisition_start.elapsed();
                        let detail = last_detail.take().unwrap_or_else(|| err.to_string());
                        return Err(TallyError::LockTimeout {
                            resource: label,
                            attempts: retries + 1,
                            waited_secs: waited.as_secs_f64(),
                            details: detail,
                        });
                    }

                    retries += 1;
                    let delay = backoff.next_delay();
                    debug!(
                        "Counter '{label}' is locked elsewhere; retry {retries}/{} in {delay:?}",
                        self.policy.max_retries()
                    );
                    last_detail = Some(err.to_string());
                    thread::sleep(delay);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                    last_detail = Some(err.to_string());
                    continue;
                }
                Err(err) => {
                    return Err(TallyError::LockAcquire {
                        resource: label,
                        details: err.to_string(),
                    });
                }
            }
        }
    }
}

fn prepare_lock_file(lock_path: &Path) -> io::Result<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = fs::Permissions::from_mode(0o600);
        fs::set_permissions(lock_path, permissions)?;
    }

    Ok(file)
}

fn try_lock_exclusive(file: &File) -> io::Result<()> {
    match file.try_lock() {
        Ok(()) => Ok(()),
        Err(TryLockError::WouldBlock) => Err(io::Error::new(
            io::ErrorKind::WouldBlock,
            "lock would block",
        )),
        Err(TryLockError::Error(err)) => Err(err),
    }
}
