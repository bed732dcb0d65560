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

use crate::config::TallyConfig;
use crate::error::{Result, TallyError};
use crate::locking::LockController;
use crate::paths::locking::temp_path_for;
use crate::platform::file_ops::atomic_rename;
use log::{debug, info};
use std::fs;
use std::io;
use std::path::Path;

/// Reads and advances the persisted value of a counter resource while
/// holding its lock.
///
/// The persisted format is the base-10 decimal text of a non-negative
/// integer with no trailing delimiters. An absent resource reads as 0 and is
/// initialized on first use; non-numeric content also reads as 0. The file
/// is re-read on every operation, never cached.
pub struct CounterStore {
    controller: LockController,
}

impl CounterStore {
    pub fn new(controller: LockController) -> Self {
        Self { controller }
    }

    pub fn with_config(config: &TallyConfig) -> Self {
        Self::new(LockController::with_config(&config.locking))
    }

    pub fn controller(&self) -> &LockController {
        &self.controller
    }

    /// Acquire the resource's lock, persist the successor of its current
    /// value, and release. Returns the committed value.
    pub fn increment(&self, resource: &Path) -> Result<u64> {
        let handle = self.controller.acquire(resource)?;
        // An error here drops the handle, which releases the lock.
        let value = self.read_and_increment(resource)?;
        handle.release()?;
        Ok(value)
    }

    fn read_and_increment(&self, resource: &Path) -> Result<u64> {
        let current = self.read_or_default(resource)?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| TallyError::CounterOverflow {
                resource: resource.display().to_string(),
            })?;
        write_value(resource, next)?;
        debug!(
            "Counter '{}' advanced {current} -> {next}",
            resource.display()
        );
        Ok(next)
    }

    /// Current committed value, defaulting both absence and malformed
    /// content to 0. An absent resource is initialized to "0" while the lock
    /// is held, so later readers find well-formed content.
    fn read_or_default(&self, resource: &Path) -> Result<u64> {
        match fs::read_to_string(resource) {
            Ok(text) => match parse_value(&text) {
                Some(value) => Ok(value),
                None => {
                    debug!(
                        "Counter '{}' holds non-numeric content; treating as 0",
                        resource.display()
                    );
                    Ok(0)
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(
                    "Counter '{}' does not exist; initializing to 0",
                    resource.display()
                );
                write_value(resource, 0)?;
                Ok(0)
            }
            Err(err) => Err(unexpected_io(resource, err)),
        }
    }

    /// Committed value without advancing it. `None` when the resource has
    /// never been written; malformed content reads as `Some(0)`.
    pub fn peek(&self, resource: &Path) -> Result<Option<u64>> {
        let handle = self.controller.acquire(resource)?;
        let value = match fs::read_to_string(resource) {
            Ok(text) => Some(parse_value(&text).unwrap_or(0)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(unexpected_io(resource, err)),
        };
        handle.release()?;
        Ok(value)
    }

    /// Create the resource with value 0. Refuses to clobber an existing
    /// resource unless `force` is set.
    pub fn initialize(&self, resource: &Path, force: bool) -> Result<()> {
        let handle = self.controller.acquire(resource)?;
        if resource.exists() && !force {
            return Err(TallyError::AlreadyExists(format!(
                "Counter '{}' already exists",
                resource.display()
            )));
        }
        write_value(resource, 0)?;
        handle.release()?;
        Ok(())
    }
}

/// Parse persisted counter text; `None` when it is not a non-negative
/// integer.
fn parse_value(text: &str) -> Option<u64> {
    text.trim().parse::<u64>().ok()
}

/// Persist `value` as decimal text, fully replacing prior content. The new
/// value is staged in a sibling temp file and renamed over the resource so a
/// failed write leaves the previous committed value intact.
fn write_value(resource: &Path, value: u64) -> Result<()> {
    if let Some(parent) = resource.parent() {
        fs::create_dir_all(parent).map_err(|err| unexpected_io(resource, err))?;
    }

    let temp_path = temp_path_for(resource);

    // Clean up any leftover temp file from previous failed attempts
    if temp_path.exists() {
        fs::remove_file(&temp_path).map_err(|err| unexpected_io(resource, err))?;
    }

    fs::write(&temp_path, value.to_string()).map_err(|err| unexpected_io(resource, err))?;

    atomic_rename(&temp_path, resource).map_err(|err| unexpected_io(resource, err))
}

fn unexpected_io(resource: &Path, source: io::Error) -> TallyError {
    TallyError::UnexpectedIo {
        resource: resource.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locking::RetryPolicy;
    use std::time::Duration;
    use tempfile::TempDir;

    fn store() -> CounterStore {
        CounterStore::new(LockController::new(RetryPolicy::new(
            2,
            Duration::from_millis(1),
            Duration::from_millis(5),
        )))
    }

    #[test]
    fn increment_advances_existing_value() {
        let temp = TempDir::new().unwrap();
        let resource = temp.path().join("number.txt");
        fs::write(&resource, "7").unwrap();

        let value = store().increment(&resource).unwrap();

        assert_eq!(value, 8);
        assert_eq!(fs::read_to_string(&resource).unwrap(), "8");
    }

    #[test]
    fn increment_initializes_absent_resource() {
        let temp = TempDir::new().unwrap();
        let resource = temp.path().join("number.txt");

        let value = store().increment(&resource).unwrap();

        assert_eq!(value, 1);
        assert_eq!(fs::read_to_string(&resource).unwrap(), "1");
    }

    #[test]
    fn increment_defaults_malformed_content_to_zero() {
        let temp = TempDir::new().unwrap();
        let resource = temp.path().join("number.txt");
        fs::write(&resource, "abc").unwrap();

        let value = store().increment(&resource).unwrap();

        assert_eq!(value, 1);
        assert_eq!(fs::read_to_string(&resource).unwrap(), "1");
    }

    #[test]
    fn increment_accepts_trailing_whitespace() {
        let temp = TempDir::new().unwrap();
        let resource = temp.path().join("number.txt");
        fs::write(&resource, "41\n").unwrap();

        assert_eq!(store().increment(&resource).unwrap(), 42);
    }

    #[test]
    fn increment_fails_at_maximum_without_mutating() {
        let temp = TempDir::new().unwrap();
        let resource = temp.path().join("number.txt");
        fs::write(&resource, u64::MAX.to_string()).unwrap();

        let err = store().increment(&resource).unwrap_err();

        assert!(matches!(err, TallyError::CounterOverflow { .. }));
        assert_eq!(
            fs::read_to_string(&resource).unwrap(),
            u64::MAX.to_string()
        );
    }

    #[test]
    fn peek_reads_without_advancing() {
        let temp = TempDir::new().unwrap();
        let resource = temp.path().join("number.txt");
        let store = store();

        assert_eq!(store.peek(&resource).unwrap(), None);

        fs::write(&resource, "12").unwrap();
        assert_eq!(store.peek(&resource).unwrap(), Some(12));
        assert_eq!(fs::read_to_string(&resource).unwrap(), "12");
    }

    #[test]
    fn peek_reports_malformed_content_as_zero() {
        let temp = TempDir::new().unwrap();
        let resource = temp.path().join("number.txt");
        fs::write(&resource, "not a number").unwrap();

        assert_eq!(store().peek(&resource).unwrap(), Some(0));
    }

    #[test]
    fn initialize_refuses_existing_resource() {
        let temp = TempDir::new().unwrap();
        let resource = temp.path().join("number.txt");
        let store = store();

        store.initialize(&resource, false).unwrap();
        assert_eq!(fs::read_to_string(&resource).unwrap(), "0");

        let err = store.initialize(&resource, false).unwrap_err();
        assert!(matches!(err, TallyError::AlreadyExists(_)));
    }

    #[test]
    fn initialize_force_resets_value() {
        let temp = TempDir::new().unwrap();
        let resource = temp.path().join("number.txt");
        fs::write(&resource, "99").unwrap();

        store().initialize(&resource, true).unwrap();

        assert_eq!(fs::read_to_string(&resource).unwrap(), "0");
    }

    #[test]
    fn parse_value_accepts_only_non_negative_integers() {
        assert_eq!(parse_value("7"), Some(7));
        assert_eq!(parse_value(" 7 \n"), Some(7));
        assert_eq!(parse_value("0"), Some(0));
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("-1"), None);
        assert_eq!(parse_value("7.5"), None);
        assert_eq!(parse_value(""), None);
    }
}
