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

use crate::error::TallyError;
use std::fmt;

pub struct ErrorContext<'a> {
    pub error: &'a TallyError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(error: &'a TallyError) -> Self {
        let (suggestion, details) = match error {
            TallyError::LockTimeout {
                attempts, details, ..
            } => {
                let suggestion = Some(
                    "Another process is holding the counter lock. The operation is safe to \
                     retry. If contention is expected, raise 'max_retries' or 'max_backoff_ms' \
                     in the [locking] section of config.toml."
                        .to_string(),
                );
                let details = if details.is_empty() {
                    None
                } else {
                    Some(format!(
                        "Gave up after {attempts} attempts. Last contention detail: {details}"
                    ))
                };
                (suggestion, details)
            }
            TallyError::LockAcquire { .. } => {
                let suggestion = Some(
                    "Check that the counter directory exists, is writable, and lives on a \
                     filesystem that supports advisory file locks."
                        .to_string(),
                );
                (suggestion, None)
            }
            TallyError::LockRelease { .. } => {
                let suggestion = Some(
                    "The lock file may have been removed or the filesystem remounted while \
                     the operation was running."
                        .to_string(),
                );
                (suggestion, None)
            }
            TallyError::UnexpectedIo { resource, .. } => {
                let suggestion = Some(
                    "Check permissions and free space on the counter's filesystem. The \
                     counter was left at its previous committed value."
                        .to_string(),
                );
                let details = Some(format!("Resource: {resource}"));
                (suggestion, details)
            }
            TallyError::CounterOverflow { resource } => {
                let suggestion = Some(format!(
                    "The counter has reached u64::MAX. Reset it with 'tally init {resource} \
                     --force' to start a new sequence."
                ));
                (suggestion, None)
            }
            TallyError::AlreadyExists(_) => {
                let suggestion =
                    Some("Use --force to reinitialize an existing counter.".to_string());
                (suggestion, None)
            }
            TallyError::InvalidConfig(msg) | TallyError::ConfigError(msg) => {
                let suggestion = Some(
                    "Check config.toml under the tally home directory (TALLY_HOME or \
                     ~/.tally)."
                        .to_string(),
                );
                let details = Some(msg.clone());
                (suggestion, details)
            }
            TallyError::PermissionDenied(path) => {
                let suggestion = if cfg!(unix) {
                    Some(format!(
                        "Check ownership of {path} or rerun with appropriate privileges \
                         (e.g., sudo)."
                    ))
                } else {
                    Some(format!(
                        "Check permissions of {path} or rerun as Administrator."
                    ))
                };
                (suggestion, None)
            }
            _ => (None, None),
        };

        ErrorContext {
            error,
            suggestion,
            details,
        }
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}
