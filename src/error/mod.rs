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

mod context;
mod exit_codes;
mod format;

pub use context::ErrorContext;
pub use exit_codes::get_exit_code;
pub use format::format_error_chain;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error(
        "Timed out waiting for lock on counter '{resource}' after {attempts} attempts ({waited_secs:.3}s)"
    )]
    LockTimeout {
        resource: String,
        attempts: u32,
        waited_secs: f64,
        details: String,
    },

    #[error("Failed to acquire lock for counter '{resource}': {details}")]
    LockAcquire { resource: String, details: String },

    #[error("Failed to release lock for counter '{resource}': {details}")]
    LockRelease { resource: String, details: String },

    #[error("Unexpected I/O failure on counter '{resource}': {source}")]
    UnexpectedIo {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Counter '{resource}' is at its maximum value and cannot be incremented")]
    CounterOverflow { resource: String },

    #[error("{0}")]
    AlreadyExists(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration file error: {0}")]
    ConfigError(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TallyError>;
