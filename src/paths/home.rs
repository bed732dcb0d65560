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
use crate::paths::shared::ensure_child_directory;
use std::env;
use std::path::{Path, PathBuf};

pub const COUNTERS_DIR: &str = "counters";
pub const TALLY_HOME_ENV: &str = "TALLY_HOME";
const DEFAULT_HOME_DIR: &str = ".tally";

/// Resolve the tally home directory from `TALLY_HOME` or the user's home.
pub fn tally_home() -> Result<PathBuf> {
    if let Some(home) = env::var_os(TALLY_HOME_ENV) {
        if home.is_empty() {
            return Err(TallyError::InvalidConfig(format!(
                "{TALLY_HOME_ENV} is set but empty"
            )));
        }
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir()
        .map(|home| home.join(DEFAULT_HOME_DIR))
        .ok_or_else(|| {
            TallyError::InvalidConfig(format!(
                "Could not determine the home directory; set {TALLY_HOME_ENV}"
            ))
        })
}

pub fn counters_dir(tally_home: &Path) -> PathBuf {
    tally_home.join(COUNTERS_DIR)
}

pub fn ensure_counters_dir(tally_home: &Path) -> Result<PathBuf> {
    ensure_child_directory(tally_home, COUNTERS_DIR)
}
