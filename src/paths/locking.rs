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

use std::ffi::OsString;
use std::path::{Path, PathBuf};

const LOCK_SUFFIX: &str = ".lock";
const TEMP_SUFFIX: &str = ".tmp";

/// Sibling lock-file path for a counter resource.
///
/// The lock lives next to the resource so it can be taken before the
/// resource itself exists.
pub fn lock_path_for(resource: &Path) -> PathBuf {
    sibling_with_suffix(resource, LOCK_SUFFIX)
}

/// Sibling temp-file path used to stage a counter write before renaming it
/// over the resource.
pub fn temp_path_for(resource: &Path) -> PathBuf {
    sibling_with_suffix(resource, TEMP_SUFFIX)
}

fn sibling_with_suffix(resource: &Path, suffix: &str) -> PathBuf {
    let mut name = resource
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("counter"));
    name.push(suffix);
    resource.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_path_appends_suffix_to_full_file_name() {
        assert_eq!(
            lock_path_for(Path::new("/data/number.txt")),
            PathBuf::from("/data/number.txt.lock")
        );
        assert_eq!(
            lock_path_for(Path::new("jobs")),
            PathBuf::from("jobs.lock")
        );
    }

    #[test]
    fn temp_path_does_not_collide_across_extensions() {
        let txt = temp_path_for(Path::new("/data/number.txt"));
        let json = temp_path_for(Path::new("/data/number.json"));
        assert_eq!(txt, PathBuf::from("/data/number.txt.tmp"));
        assert_ne!(txt, json);
    }

    #[test]
    fn sibling_paths_preserve_parent_directory() {
        let lock = lock_path_for(Path::new("/var/lib/tally/counters/jobs"));
        assert_eq!(lock.parent(), Some(Path::new("/var/lib/tally/counters")));
    }
}
