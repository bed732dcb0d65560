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
use crate::counter::CounterStore;
use crate::error::Result;
use std::path::Path;

pub struct InitCommand<'a> {
    config: &'a TallyConfig,
}

impl<'a> InitCommand<'a> {
    pub fn new(config: &'a TallyConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self, resource: &str, force: bool) -> Result<()> {
        let path = self.config.resolve_resource(Path::new(resource));
        let store = CounterStore::with_config(self.config);

        store.initialize(&path, force)?;
        println!("Initialized counter '{resource}' at {}", path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TallyError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn execute_creates_zero_valued_counter() {
        let temp = TempDir::new().unwrap();
        let config = TallyConfig::new(temp.path().to_path_buf()).unwrap();
        let command = InitCommand::new(&config).unwrap();

        command.execute("jobs", false).unwrap();

        let resource = temp.path().join("counters").join("jobs");
        assert_eq!(fs::read_to_string(resource).unwrap(), "0");
    }

    #[test]
    fn execute_requires_force_to_reinitialize() {
        let temp = TempDir::new().unwrap();
        let config = TallyConfig::new(temp.path().to_path_buf()).unwrap();
        let command = InitCommand::new(&config).unwrap();

        command.execute("jobs", false).unwrap();
        let err = command.execute("jobs", false).unwrap_err();
        assert!(matches!(err, TallyError::AlreadyExists(_)));

        command.execute("jobs", true).unwrap();
    }
}
