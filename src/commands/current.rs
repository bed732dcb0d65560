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

pub struct CurrentCommand<'a> {
    config: &'a TallyConfig,
}

impl<'a> CurrentCommand<'a> {
    pub fn new(config: &'a TallyConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self, resource: &str, quiet: bool, json: bool) -> Result<()> {
        let path = self.config.resolve_resource(Path::new(resource));
        let store = CounterStore::with_config(self.config);

        // Reading through the lock; direct readers get no consistency guarantee.
        let value = store.peek(&path)?;

        if json {
            let output = serde_json::json!({
                "resource": resource,
                "path": path.display().to_string(),
                "value": value,
                "initialized": value.is_some(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if quiet {
            println!("{}", value.unwrap_or(0));
        } else {
            match value {
                Some(value) => println!("Counter '{resource}' is at {value}"),
                None => println!("Counter '{resource}' is not initialized (reads as 0)"),
            }
        }

        Ok(())
    }
}
