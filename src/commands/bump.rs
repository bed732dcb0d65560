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
use crate::counter::{CounterStore, correlation};
use crate::error::Result;
use crate::locking::LockController;
use log::info;
use std::path::Path;

/// The handler the task-queue collaborator invokes: increment a counter and
/// print each committed value.
pub struct BumpCommand<'a> {
    config: &'a TallyConfig,
}

impl<'a> BumpCommand<'a> {
    pub fn new(config: &'a TallyConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(
        &self,
        resource: &str,
        count: u64,
        retries: Option<u32>,
        max_backoff_ms: Option<u64>,
    ) -> Result<()> {
        let path = self.config.resolve_resource(Path::new(resource));

        let mut locking = self.config.locking.clone();
        if let Some(retries) = retries {
            locking.max_retries = retries;
        }
        if let Some(ms) = max_backoff_ms {
            locking.max_backoff_ms = ms;
        }
        let store = CounterStore::new(LockController::with_config(&locking));

        for _ in 0..count {
            let op_id = correlation::next_op_id();
            let value = store.increment(&path)?;
            info!("op {op_id}: counter '{resource}' now {value}");
            println!("{value}");
        }

        Ok(())
    }
}
