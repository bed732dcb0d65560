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
use crate::error::{Result, TallyError};
use log::{debug, warn};
use std::path::Path;
use std::thread;
use std::time::Instant;

/// In-process contention harness: hammer one counter from many worker
/// threads and check the committed sequence for duplicates and gaps.
pub struct StressCommand<'a> {
    config: &'a TallyConfig,
}

impl<'a> StressCommand<'a> {
    pub fn new(config: &'a TallyConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self, resource: &str, workers: usize, iterations: u64) -> Result<()> {
        let path = self.config.resolve_resource(Path::new(resource));
        let store = CounterStore::with_config(self.config);

        let started = Instant::now();
        let mut committed: Vec<u64> = Vec::new();
        let mut failures: u64 = 0;

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for worker in 0..workers {
                let store = &store;
                let path = &path;
                handles.push(scope.spawn(move || {
                    let mut values = Vec::with_capacity(iterations as usize);
                    let mut failed: u64 = 0;
                    for _ in 0..iterations {
                        let op_id = correlation::next_op_id();
                        match store.increment(path) {
                            Ok(value) => {
                                debug!("op {op_id}: worker {worker} committed {value}");
                                values.push(value);
                            }
                            Err(err) => {
                                failed += 1;
                                warn!("op {op_id}: worker {worker} failed: {err}");
                            }
                        }
                    }
                    (values, failed)
                }));
            }

            for handle in handles {
                let (values, failed) = handle.join().expect("stress worker panicked");
                committed.extend(values);
                failures += failed;
            }
        });

        let elapsed = started.elapsed();
        committed.sort_unstable();
        let duplicates = committed.windows(2).filter(|w| w[0] == w[1]).count();
        let gaps = committed.windows(2).filter(|w| w[1] - w[0] > 1).count();

        println!(
            "{} increments across {workers} workers in {:.3}s ({failures} failures)",
            committed.len(),
            elapsed.as_secs_f64()
        );
        if let (Some(first), Some(last)) = (committed.first(), committed.last()) {
            println!("committed range: {first}..={last}");
        }
        println!("duplicates: {duplicates}, gaps: {gaps}");

        if duplicates > 0 {
            return Err(TallyError::ValidationError(format!(
                "{duplicates} duplicate counter values observed; increments were not serialized"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn contention_friendly_config(temp: &TempDir) -> TallyConfig {
        let mut config = TallyConfig::new(temp.path().to_path_buf()).unwrap();
        config.locking.max_retries = 500;
        config.locking.initial_backoff_ms = 1;
        config.locking.max_backoff_ms = 5;
        config
    }

    #[test]
    fn execute_produces_dense_sequence() {
        let temp = TempDir::new().unwrap();
        let config = contention_friendly_config(&temp);
        let command = StressCommand::new(&config).unwrap();

        command.execute("jobs", 4, 5).unwrap();

        let resource = temp.path().join("counters").join("jobs");
        assert_eq!(fs::read_to_string(resource).unwrap(), "20");
    }

    #[test]
    fn execute_continues_from_seeded_value() {
        let temp = TempDir::new().unwrap();
        let config = contention_friendly_config(&temp);
        let resource = temp.path().join("counters").join("jobs");
        fs::create_dir_all(resource.parent().unwrap()).unwrap();
        fs::write(&resource, "100").unwrap();

        let command = StressCommand::new(&config).unwrap();
        command.execute("jobs", 2, 5).unwrap();

        assert_eq!(fs::read_to_string(&resource).unwrap(), "110");
    }
}
