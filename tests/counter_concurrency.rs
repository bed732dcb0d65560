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

use std::fs;
use std::thread;
use std::time::Duration;
use tally::counter::CounterStore;
use tally::locking::{LockController, RetryPolicy};
use tempfile::TempDir;

fn contention_friendly_store() -> CounterStore {
    // A deep retry budget with short backoffs keeps heavy contention from
    // exhausting acquisition attempts while the test hammers one resource.
    CounterStore::new(LockController::new(RetryPolicy::new(
        1000,
        Duration::from_millis(1),
        Duration::from_millis(5),
    )))
}

fn run_workers(
    store: &CounterStore,
    resource: &std::path::Path,
    workers: usize,
    per_worker: u64,
) -> Vec<u64> {
    let mut committed = Vec::new();
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            handles.push(scope.spawn(|| {
                (0..per_worker)
                    .map(|_| store.increment(resource).unwrap())
                    .collect::<Vec<u64>>()
            }));
        }
        for handle in handles {
            committed.extend(handle.join().expect("worker thread panicked"));
        }
    });
    committed
}

#[test]
fn concurrent_increments_against_fresh_resource_are_dense() {
    let temp = TempDir::new().unwrap();
    let resource = temp.path().join("number.txt");
    let store = contention_friendly_store();

    let mut committed = run_workers(&store, &resource, 8, 5);
    committed.sort_unstable();

    // Every caller observed a distinct current value: the returned set is
    // exactly 1..=40 with no duplicates and no gaps.
    assert_eq!(committed, (1..=40).collect::<Vec<u64>>());
    assert_eq!(fs::read_to_string(&resource).unwrap(), "40");
}

#[test]
fn concurrent_increments_continue_a_seeded_sequence() {
    let temp = TempDir::new().unwrap();
    let resource = temp.path().join("number.txt");
    fs::write(&resource, "100").unwrap();
    let store = contention_friendly_store();

    let mut committed = run_workers(&store, &resource, 4, 5);
    committed.sort_unstable();

    assert_eq!(committed, (101..=120).collect::<Vec<u64>>());
    assert_eq!(fs::read_to_string(&resource).unwrap(), "120");
}
