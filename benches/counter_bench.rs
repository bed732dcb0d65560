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

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;
use tally::counter::CounterStore;
use tally::locking::{LockController, RetryPolicy};
use tempfile::TempDir;

fn bench_counter_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("counter");

    let temp = TempDir::new().unwrap();
    let resource = temp.path().join("bench-counter");
    let store = CounterStore::new(LockController::new(RetryPolicy::new(
        5,
        Duration::from_millis(1),
        Duration::from_millis(5),
    )));

    group.bench_function("uncontended_increment", |b| {
        b.iter(|| store.increment(black_box(&resource)).unwrap())
    });

    group.bench_function("peek", |b| {
        b.iter(|| store.peek(black_box(&resource)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_counter_operations);
criterion_main!(benches);
