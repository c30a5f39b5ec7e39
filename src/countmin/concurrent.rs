// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::hash::Hash;
use std::mem::size_of;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::countmin::hash_family::HashFamily;
use crate::countmin::sketch::CountMinSketch;
use crate::countmin::sketch::CountMinSketchBuilder;
use crate::countmin::table::AtomicCounterTable;
use crate::error::Error;
use crate::hash::reduce_key;

/// A Count-Min sketch that can be updated from many threads at once.
///
/// Counters are `AtomicU64`s, so [`add`](Self::add) takes `&self` and the
/// sketch can be shared behind an `Arc` without a lock. Increments of one
/// counter are linearizable; nothing orders increments of different items.
///
/// # Examples
///
/// ```
/// # use minsketch::countmin::ConcurrentCountMinSketch;
/// let sketch = ConcurrentCountMinSketch::with_seed(0.01, 0.01, 7).unwrap();
/// std::thread::scope(|s| {
///     for _ in 0..4 {
///         s.spawn(|| {
///             for _ in 0..100 {
///                 sketch.add("hot");
///             }
///         });
///     }
/// });
/// assert!(sketch.estimate("hot") >= 400);
/// ```
#[derive(Debug)]
pub struct ConcurrentCountMinSketch {
    epsilon: f64,
    delta: f64,
    total_count: AtomicU64,
    hashes: HashFamily,
    table: AtomicCounterTable,
}

impl ConcurrentCountMinSketch {
    /// Creates a sketch for relative error `epsilon` and failure probability
    /// `delta` with clock-seeded hash functions.
    pub fn new(epsilon: f64, delta: f64) -> Result<Self, Error> {
        CountMinSketchBuilder::with_accuracy(epsilon, delta).build_concurrent()
    }

    /// Creates a sketch with hash functions drawn from a generator seeded with `seed`.
    pub fn with_seed(epsilon: f64, delta: f64, seed: u64) -> Result<Self, Error> {
        CountMinSketchBuilder::with_accuracy(epsilon, delta)
            .seed(seed)
            .build_concurrent()
    }

    pub(super) fn from_parts(epsilon: f64, delta: f64, hashes: HashFamily) -> Self {
        let table = AtomicCounterTable::new(hashes.depth(), hashes.width());
        Self {
            epsilon,
            delta,
            total_count: AtomicU64::new(0),
            hashes,
            table,
        }
    }

    /// Counts one occurrence of `item`.
    pub fn add<T: Hash>(&self, item: T) {
        self.add_with_count(item, 1);
    }

    /// Counts `count` occurrences of `item`.
    pub fn add_with_count<T: Hash>(&self, item: T, count: u64) {
        if count == 0 {
            return;
        }
        let hash = reduce_key(&item);
        for (row, column) in self.hashes.columns(hash).enumerate() {
            self.table.increment(row, column, count);
        }
        let _ = self
            .total_count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| {
                Some(total.saturating_add(count))
            });
    }

    /// Returns the estimated number of occurrences of `item`.
    ///
    /// Rows are read one at a time, so an estimate taken during concurrent adds
    /// of the same item may miss the adds still in flight. Completed adds are
    /// always reflected.
    pub fn estimate<T: Hash>(&self, item: T) -> u64 {
        let hash = reduce_key(&item);
        self.hashes
            .columns(hash)
            .enumerate()
            .map(|(row, column)| self.table.get(row, column))
            .min()
            .unwrap_or(0)
    }

    pub fn width(&self) -> usize {
        self.table.width()
    }

    pub fn depth(&self) -> usize {
        self.table.depth()
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn total_count(&self) -> u64 {
        self.total_count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    pub fn size_bytes(&self) -> usize {
        size_of::<Self>() + self.table.size_bytes() + self.hashes.size_bytes()
    }

    /// Copies the current state into a [`CountMinSketch`] sharing the same hash
    /// functions, so estimates of the copy match estimates of `self` at the time
    /// of the call.
    pub fn snapshot(&self) -> CountMinSketch {
        CountMinSketch::from_parts(
            self.epsilon,
            self.delta,
            self.total_count(),
            self.hashes.clone(),
            self.table.snapshot(),
        )
    }
}
