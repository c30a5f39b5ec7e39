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

//! Counter storage for the sketch.

use std::mem::size_of;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// A `depth x width` grid of counters, stored row-major.
///
/// Counters only grow. Increments saturate at `u64::MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterTable {
    width: usize,
    depth: usize,
    counters: Vec<u64>,
}

impl CounterTable {
    /// Creates a zeroed table.
    pub fn new(depth: usize, width: usize) -> Self {
        Self {
            width,
            depth,
            counters: vec![0; depth * width],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn get(&self, row: usize, column: usize) -> u64 {
        self.counters[self.index(row, column)]
    }

    #[inline]
    pub fn increment(&mut self, row: usize, column: usize, by: u64) {
        let index = self.index(row, column);
        self.counters[index] = self.counters[index].saturating_add(by);
    }

    /// Counters of one row.
    pub fn row(&self, row: usize) -> &[u64] {
        let start = row * self.width;
        &self.counters[start..start + self.width]
    }

    pub fn size_bytes(&self) -> usize {
        self.counters.capacity() * size_of::<u64>()
    }

    #[inline]
    fn index(&self, row: usize, column: usize) -> usize {
        debug_assert!(row < self.depth && column < self.width);
        row * self.width + column
    }
}

/// A [`CounterTable`] whose counters can be incremented through a shared reference.
#[derive(Debug)]
pub struct AtomicCounterTable {
    width: usize,
    depth: usize,
    counters: Vec<AtomicU64>,
}

impl AtomicCounterTable {
    pub fn new(depth: usize, width: usize) -> Self {
        let counters = (0..depth * width).map(|_| AtomicU64::new(0)).collect();
        Self {
            width,
            depth,
            counters,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn get(&self, row: usize, column: usize) -> u64 {
        self.counters[self.index(row, column)].load(Ordering::Relaxed)
    }

    /// Adds `by` to a counter, saturating at `u64::MAX`.
    #[inline]
    pub fn increment(&self, row: usize, column: usize, by: u64) {
        let counter = &self.counters[self.index(row, column)];
        // The closure never returns None, so the update always succeeds.
        let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
            Some(current.saturating_add(by))
        });
    }

    /// Copies the current counter values into a plain table.
    ///
    /// Each counter is read atomically; concurrent increments may land in some
    /// counters and not others.
    pub fn snapshot(&self) -> CounterTable {
        CounterTable {
            width: self.width,
            depth: self.depth,
            counters: self
                .counters
                .iter()
                .map(|c| c.load(Ordering::Relaxed))
                .collect(),
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.counters.capacity() * size_of::<AtomicU64>()
    }

    #[inline]
    fn index(&self, row: usize, column: usize) -> usize {
        debug_assert!(row < self.depth && column < self.width);
        row * self.width + column
    }
}
