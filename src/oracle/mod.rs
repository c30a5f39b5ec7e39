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

//! Exact counting used to measure sketch error.
//!
//! An [`ExactCounter`] is kept by the caller next to a sketch and fed the same
//! items. It grows with the number of distinct items, so it is meant for tests
//! and validation runs, never for the estimation path. The sketch knows nothing
//! about it.
//!
//! # Usage
//!
//! ```rust
//! # use minsketch::countmin::CountMinSketch;
//! # use minsketch::oracle::{ErrorReport, ExactCounter};
//! let mut sketch = CountMinSketch::with_seed(0.01, 0.01, 1).unwrap();
//! let mut exact = ExactCounter::new();
//! for word in ["rust", "is", "fast", "rust"] {
//!     sketch.add(word);
//!     exact.add(word);
//! }
//!
//! let report = ErrorReport::compare(&sketch, &exact);
//! assert_eq!(report.rows()[0].key(), &"rust");
//! assert!(report.underestimates().next().is_none());
//! assert!(report.max_error() <= report.error_bound());
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

mod report;

pub use self::report::ErrorReport;
pub use self::report::Row;

/// Exact per-key occurrence counts.
#[derive(Debug, Clone)]
pub struct ExactCounter<K> {
    counts: HashMap<K, u64>,
    total_count: u64,
}

impl<K> Default for ExactCounter<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
            total_count: 0,
        }
    }
}

impl<K: Hash + Eq> ExactCounter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of `key`.
    pub fn add(&mut self, key: K) {
        self.add_with_count(key, 1);
    }

    /// Counts `count` occurrences of `key`.
    pub fn add_with_count(&mut self, key: K, count: u64) {
        if count == 0 {
            return;
        }
        let slot = self.counts.entry(key).or_insert(0);
        *slot = slot.saturating_add(count);
        self.total_count = self.total_count.saturating_add(count);
    }

    /// Returns the exact count of `key`, zero if never added.
    pub fn count<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Returns the sum of all counts.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over keys and their counts in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (k, *v))
    }
}

impl<K: Hash + Eq> Extend<K> for ExactCounter<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<K: Hash + Eq> FromIterator<K> for ExactCounter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counter = Self::new();
        counter.extend(iter);
        counter
    }
}
