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

use crate::countmin::CountMinSketch;
use crate::oracle::ExactCounter;

/// One key's exact count next to its sketch estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a, K> {
    key: &'a K,
    exact: u64,
    estimate: u64,
}

impl<'a, K> Row<'a, K> {
    /// Returns the key.
    pub fn key(&self) -> &'a K {
        self.key
    }

    /// Returns the exact count.
    pub fn exact(&self) -> u64 {
        self.exact
    }

    /// Returns the sketch estimate.
    pub fn estimate(&self) -> u64 {
        self.estimate
    }

    /// Returns `|estimate - exact|`.
    pub fn error(&self) -> u64 {
        self.estimate.abs_diff(self.exact)
    }

    /// Returns whether the sketch reported less than the exact count.
    pub fn is_underestimate(&self) -> bool {
        self.estimate < self.exact
    }
}

/// Per-key comparison of a sketch against an [`ExactCounter`].
#[derive(Debug, Clone)]
pub struct ErrorReport<'a, K> {
    rows: Vec<Row<'a, K>>,
    error_bound: u64,
}

impl<'a, K: Hash + Eq> ErrorReport<'a, K> {
    /// Estimates every key of `exact` with `sketch`.
    ///
    /// Rows are ordered by exact count, highest first; ties are ordered by
    /// estimate, highest first. The error bound is taken from the sketch, i.e.
    /// `floor(epsilon * N)` with `N` the sketch's total count.
    pub fn compare(sketch: &CountMinSketch, exact: &'a ExactCounter<K>) -> Self {
        let mut rows: Vec<Row<'a, K>> = exact
            .iter()
            .map(|(key, count)| Row {
                key,
                exact: count,
                estimate: sketch.estimate(key),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.exact
                .cmp(&a.exact)
                .then_with(|| b.estimate.cmp(&a.estimate))
        });
        Self {
            rows,
            error_bound: sketch.maximum_error(),
        }
    }
}

impl<'a, K> ErrorReport<'a, K> {
    pub fn rows(&self) -> &[Row<'a, K>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the additive error the sketch promises with probability `1 - delta`.
    pub fn error_bound(&self) -> u64 {
        self.error_bound
    }

    /// Returns the largest per-key error, zero for an empty report.
    pub fn max_error(&self) -> u64 {
        self.rows.iter().map(Row::error).max().unwrap_or(0)
    }

    /// Returns the mean per-key error, zero for an empty report.
    pub fn mean_error(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let sum: u128 = self.rows.iter().map(|r| u128::from(r.error())).sum();
        sum as f64 / self.rows.len() as f64
    }

    /// Rows whose error exceeds [`error_bound`](Self::error_bound).
    pub fn violations(&self) -> impl Iterator<Item = &Row<'a, K>> + '_ {
        self.rows.iter().filter(|r| r.error() > self.error_bound)
    }

    /// Rows where the sketch reported less than the exact count. A correct
    /// sketch fed the same items as the counter never produces any.
    pub fn underestimates(&self) -> impl Iterator<Item = &Row<'a, K>> + '_ {
        self.rows.iter().filter(|r| r.is_underestimate())
    }

    /// Fraction of rows within the error bound, one for an empty report.
    pub fn within_bound_fraction(&self) -> f64 {
        if self.rows.is_empty() {
            return 1.0;
        }
        let violations = self.violations().count();
        1.0 - violations as f64 / self.rows.len() as f64
    }
}
