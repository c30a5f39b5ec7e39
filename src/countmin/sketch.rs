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

use std::f64::consts::E;
use std::hash::Hash;
use std::mem::size_of;

use crate::common::RandomSource;
use crate::common::XorShift64;
use crate::countmin::concurrent::ConcurrentCountMinSketch;
use crate::countmin::hash_family::HashFamily;
use crate::countmin::params::Accuracy;
use crate::countmin::params::MAX_DEPTH;
use crate::countmin::params::MAX_WIDTH;
use crate::countmin::params::check_table_size;
use crate::countmin::table::CounterTable;
use crate::error::Error;
use crate::hash::reduce_key;

/// A Count-Min sketch for approximate frequency counting.
///
/// Holds `depth` rows of `width` counters. Adding an item increments one
/// counter per row; estimating reads the same counters and returns the
/// smallest. For every item:
///
/// - `estimate(item) >= true count` always;
/// - `estimate(item) <= true count + epsilon * total_count()` with probability
///   at least `1 - delta`.
///
/// Use [`CountMinSketch::new`] or [`CountMinSketchBuilder`] to construct instances.
#[derive(Debug, Clone)]
pub struct CountMinSketch {
    epsilon: f64,
    delta: f64,
    total_count: u64,
    hashes: HashFamily,
    table: CounterTable,
}

impl CountMinSketch {
    /// Creates a sketch for relative error `epsilon` and failure probability
    /// `delta`, drawing its hash functions from a clock-seeded generator.
    ///
    /// Two sketches created this way are not comparable counter by counter; use
    /// [`with_seed`](Self::with_seed) for reproducible sketches.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// if either parameter is outside `(0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minsketch::countmin::CountMinSketch;
    /// let mut sketch = CountMinSketch::new(0.01, 0.001).unwrap();
    /// sketch.add("apple");
    /// sketch.add("apple");
    /// assert!(sketch.estimate("apple") >= 2);
    ///
    /// assert!(CountMinSketch::new(0.0, 0.1).is_err());
    /// ```
    pub fn new(epsilon: f64, delta: f64) -> Result<Self, Error> {
        CountMinSketchBuilder::with_accuracy(epsilon, delta).build()
    }

    /// Creates a sketch whose hash functions are drawn from a generator seeded
    /// with `seed`.
    pub fn with_seed(epsilon: f64, delta: f64, seed: u64) -> Result<Self, Error> {
        CountMinSketchBuilder::with_accuracy(epsilon, delta)
            .seed(seed)
            .build()
    }

    /// Creates a sketch whose hash functions are drawn from `rng`.
    pub fn with_random_source<R: RandomSource + ?Sized>(
        epsilon: f64,
        delta: f64,
        rng: &mut R,
    ) -> Result<Self, Error> {
        CountMinSketchBuilder::with_accuracy(epsilon, delta).build_with(rng)
    }

    pub(super) fn from_parts(
        epsilon: f64,
        delta: f64,
        total_count: u64,
        hashes: HashFamily,
        table: CounterTable,
    ) -> Self {
        debug_assert_eq!(hashes.depth(), table.depth());
        debug_assert_eq!(hashes.width(), table.width());
        Self {
            epsilon,
            delta,
            total_count,
            hashes,
            table,
        }
    }

    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Counts one occurrence of `item`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minsketch::countmin::CountMinSketch;
    /// let mut sketch = CountMinSketch::with_seed(0.1, 0.1, 7).unwrap();
    /// sketch.add("apple");
    /// sketch.add(42_u64);
    /// sketch.add(&[1_u8, 2, 3]);
    /// assert_eq!(sketch.total_count(), 3);
    /// ```
    pub fn add<T: Hash>(&mut self, item: T) {
        self.add_with_count(item, 1);
    }

    /// Counts `count` occurrences of `item`.
    pub fn add_with_count<T: Hash>(&mut self, item: T, count: u64) {
        self.update_hash(reduce_key(&item), count);
    }

    /// Counts one occurrence of a key the caller already reduced with a stable
    /// hash. Pair with [`estimate_hash`](Self::estimate_hash).
    pub fn add_hash(&mut self, hash: u64) {
        self.update_hash(hash, 1);
    }

    fn update_hash(&mut self, hash: u64, count: u64) {
        if count == 0 {
            return;
        }
        for (row, column) in self.hashes.columns(hash).enumerate() {
            self.table.increment(row, column, count);
        }
        self.total_count = self.total_count.saturating_add(count);
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Returns the estimated number of occurrences of `item`.
    ///
    /// Never less than the true count. Items never added estimate to zero
    /// unless they collide with other items in every row.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minsketch::countmin::CountMinSketch;
    /// let mut sketch = CountMinSketch::with_seed(0.01, 0.01, 7).unwrap();
    /// sketch.add_with_count("banana", 3);
    /// assert!(sketch.estimate("banana") >= 3);
    /// ```
    pub fn estimate<T: Hash>(&self, item: T) -> u64 {
        self.estimate_hash(reduce_key(&item))
    }

    /// Returns the estimated number of occurrences of a pre-reduced key.
    pub fn estimate_hash(&self, hash: u64) -> u64 {
        self.hashes
            .columns(hash)
            .enumerate()
            .map(|(row, column)| self.table.get(row, column))
            .min()
            .unwrap_or(0)
    }

    /// Returns a lower bound on the true count of `item` that holds with
    /// probability at least `1 - delta`.
    ///
    /// The estimate itself is an upper bound that always holds.
    pub fn lower_bound<T: Hash>(&self, item: T) -> u64 {
        self.estimate(item).saturating_sub(self.maximum_error())
    }

    /// Returns `floor(epsilon * total_count())`, the additive error bound.
    pub fn maximum_error(&self) -> u64 {
        (self.epsilon * self.total_count as f64) as u64
    }

    /// Sorts the caller's `candidates` by estimate, highest first, and keeps at
    /// most `n` of them.
    ///
    /// The sketch does not remember which items it has seen, so the candidate
    /// set has to come from the caller. Ties keep their input order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minsketch::countmin::CountMinSketch;
    /// let mut sketch = CountMinSketch::with_seed(0.001, 0.01, 7).unwrap();
    /// sketch.add_with_count("rust", 10);
    /// sketch.add_with_count("go", 5);
    /// sketch.add_with_count("zig", 1);
    ///
    /// let top = sketch.rank(["zig", "go", "rust"], 2);
    /// assert_eq!(top[0].0, "rust");
    /// assert_eq!(top[1].0, "go");
    /// ```
    pub fn rank<K, I>(&self, candidates: I, n: usize) -> Vec<(K, u64)>
    where
        K: Hash,
        I: IntoIterator<Item = K>,
    {
        let mut ranked: Vec<(K, u64)> = candidates
            .into_iter()
            .map(|key| {
                let estimate = self.estimate(&key);
                (key, estimate)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns the number of counters per row.
    pub fn width(&self) -> usize {
        self.table.width()
    }

    /// Returns the number of rows, one per hash function.
    pub fn depth(&self) -> usize {
        self.table.depth()
    }

    /// Returns the relative error bound.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the probability that an estimate exceeds the error bound.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Returns the total count added so far.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns whether nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Returns the hash functions, one per row.
    pub fn hash_family(&self) -> &HashFamily {
        &self.hashes
    }

    /// Returns the approximate heap and inline size of the sketch in bytes.
    pub fn size_bytes(&self) -> usize {
        size_of::<Self>() + self.table.size_bytes() + self.hashes.size_bytes()
    }
}

// ============================================================================
// Builder
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Shape {
    Accuracy { epsilon: f64, delta: f64 },
    Dimensions { width: usize, depth: usize },
}

/// Builder for [`CountMinSketch`] and [`ConcurrentCountMinSketch`].
///
/// # Examples
///
/// ```
/// # use minsketch::countmin::CountMinSketchBuilder;
/// // By accuracy (recommended)
/// let sketch = CountMinSketchBuilder::with_accuracy(0.1, 0.1)
///     .seed(9001)
///     .build()
///     .unwrap();
/// assert_eq!((sketch.width(), sketch.depth()), (28, 3));
///
/// // By size (manual)
/// let sketch = CountMinSketchBuilder::with_dimensions(1024, 4)
///     .build()
///     .unwrap();
/// assert_eq!((sketch.width(), sketch.depth()), (1024, 4));
/// ```
#[derive(Debug, Clone)]
pub struct CountMinSketchBuilder {
    shape: Shape,
    seed: Option<u64>,
}

impl CountMinSketchBuilder {
    /// Sizes the sketch from relative error `epsilon` and failure probability
    /// `delta`, both validated by `build`.
    pub fn with_accuracy(epsilon: f64, delta: f64) -> Self {
        Self {
            shape: Shape::Accuracy { epsilon, delta },
            seed: None,
        }
    }

    /// Sizes the sketch directly. `epsilon` becomes `e / width` and `delta`
    /// becomes `e^-depth`.
    pub fn with_dimensions(width: usize, depth: usize) -> Self {
        Self {
            shape: Shape::Dimensions { width, depth },
            seed: None,
        }
    }

    /// Seeds the generator that draws the hash coefficients in [`build`](Self::build)
    /// and [`build_concurrent`](Self::build_concurrent).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the sketch.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the accuracy or dimensions are invalid.
    pub fn build(self) -> Result<CountMinSketch, Error> {
        let mut rng = self.rng();
        self.build_with(&mut rng)
    }

    /// Builds the sketch, drawing hash coefficients from `rng` instead of the
    /// configured seed.
    pub fn build_with<R: RandomSource + ?Sized>(self, rng: &mut R) -> Result<CountMinSketch, Error> {
        let resolved = self.resolve()?;
        let hashes = HashFamily::generate(resolved.depth, resolved.width, rng);
        let table = CounterTable::new(resolved.depth, resolved.width);
        Ok(CountMinSketch::from_parts(
            resolved.epsilon,
            resolved.delta,
            0,
            hashes,
            table,
        ))
    }

    /// Builds a sketch that accepts updates through a shared reference.
    pub fn build_concurrent(self) -> Result<ConcurrentCountMinSketch, Error> {
        let mut rng = self.rng();
        let resolved = self.resolve()?;
        let hashes = HashFamily::generate(resolved.depth, resolved.width, &mut rng);
        Ok(ConcurrentCountMinSketch::from_parts(
            resolved.epsilon,
            resolved.delta,
            hashes,
        ))
    }

    fn rng(&self) -> XorShift64 {
        self.seed.map(XorShift64::seeded).unwrap_or_default()
    }

    fn resolve(&self) -> Result<Resolved, Error> {
        match self.shape {
            Shape::Accuracy { epsilon, delta } => {
                let accuracy = Accuracy::new(epsilon, delta)?;
                Ok(Resolved {
                    width: accuracy.width(),
                    depth: accuracy.depth(),
                    epsilon,
                    delta,
                })
            }
            Shape::Dimensions { width, depth } => {
                if width == 0 || width > MAX_WIDTH {
                    return Err(Error::config_invalid(format!(
                        "width must be in [1, {MAX_WIDTH}]; got {width}"
                    ))
                    .with_context("width", width));
                }
                if depth == 0 || depth > MAX_DEPTH {
                    return Err(Error::config_invalid(format!(
                        "depth must be in [1, {MAX_DEPTH}]; got {depth}"
                    ))
                    .with_context("depth", depth));
                }
                check_table_size(width, depth)?;
                Ok(Resolved {
                    width,
                    depth,
                    epsilon: E / width as f64,
                    delta: (-(depth as f64)).exp(),
                })
            }
        }
    }
}

struct Resolved {
    width: usize,
    depth: usize,
    epsilon: f64,
    delta: f64,
}

// ============================================================================
// Tests
// ============================================================================
