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

//! Pairwise-independent hash family mapping reduced keys to columns.

use std::mem::size_of;

use crate::common::RandomSource;

/// The Mersenne prime `2^61 - 1`, the modulus of every row hash.
pub const MERSENNE_PRIME_61: u64 = (1 << 61) - 1;

/// One row hash `x -> ((a * x + b) mod p) mod width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHash {
    a: u64,
    b: u64,
}

impl RowHash {
    /// Draws `a` uniformly from `[1, p - 1]` and `b` uniformly from `[0, p - 1]`.
    fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let a = 1 + rng.next_below(MERSENNE_PRIME_61 - 1);
        let b = rng.next_below(MERSENNE_PRIME_61);
        Self { a, b }
    }

    pub fn a(&self) -> u64 {
        self.a
    }

    pub fn b(&self) -> u64 {
        self.b
    }

    /// `(a * x + b) mod p` for `x` already in `[0, p)`.
    #[inline]
    fn apply(&self, x: u64) -> u64 {
        let v = u128::from(self.a) * u128::from(x) + u128::from(self.b);
        (v % u128::from(MERSENNE_PRIME_61)) as u64
    }
}

/// `depth` row hashes sharing one output range `[0, width)`.
///
/// The coefficients are drawn once, at construction, and never change: counts
/// recorded under one set of coefficients are meaningless under another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashFamily {
    width: usize,
    rows: Vec<RowHash>,
}

impl HashFamily {
    /// Draws `depth` independent row hashes with range `[0, width)`.
    pub fn generate<R: RandomSource + ?Sized>(depth: usize, width: usize, rng: &mut R) -> Self {
        debug_assert!(depth >= 1 && width >= 1);
        debug_assert!((width as u64) < MERSENNE_PRIME_61);
        let rows = (0..depth).map(|_| RowHash::random(rng)).collect();
        Self { width, rows }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[RowHash] {
        &self.rows
    }

    /// Column of reduced key `hash` in `row`.
    #[inline]
    pub fn column(&self, row: usize, hash: u64) -> usize {
        let x = hash % MERSENNE_PRIME_61;
        (self.rows[row].apply(x) % self.width as u64) as usize
    }

    /// Columns of reduced key `hash`, one per row, in row order.
    pub fn columns(&self, hash: u64) -> impl Iterator<Item = usize> + '_ {
        (0..self.rows.len()).map(move |row| self.column(row, hash))
    }

    pub(crate) fn size_bytes(&self) -> usize {
        self.rows.capacity() * size_of::<RowHash>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::XorShift64;

    #[test]
    fn test_coefficients_in_range() {
        let mut rng = XorShift64::seeded(1);
        let family = HashFamily::generate(64, 28, &mut rng);
        assert_eq!(family.depth(), 64);
        for row in family.rows() {
            assert!(row.a() >= 1 && row.a() < MERSENNE_PRIME_61);
            assert!(row.b() < MERSENNE_PRIME_61);
        }
    }

    #[test]
    fn test_rows_are_independent_draws() {
        let mut rng = XorShift64::seeded(2);
        let family = HashFamily::generate(8, 1024, &mut rng);
        let rows = family.rows();
        for i in 0..rows.len() {
            for j in (i + 1)..rows.len() {
                assert_ne!(rows[i], rows[j]);
            }
        }
    }

    #[test]
    fn test_same_seed_same_family() {
        let a = HashFamily::generate(5, 100, &mut XorShift64::seeded(77));
        let b = HashFamily::generate(5, 100, &mut XorShift64::seeded(77));
        let c = HashFamily::generate(5, 100, &mut XorShift64::seeded(78));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_columns_in_range() {
        let family = HashFamily::generate(4, 28, &mut XorShift64::seeded(3));
        for hash in [0, 1, MERSENNE_PRIME_61 - 1, MERSENNE_PRIME_61, u64::MAX] {
            let columns: Vec<_> = family.columns(hash).collect();
            assert_eq!(columns.len(), 4);
            assert!(columns.iter().all(|c| *c < 28));
        }
    }

    #[test]
    fn test_width_one_maps_everything_to_zero() {
        let family = HashFamily::generate(3, 1, &mut XorShift64::seeded(4));
        assert!(family.columns(12345).all(|c| c == 0));
    }

    #[test]
    fn test_apply_matches_definition() {
        let row = RowHash { a: 3, b: 5 };
        assert_eq!(row.apply(7), 26);
        // (1 * (p - 1) + 1) mod p == 0
        let row = RowHash { a: 1, b: 1 };
        assert_eq!(row.apply(MERSENNE_PRIME_61 - 1), 0);
    }

    #[test]
    fn test_columns_spread_over_width() {
        let family = HashFamily::generate(1, 16, &mut XorShift64::seeded(5));
        let mut hits = [0u32; 16];
        for key in 0..16_000u64 {
            hits[family.column(0, crate::hash::reduce_key(&key))] += 1;
        }
        // expected 1000 per column
        assert!(hits.iter().all(|h| (700..1300).contains(h)), "{hits:?}");
    }
}
