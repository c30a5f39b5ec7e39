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

//! Stable key reduction.
//!
//! Every key handed to a sketch is first reduced to a 64-bit integer. The
//! reduction must give the same answer in every run and every process, so it
//! is pinned to MurmurHash3 (x64, 128-bit variant) with a fixed seed instead of
//! the randomly keyed [`std::collections::hash_map::DefaultHasher`].
//!
//! The reduction consumes the byte stream produced by the key's [`Hash`] impl.
//! Strings, byte slices and fixed-width integers write the same bytes on every
//! platform. `usize` and `isize` write their native width, so a key reduced on a
//! 64-bit host differs from the same key reduced on a 32-bit host.

use std::hash::Hash;

mod murmurhash;

pub use self::murmurhash::MurmurHash3X64128;

/// Seed used for key reduction.
pub const DEFAULT_UPDATE_SEED: u32 = 9001;

/// Reduces `item` to a stable 64-bit integer.
///
/// # Examples
///
/// ```
/// # use minsketch::hash::reduce_key;
/// assert_eq!(reduce_key("apple"), reduce_key(&String::from("apple")));
/// assert_ne!(reduce_key("apple"), reduce_key("banana"));
/// ```
pub fn reduce_key<T: Hash + ?Sized>(item: &T) -> u64 {
    let mut hasher = MurmurHash3X64128::with_seed(DEFAULT_UPDATE_SEED);
    item.hash(&mut hasher);
    let (h1, _) = hasher.finish128();
    h1
}
