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

use std::hash::Hasher;

/// Streaming MurmurHash3 x64/128 hasher.
///
/// Implements [`Hasher`] so that any [`Hash`](std::hash::Hash) value can be fed
/// through it; [`finish`](Hasher::finish) returns the low 64 bits.
pub struct MurmurHash3X64128 {
    inner: mur3::Hasher128,
}

impl MurmurHash3X64128 {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            inner: mur3::Hasher128::with_seed(seed),
        }
    }

    /// Returns both 64-bit halves of the 128-bit hash.
    pub fn finish128(&self) -> (u64, u64) {
        self.inner.finish128()
    }
}

impl Default for MurmurHash3X64128 {
    fn default() -> Self {
        Self::with_seed(super::DEFAULT_UPDATE_SEED)
    }
}

impl Hasher for MurmurHash3X64128 {
    fn finish(&self) -> u64 {
        self.finish128().0
    }

    fn write(&mut self, bytes: &[u8]) {
        self.inner.write(bytes);
    }
}
