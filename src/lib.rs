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

//! A Count-Min sketch for approximate frequency counting over unbounded streams.
//!
//! The sketch answers "how many times has this item been seen?" with a fixed
//! amount of memory chosen from two parameters: the relative error `epsilon`
//! and the failure probability `delta`. Estimates never undercount; with
//! probability at least `1 - delta` they overcount by at most `epsilon * N`,
//! where `N` is the number of items added.
//!
//! - [`countmin`]: the sketch, its builder, and a lock-free concurrent variant.
//! - [`oracle`]: exact counting for measuring sketch error in tests.
//! - [`hash`]: the stable key reduction shared by all sketches.
//! - [`common`]: injectable random sources for reproducible construction.
//!
//! # Usage
//!
//! ```rust
//! use minsketch::countmin::CountMinSketch;
//!
//! let mut sketch = CountMinSketch::new(0.01, 0.001).unwrap();
//! for word in "the cat and the hat".split_whitespace() {
//!     sketch.add(word);
//! }
//! assert!(sketch.estimate("the") >= 2);
//! ```

pub mod common;
pub mod countmin;
pub mod error;
pub mod hash;
pub mod oracle;
