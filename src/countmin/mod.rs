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

//! Count-Min sketch implementation for frequency estimation.
//!
//! The Count-Min sketch provides approximate frequency counts for streaming data
//! with configurable relative error and confidence bounds, using memory that
//! does not grow with the number of distinct items.
//!
//! A sketch built for relative error `epsilon` and failure probability `delta`
//! has `ceil(e / epsilon)` counters per row and `ceil(ln(1 / delta))` rows.
//!
//! # Usage
//!
//! ```rust
//! # use minsketch::countmin::CountMinSketch;
//! let mut sketch = CountMinSketch::with_seed(0.1, 0.1, 9001).unwrap();
//! assert_eq!(sketch.width(), 28);
//! assert_eq!(sketch.depth(), 3);
//!
//! for _ in 0..5 {
//!     sketch.add("a");
//! }
//! sketch.add("b");
//!
//! assert!(sketch.estimate("a") >= 5);
//! assert!(sketch.estimate("b") >= 1);
//! ```
//!
//! # Configuration Helpers
//!
//! ```rust
//! # use minsketch::countmin::{suggest_depth, suggest_width, CountMinSketchBuilder};
//! let width = suggest_width(0.01);
//! let depth = suggest_depth(0.01);
//! let _sketch = CountMinSketchBuilder::with_dimensions(width, depth)
//!     .build()
//!     .unwrap();
//! ```

mod concurrent;
mod hash_family;
mod params;
mod sketch;
mod table;

pub use self::concurrent::ConcurrentCountMinSketch;
pub use self::hash_family::HashFamily;
pub use self::hash_family::MERSENNE_PRIME_61;
pub use self::hash_family::RowHash;
pub use self::params::Accuracy;
pub use self::params::MAX_DEPTH;
pub use self::params::MAX_WIDTH;
pub use self::params::suggest_depth;
pub use self::params::suggest_width;
pub use self::sketch::CountMinSketch;
pub use self::sketch::CountMinSketchBuilder;
pub use self::table::AtomicCounterTable;
pub use self::table::CounterTable;
