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

use googletest::assert_that;
use googletest::prelude::contains_substring;
use minsketch::common::RandomSource;
use minsketch::countmin::CountMinSketch;
use minsketch::countmin::CountMinSketchBuilder;
use minsketch::error::ErrorKind;
use minsketch::hash::reduce_key;
use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;

struct StdRandom(StdRng);

impl RandomSource for StdRandom {
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }
}

#[test]
fn test_init_defaults() {
    let sketch = CountMinSketch::with_seed(0.1, 0.1, 9001).unwrap();
    assert_eq!(sketch.width(), 28);
    assert_eq!(sketch.depth(), 3);
    assert!(sketch.is_empty());
    assert_eq!(sketch.total_count(), 0);
    assert_eq!(sketch.estimate("missing"), 0);
}

#[test]
fn test_dimensions_for_parameter_grid() {
    let epsilons = [1.0, 0.5, 0.25, 0.1, 0.05, 0.01, 0.001];
    let deltas = [1.0, 0.5, 0.25, 0.1, 0.05, 0.01, 0.001];
    for epsilon in epsilons {
        for delta in deltas {
            let sketch = CountMinSketch::with_seed(epsilon, delta, 1).unwrap();
            let width = (std::f64::consts::E / epsilon).ceil() as usize;
            let depth = ((1.0 / delta).ln().ceil() as usize).max(1);
            assert_eq!(sketch.width(), width, "epsilon={epsilon}");
            assert_eq!(sketch.depth(), depth, "delta={delta}");
        }
    }

    let boundary = CountMinSketch::with_seed(1.0, 1.0, 1).unwrap();
    assert_eq!((boundary.width(), boundary.depth()), (3, 1));
}

#[test]
fn test_invalid_parameters() {
    for (epsilon, delta) in [(0.0, 0.5), (1.5, 0.5), (0.5, 0.0), (0.5, -1.0)] {
        let err = CountMinSketch::new(epsilon, delta).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_that!(err.message(), contains_substring("must be in (0, 1]"));
    }

    let err = CountMinSketch::new(0.1, f64::NAN).unwrap_err();
    assert_that!(err.to_string(), contains_substring("delta: NaN"));
}

#[test]
fn test_subnormal_delta_is_config_error() {
    let err = CountMinSketch::with_seed(0.5, 1e-310, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_that!(err.message(), contains_substring("above the maximum"));

    let err = CountMinSketch::new(1e-6, 1e-300).unwrap_err();
    assert_that!(err.to_string(), contains_substring("depth:"));
}

#[test]
fn test_concrete_scenario() {
    let mut sketch = CountMinSketch::with_seed(0.1, 0.1, 9001).unwrap();
    assert_eq!((sketch.width(), sketch.depth()), (28, 3));

    for _ in 0..5 {
        sketch.add("a");
    }
    sketch.add("b");

    assert!(sketch.estimate("a") >= 5);
    assert!(sketch.estimate("b") >= 1);
    assert_eq!(sketch.estimate("c"), 0);
    assert_eq!(sketch.total_count(), 6);
}

#[test]
fn test_estimate_is_idempotent() {
    let mut sketch = CountMinSketch::with_seed(0.05, 0.05, 3).unwrap();
    for i in 0..500u64 {
        sketch.add(i % 37);
    }
    for key in 0..50u64 {
        assert_eq!(sketch.estimate(key), sketch.estimate(key));
    }
}

#[test]
fn test_never_underestimates() {
    let mut sketch = CountMinSketch::with_seed(0.2, 0.2, 17).unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    let mut counts = vec![0u64; 200];
    for _ in 0..20_000 {
        let key = (rng.next_u64() % 200) as usize;
        counts[key] += 1;
        sketch.add(key as u64);
    }
    for (key, count) in counts.iter().enumerate() {
        assert!(sketch.estimate(key as u64) >= *count);
    }
}

#[test]
fn test_monotone_estimates() {
    let mut sketch = CountMinSketch::with_seed(0.1, 0.1, 5).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..2_000 {
        let key = rng.next_u64() % 50;
        let before = sketch.estimate(key);
        let watched = sketch.estimate("watched");
        sketch.add(key);
        assert!(sketch.estimate(key) > before);
        assert!(sketch.estimate("watched") >= watched);
    }
}

#[test]
fn test_collision_free_key_grows_by_one() {
    let mut sketch = CountMinSketch::with_seed(0.01, 0.01, 21).unwrap();
    let family = sketch.hash_family().clone();
    let target: Vec<_> = family.columns(reduce_key("target")).collect();

    // Keys that share no column with "target" in any row.
    let others: Vec<u64> = (0u64..)
        .filter(|i| {
            family
                .columns(reduce_key(i))
                .zip(&target)
                .all(|(c, t)| c != *t)
        })
        .take(100)
        .collect();
    for other in &others {
        sketch.add(other);
    }

    for expected in 1..=10 {
        sketch.add("target");
        assert_eq!(sketch.estimate("target"), expected);
    }
}

#[test]
fn test_weighted_updates() {
    let mut sketch = CountMinSketch::with_seed(0.01, 0.01, 8).unwrap();
    sketch.add("x");
    sketch.add_with_count("x", 9);
    assert_eq!(sketch.estimate("x"), 10);
    assert_eq!(sketch.total_count(), 10);
    assert!(sketch.lower_bound("x") <= sketch.estimate("x"));
}

#[test]
fn test_owned_and_borrowed_keys_agree() {
    let mut sketch = CountMinSketch::with_seed(0.1, 0.1, 2).unwrap();
    sketch.add(String::from("word"));
    sketch.add("word");
    sketch.add(&String::from("word"));
    assert!(sketch.estimate("word") >= 3);
    assert_eq!(sketch.estimate("word"), sketch.estimate(String::from("word")));
}

#[test]
fn test_injected_random_source() {
    let a = CountMinSketch::with_random_source(0.1, 0.1, &mut StdRandom(StdRng::seed_from_u64(4)))
        .unwrap();
    let b = CountMinSketchBuilder::with_accuracy(0.1, 0.1)
        .build_with(&mut StdRandom(StdRng::seed_from_u64(4)))
        .unwrap();
    let c = CountMinSketch::with_random_source(0.1, 0.1, &mut StdRandom(StdRng::seed_from_u64(5)))
        .unwrap();
    assert_eq!(a.hash_family(), b.hash_family());
    assert_ne!(a.hash_family(), c.hash_family());
}

#[test]
fn test_rank_candidates() {
    let mut sketch = CountMinSketch::with_seed(0.001, 0.001, 6).unwrap();
    let words = ["alpha", "beta", "gamma", "delta", "epsilon"];
    for (i, word) in words.iter().enumerate() {
        sketch.add_with_count(word, (i as u64 + 1) * 10);
    }

    let top = sketch.rank(words, 3);
    assert_eq!(top.len(), 3);
    assert_eq!(top[0], ("epsilon", 50));
    assert_eq!(top[1], ("delta", 40));
    assert_eq!(top[2], ("gamma", 30));

    assert!(sketch.rank(Vec::<&str>::new(), 3).is_empty());
}

#[test]
fn test_increment_multi() {
    let mut sketch = CountMinSketchBuilder::with_dimensions(128, 6)
        .seed(10)
        .build()
        .unwrap();
    for i in 0..1_000_000u64 {
        sketch.add(i % 100);
    }
    for key in 0..100u64 {
        assert!(sketch.estimate(key) >= 10_000);
    }
}
