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

//! Sketch dimensions from error and confidence parameters.

use std::f64::consts::E;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Largest supported row width.
///
/// Bounds the counter table's memory and keeps every column index far below the
/// hash family's prime modulus.
pub const MAX_WIDTH: usize = 1 << 31;

/// Largest supported row count.
///
/// Reached at `delta` of about `1.6e-28`. Smaller `delta`, down to subnormal
/// values whose reciprocal is infinite, is rejected rather than sized.
pub const MAX_DEPTH: usize = 64;

/// Returns the row width `ceil(e / epsilon)` needed for relative error `epsilon`.
///
/// The input is not validated; see [`Accuracy::new`].
///
/// # Examples
///
/// ```
/// # use minsketch::countmin::suggest_width;
/// assert_eq!(suggest_width(1.0), 3);
/// assert_eq!(suggest_width(0.1), 28);
/// assert_eq!(suggest_width(0.01), 272);
/// ```
pub fn suggest_width(epsilon: f64) -> usize {
    (E / epsilon).ceil() as usize
}

/// Returns the row count `ceil(ln(1 / delta))` needed for failure probability
/// `delta`, never less than one.
///
/// The input is not validated; see [`Accuracy::new`].
///
/// # Examples
///
/// ```
/// # use minsketch::countmin::suggest_depth;
/// assert_eq!(suggest_depth(1.0), 1);
/// assert_eq!(suggest_depth(0.1), 3);
/// assert_eq!(suggest_depth(0.01), 5);
/// ```
pub fn suggest_depth(delta: f64) -> usize {
    ((1.0 / delta).ln().ceil() as usize).max(1)
}

/// Validated error and confidence parameters of a sketch.
///
/// `epsilon` bounds the additive error relative to the stream length, and
/// `delta` is the probability that a single estimate exceeds that bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accuracy {
    epsilon: f64,
    delta: f64,
}

impl Accuracy {
    /// Validates `epsilon` and `delta`.
    ///
    /// Both must lie in `(0, 1]`, and neither may be so small that the derived
    /// width exceeds [`MAX_WIDTH`] or the derived depth exceeds [`MAX_DEPTH`].
    pub fn new(epsilon: f64, delta: f64) -> Result<Self, Error> {
        check_unit_range("epsilon", epsilon)?;
        check_unit_range("delta", delta)?;
        let width = suggest_width(epsilon);
        if width > MAX_WIDTH {
            return Err(Error::config_invalid(format!(
                "epsilon {epsilon} needs width {width}, above the maximum {MAX_WIDTH}"
            ))
            .with_context("epsilon", epsilon)
            .with_context("width", width));
        }
        let depth = suggest_depth(delta);
        if depth > MAX_DEPTH {
            return Err(Error::config_invalid(format!(
                "delta {delta} needs depth {depth}, above the maximum {MAX_DEPTH}"
            ))
            .with_context("delta", delta)
            .with_context("depth", depth));
        }
        check_table_size(width, depth)?;
        Ok(Self { epsilon, delta })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Number of counters per row.
    pub fn width(&self) -> usize {
        suggest_width(self.epsilon)
    }

    /// Number of rows.
    pub fn depth(&self) -> usize {
        suggest_depth(self.delta)
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.epsilon, self.delta)
    }
}

/// Parses `"<epsilon>,<delta>"`, for example `"0.01, 0.001"`.
impl FromStr for Accuracy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((epsilon, delta)) = s.split_once(',') else {
            return Err(Error::config_invalid(format!(
                "expected \"<epsilon>,<delta>\"; got {s:?}"
            )));
        };
        let epsilon = parse_param("epsilon", epsilon)?;
        let delta = parse_param("delta", delta)?;
        Accuracy::new(epsilon, delta)
    }
}

fn parse_param(name: &'static str, raw: &str) -> Result<f64, Error> {
    let raw = raw.trim();
    raw.parse::<f64>().map_err(|err| {
        Error::config_invalid(format!("{name} is not a number"))
            .with_context(name, raw)
            .set_source(err)
    })
}

/// Rejects dimensions whose counter count does not fit in `usize`.
pub(crate) fn check_table_size(width: usize, depth: usize) -> Result<(), Error> {
    if width.checked_mul(depth).is_none() {
        return Err(Error::config_invalid("width * depth overflows")
            .with_context("width", width)
            .with_context("depth", depth));
    }
    Ok(())
}

// Written so that NaN fails the check.
fn check_unit_range(name: &'static str, value: f64) -> Result<(), Error> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::out_of_unit_range(name, value))
    }
}
