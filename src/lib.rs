// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;
use std::str::FromStr;

pub mod arith;
pub mod numgen;
pub mod primes;

// Implementations
pub mod hart;
pub mod tdiv;

/// Requested output volume of command-line drivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent,
    Info,
    Debug,
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "silent" => Ok(Verbosity::Silent),
            "info" => Ok(Verbosity::Info),
            "debug" => Ok(Verbosity::Debug),
            _ => Err(format!("invalid verbosity level {s}")),
        }
    }
}

/// Error when a requested test limit exceeds the capacity selected at
/// construction time. Tables are never grown implicitly: silently
/// truncating the limit would make a genuine "no factor found" answer
/// indistinguishable from a misconfiguration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundExceeded {
    pub requested: u64,
    pub capacity: u64,
}

impl fmt::Display for BoundExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "test limit {} exceeds table capacity {}",
            self.requested, self.capacity
        )
    }
}

impl std::error::Error for BoundExceeded {}
