// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Prime number tables.
//!
//! Tables are built eagerly by a sieve of Eratosthenes over odd numbers
//! and are immutable in all hot paths: trial division instances take a
//! reference at construction time and copy what they need, so one table
//! can serve several instances without shared mutable state.

pub fn primes(n: u32) -> Vec<u32> {
    // The n-th prime is always less than n * n.bit_length()
    // except for n = 1.
    let bound = std::cmp::max(100, n * (32 - n.leading_zeros())) as usize;
    // sieve[i] says that 2i+1 is composite
    let mut sieve = vec![false; bound / 2];
    let mut primes = vec![2];
    for i in 1..sieve.len() {
        if !sieve[i] {
            let p = 2 * i + 1;
            primes.push(p as u32);
            if primes.len() == n as usize {
                break;
            }
            // No need to sieve numbers above sqrt(bound)
            if p as u64 * p as u64 > bound as u64 {
                continue;
            }
            // First odd multiple is 3p.
            let mut k = p + p / 2;
            while k < sieve.len() {
                sieve[k] = true;
                k += p
            }
        }
    }
    primes
}

/// All primes up to an inclusive value bound, in ascending order.
///
/// The table can grow monotonically through [`PrimeTable::ensure_limit`],
/// by sieving again with the larger bound. Growth never reorders or
/// removes entries.
#[derive(Clone, Debug)]
pub struct PrimeTable {
    primes: Vec<u64>,
    bound: u64,
}

impl PrimeTable {
    pub fn up_to(limit: u64) -> Self {
        PrimeTable {
            primes: sieve_upto(limit),
            bound: limit,
        }
    }

    /// Grows the table so that all primes up to limit are present.
    /// Does nothing if the table already covers limit.
    pub fn ensure_limit(&mut self, limit: u64) {
        if limit > self.bound {
            self.primes = sieve_upto(limit);
            self.bound = limit;
        }
    }

    /// The value bound the table was built for (not the last prime).
    pub fn bound(&self) -> u64 {
        self.bound
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    pub fn p(&self, idx: usize) -> u64 {
        self.primes[idx]
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.primes
    }
}

fn sieve_upto(limit: u64) -> Vec<u64> {
    let mut primes = vec![];
    if limit < 2 {
        return primes;
    }
    primes.push(2);
    let bound = limit as usize;
    // sieve[i] says that 2i+1 is composite
    let half = bound / 2 + 1;
    let mut sieve = vec![false; half];
    for i in 1..half {
        if sieve[i] {
            continue;
        }
        let p = 2 * i + 1;
        if p > bound {
            break;
        }
        primes.push(p as u64);
        if p * p > bound {
            continue;
        }
        // First odd multiple is 3p.
        let mut k = p + p / 2;
        while k < half {
            sieve[k] = true;
            k += p;
        }
    }
    primes
}

#[test]
fn test_primes() {
    let ps = primes(50000);
    assert!(ps.len() == 50000);
    assert_eq!(ps.last(), Some(&611953));
}

#[test]
fn test_prime_table() {
    let t = PrimeTable::up_to(1000);
    assert_eq!(t.len(), 168);
    assert_eq!(t.p(0), 2);
    assert_eq!(t.p(t.len() - 1), 997);
    assert_eq!(t.bound(), 1000);
    // Ascending, no duplicates.
    assert!(t.as_slice().windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_prime_table_growth() {
    let mut t = PrimeTable::up_to(100);
    assert_eq!(t.len(), 25);
    t.ensure_limit(10000);
    assert_eq!(t.len(), 1229);
    assert_eq!(t.p(t.len() - 1), 9973);
    // Shrinking requests are ignored.
    t.ensure_limit(10);
    assert_eq!(t.len(), 1229);
    assert_eq!(t.bound(), 10000);
}

#[test]
fn test_prime_table_matches_primes() {
    // 611953 is the 50000th prime.
    let t = PrimeTable::up_to(611953);
    let ps = primes(50000);
    assert_eq!(t.len(), ps.len());
    for (i, &p) in ps.iter().enumerate() {
        assert_eq!(t.p(i), p as u64);
    }
}
