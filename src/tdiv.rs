// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Trial division replacing integer division by multiplications.
//!
//! Instead of dividing N by consecutive primes, the reciprocals of the
//! primes are precomputed and N is multiplied by them. A quotient close
//! enough to an integer selects a candidate, which is then verified by
//! an exact integer re-multiplication, so a false factor can never be
//! reported. Identifying "near integers" with precision 2^-d makes the
//! shortcut valid for primes p with bit_length(p) >= bit_length(N) - 53 + d;
//! smaller primes are tested with an exact remainder instead.

use crate::primes::PrimeTable;
use crate::BoundExceeded;

pub const DISCRIMINATOR_BITS: u32 = 10; // experimental result
const DISCRIMINATOR: f64 = 1.0 / (1u64 << DISCRIMINATOR_BITS) as f64;

/// Trial division engine with precomputed prime reciprocals.
///
/// The prime and reciprocal tables are parallel arrays in ascending
/// prime order, built once at construction. All search methods take
/// `&self`, so one instance can serve concurrent callers.
#[derive(Clone, Debug)]
pub struct TDivInverse {
    primes: Vec<u64>,
    reciprocals: Vec<f64>,
    capacity: u64,
    p_limit: u64,
}

impl TDivInverse {
    /// Create a trial division engine capable of finding factors up to
    /// factor_limit (inclusive). The test limit defaults to the same bound.
    pub fn new(factor_limit: u64) -> Self {
        Self::with_table(&PrimeTable::up_to(factor_limit), factor_limit)
    }

    /// Same as [`TDivInverse::new`] from a shared prime table, which must
    /// cover factor_limit.
    pub fn with_table(table: &PrimeTable, factor_limit: u64) -> Self {
        assert!(
            table.bound() >= factor_limit,
            "prime table bound {} below factor limit {}",
            table.bound(),
            factor_limit
        );
        let mut primes = vec![];
        let mut reciprocals = vec![];
        for &p in table.as_slice() {
            if p > factor_limit {
                break;
            }
            primes.push(p);
            reciprocals.push(1.0 / p as f64);
        }
        TDivInverse {
            primes,
            reciprocals,
            capacity: factor_limit,
            p_limit: factor_limit,
        }
    }

    /// The factor bound the tables were built for.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Set the inclusive upper limit of primes to be tested by the next
    /// [`TDivInverse::find_single_factor`] calls. Limits above the
    /// construction capacity are rejected: the tables have no reciprocals
    /// for those primes and a silently clamped search would be
    /// indistinguishable from a genuine miss.
    pub fn set_test_limit(&mut self, p_limit: u64) -> Result<(), BoundExceeded> {
        if p_limit > self.capacity {
            return Err(BoundExceeded {
                requested: p_limit,
                capacity: self.capacity,
            });
        }
        self.p_limit = p_limit;
        Ok(())
    }

    /// Find the smallest prime factor of n not exceeding the configured
    /// test limit. Returns None when n has no factor in range, in
    /// particular when the smallest factor of n is larger than the limit.
    pub fn find_single_factor(&self, n: u64) -> Option<u64> {
        self.find_factor_upto(n, self.p_limit)
    }

    /// Same as [`TDivInverse::find_single_factor`] with an explicit
    /// inclusive limit, leaving the configured one untouched. The limit is
    /// capped by the construction capacity.
    pub fn find_factor_upto(&self, n: u64, p_limit: u64) -> Option<u64> {
        debug_assert!(n > 1);
        let nbits = 64 - n.leading_zeros() as i64;
        let pmin_bits = nbits - 53 + DISCRIMINATOR_BITS as i64;
        let mut i = 0;
        if pmin_bits > 0 {
            // The reciprocal product cannot be trusted for the smallest
            // primes against an n of this magnitude: exact remainders.
            let pmin = 1u64 << pmin_bits;
            while i < self.primes.len() {
                let p = self.primes[i];
                if p >= pmin || p > p_limit {
                    break;
                }
                if p * p > n {
                    return None;
                }
                if n % p == 0 {
                    return Some(p);
                }
                i += 1;
            }
        }
        // Primes are now big enough for the reciprocal shortcut.
        while i < self.primes.len() {
            let p = self.primes[i];
            if p > p_limit {
                break;
            }
            if p * p > n {
                return None;
            }
            let q = (n as f64 * self.reciprocals[i] + DISCRIMINATOR) as u64;
            if q * p == n {
                return Some(p);
            }
            i += 1;
        }
        None
    }

    /// Full prime decomposition of n by trial division: ascending
    /// (prime, exponent) pairs whose product reconstructs n exactly.
    ///
    /// Primes are tested up to the construction capacity regardless of the
    /// configured test limit; once p^2 exceeds the remaining cofactor, that
    /// cofactor is prime and emitted as the last pair. When n exceeds the
    /// square of the capacity the final cofactor may itself be composite;
    /// capacity >= sqrt(n) guarantees prime output.
    pub fn factor(&self, n: u64) -> Vec<(u64, u32)> {
        assert!(n > 1, "invalid argument {n}");
        let mut n = n;
        let mut factors: Vec<(u64, u32)> = vec![];
        for i in 0..self.primes.len() {
            let p = self.primes[i];
            let r = self.reciprocals[i];
            let pbits = 64 - p.leading_zeros() as i64;
            let mut exp = 0;
            loop {
                let nbits = 64 - n.leading_zeros() as i64;
                if pbits < nbits - 53 + DISCRIMINATOR_BITS as i64 {
                    // Below the precision threshold for the current
                    // cofactor magnitude.
                    if n % p != 0 {
                        break;
                    }
                    n /= p;
                } else {
                    let q = (n as f64 * r + DISCRIMINATOR) as u64;
                    if q.wrapping_mul(p) != n {
                        break;
                    }
                    // q is exactly n / p
                    n = q;
                }
                exp += 1;
            }
            if exp > 0 {
                factors.push((p, exp));
            }
            if p * p > n {
                if n > 1 {
                    factors.push((n, 1));
                }
                return factors;
            }
        }
        if n > 1 {
            factors.push((n, 1));
        }
        factors
    }
}

#[test]
fn test_tdiv_basic() {
    let td = TDivInverse::new(1 << 21);
    assert_eq!(td.find_single_factor(949443), Some(3));
    assert_eq!(td.find_single_factor(35), Some(5));
    // 67915439339311 = 2061599 * 32943089, both below 2^21.
    assert_eq!(td.find_single_factor(67915439339311), Some(2061599));
    // Small-factor 40-bit inputs.
    assert_eq!(td.find_single_factor(624800360363), Some(233));
    assert_eq!(td.find_single_factor(883246601513), Some(251));
}

#[test]
fn test_tdiv_none() {
    let td = TDivInverse::new(1 << 21);
    // Smallest factors 3311299, 3311299 and 11736397: all above 2^21.
    assert_eq!(td.find_single_factor(13293477682249), None);
    assert_eq!(td.find_single_factor(24596491225651), None);
    assert_eq!(td.find_single_factor(293851765137859), None);
    // Primes have no factor at all.
    assert_eq!(td.find_single_factor(999999999989), None);
}

#[test]
fn test_tdiv_special() {
    // Inputs with factors on both sides of the table capacity: whenever
    // a factor is reported it must divide the input and honor the test
    // limit.
    let ns: &[u64] = &[
        621887327,
        676762483,
        2947524803,
        5616540799,
        35936505149,
        145682871839,
        317756737253,
        3294635112749,
        13293477682249,
        24596491225651,
        44579405690563,
        72795445155721,
        155209074377713,
        293851765137859,
        67915439339311,
    ];
    let td = TDivInverse::new(1 << 21);
    for &n in ns {
        if let Some(p) = td.find_single_factor(n) {
            assert!(n % p == 0, "{p} does not divide {n}");
            assert!(1 < p && p <= 1 << 21);
        }
    }
}

#[test]
fn test_shared_table() {
    // One prime table can feed several instances.
    let table = PrimeTable::up_to(1 << 16);
    let td1 = TDivInverse::with_table(&table, 1 << 16);
    let mut td2 = TDivInverse::with_table(&table, 1 << 12);
    assert_eq!(td1.find_single_factor(949443), Some(3));
    assert_eq!(td2.find_single_factor(949443), Some(3));
    // 28771 fits the capacity of td1 only.
    assert_eq!(td1.find_single_factor(28771 * 65003), Some(28771));
    assert_eq!(td2.find_single_factor(28771 * 65003), None);
    assert!(td2.set_test_limit(1 << 16).is_err());
}

#[test]
fn test_set_test_limit() {
    let mut td = TDivInverse::new(1 << 21);
    assert_eq!(
        td.set_test_limit(1 << 22),
        Err(crate::BoundExceeded {
            requested: 1 << 22,
            capacity: 1 << 21,
        })
    );
    // 10403 = 101 * 103
    td.set_test_limit(100).unwrap();
    assert_eq!(td.find_single_factor(10403), None);
    td.set_test_limit(101).unwrap();
    assert_eq!(td.find_single_factor(10403), Some(101));
}

#[test]
fn test_tdiv_factor() {
    let td = TDivInverse::new(1 << 21);
    assert_eq!(td.factor(949443), vec![(3, 1), (11, 1), (28771, 1)]);
    assert_eq!(td.factor(720), vec![(2, 4), (3, 2), (5, 1)]);
    assert_eq!(td.factor(101), vec![(101, 1)]);
    assert_eq!(td.factor(1 << 40), vec![(2, 40)]);
    // Prime input yields a single pair.
    assert_eq!(td.factor(999999999989), vec![(999999999989, 1)]);
    // 55-bit input mixing small primes and a large prime cofactor.
    assert_eq!(
        td.factor(27647999999695872),
        vec![(2, 10), (3, 3), (999999999989, 1)]
    );
}

#[test]
fn test_tdiv_factor_roundtrip() {
    let td = TDivInverse::new(1 << 21);
    for n in 2..5000_u64 {
        let fs = td.factor(n);
        let mut m = 1;
        for &(p, exp) in &fs {
            for _ in 0..exp {
                m *= p;
            }
        }
        assert_eq!(m, n, "bad decomposition {fs:?} of {n}");
        assert!(fs.windows(2).all(|w| w[0].0 < w[1].0));
    }
}

#[test]
fn test_tdiv_random_semiprimes() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::numgen::random_prime;

    // A None answer must mean that the smallest factor exceeds the test
    // limit: verified against semiprimes with known factors.
    let mut rng = StdRng::seed_from_u64(42);
    let td = TDivInverse::new(1 << 21);
    for bits in [20, 30, 40, 50, 60] {
        let p_limit = 1 << std::cmp::min(21, (bits + 1) / 2);
        for _ in 0..50 {
            let p = random_prime(&mut rng, bits / 2);
            let q = random_prime(&mut rng, bits - bits / 2);
            let n = p * q;
            match td.find_factor_upto(n, p_limit) {
                Some(f) => {
                    assert!(n % f == 0 && 1 < f && f < n);
                    assert!(f <= p_limit);
                }
                None => {
                    assert!(
                        std::cmp::min(p, q) > p_limit,
                        "missed factor {} of {n} with limit {p_limit}",
                        std::cmp::min(p, q)
                    );
                }
            }
        }
    }
}
