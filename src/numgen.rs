// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Generation of random test inputs.
//!
//! The stress harness and benchmarks draw inputs from one of a few
//! statistical "natures", because the relative speed of the algorithms
//! depends heavily on the factor distribution of the inputs.

use std::str::FromStr;

use rand::Rng;

use crate::arith;

/// Statistical nature of generated test inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberNature {
    /// Random numbers of a given bit length, constrained to n > 2
    /// and n not prime.
    Composite,
    /// Semiprimes n = p*q where min(p, q) has at least bits(n)/3 bits.
    /// The smaller factor can still be below cbrt(n), so algorithms
    /// without trial division may miss it.
    ModerateSemiprime,
}

impl FromStr for NumberNature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "composite" => Ok(NumberNature::Composite),
            "semiprime" => Ok(NumberNature::ModerateSemiprime),
            _ => Err(format!("invalid number nature {s}")),
        }
    }
}

/// Random prime with exactly the requested bit length.
pub fn random_prime<R: Rng>(rng: &mut R, bits: u32) -> u64 {
    assert!((2..=62).contains(&bits), "invalid bit length {bits}");
    loop {
        let mut p = rng.gen::<u64>();
        p &= (1 << bits) - 1;
        p |= (1 << (bits - 1)) | 1;
        if arith::isprime64(p) {
            return p;
        }
    }
}

/// Random semiprime n = p*q of about the requested bit length, with
/// p < q of balanced sizes. Returns (n, p, q).
pub fn random_moderate_semiprime<R: Rng>(rng: &mut R, bits: u32) -> (u64, u64, u64) {
    assert!((6..=62).contains(&bits), "invalid bit length {bits}");
    let pbits = bits / 2;
    let qbits = bits - pbits;
    let p = random_prime(rng, pbits);
    loop {
        let q = random_prime(rng, qbits);
        if q != p {
            let (p, q) = (std::cmp::min(p, q), std::cmp::max(p, q));
            return (p * q, p, q);
        }
    }
}

/// Random composite below 2^bits (n > 2, n not prime).
pub fn random_composite<R: Rng>(rng: &mut R, bits: u32) -> u64 {
    assert!((3..=62).contains(&bits), "invalid bit length {bits}");
    loop {
        let n = rng.gen::<u64>() & ((1 << bits) - 1);
        if n > 2 && !arith::isprime64(n) {
            return n;
        }
    }
}

#[cfg(test)]
fn test_rng() -> rand::rngs::StdRng {
    use rand::SeedableRng;
    rand::rngs::StdRng::seed_from_u64(1234567)
}

#[test]
fn test_random_prime() {
    let mut rng = test_rng();
    for bits in [2, 5, 10, 20, 30, 40, 50, 62] {
        for _ in 0..20 {
            let p = random_prime(&mut rng, bits);
            assert_eq!(64 - p.leading_zeros(), bits);
            assert!(arith::isprime64(p));
        }
    }
}

#[test]
fn test_random_moderate_semiprime() {
    let mut rng = test_rng();
    for bits in [6, 10, 20, 30, 40, 50, 62] {
        for _ in 0..20 {
            let (n, p, q) = random_moderate_semiprime(&mut rng, bits);
            assert_eq!(n, p * q);
            assert!(p < q);
            assert!(arith::isprime64(p) && arith::isprime64(q));
            // min(p, q) must have at least bits(n)/3 bits.
            let nbits = 64 - n.leading_zeros();
            assert!(3 * (64 - p.leading_zeros()) >= nbits);
        }
    }
}

#[test]
fn test_random_composite() {
    let mut rng = test_rng();
    for bits in [3, 10, 20, 40, 62] {
        for _ in 0..20 {
            let n = random_composite(&mut rng, bits);
            assert!(n > 2 && !arith::isprime64(n));
            assert!(64 - n.leading_zeros() <= bits);
        }
    }
}
