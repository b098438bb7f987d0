// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Implementation of Hart's one line factorization algorithm.
//!
//! For a sequence of multipliers k, a candidate a = ceil(sqrt(4kn)) is
//! tested for a^2 - 4kn being a perfect square b^2, in which case
//! gcd(a+b, n) is a candidate factor. Only multipliers that are multiples
//! of a fixed constant are tested; the residue classes skipped that way
//! are covered by adjusting a modulo small powers of two instead.
//!
//! The search is fastest on semiprimes whose factors have comparable
//! size. It is not guaranteed to find factors below cbrt(n): the trial
//! division pre-pass exists precisely to catch those, and disabling it
//! trades completeness for speed on hard semiprimes.
//!
//! References:
//! W. B. Hart, A one line factoring algorithm
//! (J. Aust. Math. Soc. 92, 2012)
//! R. S. Lehman, Factoring Large Integers (Math. Comp. 28, 1974)

use num_integer::Integer;

use crate::tdiv::TDivInverse;

/// Only multipliers k that are multiples of this constant are tested.
/// Best values for performance are 315, 45, 105, 15 and 3, in that order.
pub const K_MULT: u64 = 3 * 3 * 5 * 7; // 315

/// Size of the square root table, bounding the number of tested
/// multipliers. Inputs needing more multipliers than this fail cleanly.
const I_MAX: usize = 1 << 20;

/// Additive bias applied before truncating a f64 product to an integer,
/// compensating systematic downward rounding. Empirically tuned; must
/// stay below 1.
const ROUND_UP_F64: f64 = 0.9999999665;

/// Precomputed square roots s[i] = sqrt(i * k_mult).
///
/// Built once at construction and never mutated, so lookups are safe
/// from concurrent searches. The index doubles as the multiplier
/// counter: the candidate for multiplier k = i * k_mult is obtained by
/// multiplying s[i] with sqrt(4n).
pub struct SqrtTable {
    s: Box<[f64]>,
}

impl SqrtTable {
    pub fn new(i_max: usize, k_mult: u64) -> Self {
        let mut s = vec![0.0; i_max];
        for (i, v) in s.iter_mut().enumerate().skip(1) {
            *v = ((i as u64 * k_mult) as f64).sqrt();
        }
        SqrtTable {
            s: s.into_boxed_slice(),
        }
    }

    #[inline]
    fn get(&self, i: usize) -> f64 {
        self.s[i]
    }

    pub fn len(&self) -> usize {
        self.s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
    }
}

/// Hart's one line factorizer for integers up to about 62 bits.
///
/// All tables are immutable after construction and per-call state is
/// local, so a single instance can be shared by threads factoring
/// different inputs in parallel.
pub struct HartOneLine {
    do_tdiv_first: bool,
    sqrts: SqrtTable,
    tdiv: TDivInverse,
}

impl HartOneLine {
    /// Full constructor.
    ///
    /// With do_tdiv_first, trial division up to cbrt(n) runs before the
    /// multiplier loop. This is recommended when inputs frequently have
    /// factors below cbrt(n), which the loop alone may fail to find.
    pub fn new(do_tdiv_first: bool) -> Self {
        HartOneLine {
            do_tdiv_first,
            sqrts: SqrtTable::new(I_MAX, K_MULT),
            tdiv: TDivInverse::new(I_MAX as u64),
        }
    }

    /// Find a nontrivial factor of n (n > 1, not a prime).
    ///
    /// Returns None when the multiplier table is exhausted, which happens
    /// for prime n, and without the trial division pre-pass for some n
    /// with factors below cbrt(n). Callers needing an answer for every
    /// composite input must enable the pre-pass.
    pub fn find_single_factor(&self, n: u64) -> Option<u64> {
        assert!(n > 1, "invalid argument {n}");
        if self.do_tdiv_first {
            let limit = std::cmp::min((n as f64).cbrt() as u64, self.tdiv.capacity());
            let factor = self.tdiv.find_factor_upto(n, limit);
            if factor.is_some() {
                return factor;
            }
        }
        let four_n = n << 2;
        let sqrt4n = (four_n as f64).sqrt();
        let mut k = K_MULT;
        let mut i = 1;
        while i + 1 < self.sqrts.len() {
            // odd k: a^2 - 4kn can only be a square for certain residues
            // of a modulo 8, 16 or 32, depending on k*n + 1.
            let a = (sqrt4n * self.sqrts.get(i) + ROUND_UP_F64) as u64;
            i += 1;
            let a = adjust_a_odd_k(a, k.wrapping_mul(n).wrapping_add(1));
            if let Some(g) = test_candidate(n, four_n, k, a) {
                return Some(g);
            }
            k += K_MULT;

            // even k: a must be odd.
            let a = ((sqrt4n * self.sqrts.get(i) + ROUND_UP_F64) as u64) | 1;
            i += 1;
            if let Some(g) = test_candidate(n, four_n, k, a) {
                return Some(g);
            }
            k += K_MULT;
        }
        None
    }
}

/// Tests whether a^2 - 4kn is a perfect square b^2 and whether a+b has a
/// nontrivial gcd with n. The subtraction deliberately wraps: for
/// multipliers large enough to overflow, a wrapped value is almost never
/// a square, and a surviving gcd in (1, n) still divides n.
#[inline]
fn test_candidate(n: u64, four_n: u64, k: u64, a: u64) -> Option<u64> {
    let test = a.wrapping_mul(a).wrapping_sub(k.wrapping_mul(four_n)) as i64;
    let b = (test as f64).sqrt() as i64;
    if b.wrapping_mul(b) == test {
        let g = Integer::gcd(&(a + b as u64), &n);
        if g > 1 && g < n {
            return Some(g);
        }
    }
    None
}

/// For odd k (and odd n), moves a up to the nearest value allowed
/// modulo 8, 16 or 32, selecting by the residue of kn1 = k*n + 1. In the
/// ambiguous cases the closer of the two symmetric classes +-kn1 wins.
#[inline]
fn adjust_a_odd_k(a: u64, kn1: u64) -> u64 {
    if kn1 & 3 == 0 {
        a.wrapping_add(kn1.wrapping_sub(a) & 7)
    } else if kn1 & 7 == 6 {
        let adjust1 = kn1.wrapping_sub(a) & 31;
        let adjust2 = kn1.wrapping_neg().wrapping_sub(a) & 31;
        a.wrapping_add(std::cmp::min(adjust1, adjust2))
    } else {
        // kn1 = 2 mod 8
        let adjust1 = kn1.wrapping_sub(a) & 15;
        let adjust2 = kn1.wrapping_neg().wrapping_sub(a) & 15;
        a.wrapping_add(std::cmp::min(adjust1, adjust2))
    }
}

#[test]
fn test_sqrt_table() {
    let t = SqrtTable::new(1 << 10, K_MULT);
    assert_eq!(t.len(), 1 << 10);
    assert_eq!(t.get(1), (315_f64).sqrt());
    for i in 1..t.len() {
        assert_eq!(t.get(i), ((i as u64 * K_MULT) as f64).sqrt());
    }
    // Monotonically increasing.
    for i in 2..t.len() {
        assert!(t.get(i - 1) < t.get(i));
    }
}

#[test]
fn test_adjust_a_odd_k() {
    // The adjustment may only move a forward by a few units and must land
    // in the residue class kn1 mod 8, or +-kn1 mod 16 or 32.
    let mut x: u64 = 987654321;
    for _ in 0..10000 {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        let a = x >> 20;
        // kn1 = k*n + 1 with k, n odd is always even.
        let kn1 = (x >> 3) & !1;
        let adj = adjust_a_odd_k(a, kn1);
        assert!(adj >= a && adj - a < 32);
        if kn1 & 3 == 0 {
            assert_eq!(adj % 8, kn1 % 8);
        } else if kn1 & 7 == 6 {
            assert!(adj % 32 == kn1 % 32 || adj % 32 == kn1.wrapping_neg() % 32);
        } else {
            assert!(adj % 16 == kn1 % 16 || adj % 16 == kn1.wrapping_neg() % 16);
        }
    }
}

#[test]
fn test_hart_hard_semiprimes() {
    // Semiprimes with factors of comparable size: the plain multiplier
    // loop must factor all of them without trial division.
    let ns: &[u64] = &[
        5640012124823,
        7336014366011,
        19699548984827,
        52199161732031,
        73891306919159,
        112454098638991,
        32427229648727,
        87008511088033,
        92295512906873,
        338719143795073,
        346425669865991,
        1058244082458461,
        1773019201473077,
        6150742154616377,
        44843649362329,
        67954151927287,
        134170056884573,
        198589283218993,
        737091621253457,
        1112268234497993,
        2986396307326613,
        26275638086419,
        62246008190941,
        209195243701823,
        290236682491211,
        485069046631849,
        1239671094365611,
        2815471543494793,
        5682546780292609,
        // Numbers requiring a large multiplier table.
        135902052523483,
        1454149122259871,
        5963992216323061,
        26071073737844227,
        8296707175249091,
        35688516583284121,
    ];
    let hart = HartOneLine::new(false);
    for &n in ns {
        let g = hart.find_single_factor(n).unwrap();
        assert!(1 < g && g < n && n % g == 0, "bad factor {g} of {n}");
    }
}

#[test]
fn test_hart_with_tdiv() {
    // Odd composites, most with factors below cbrt(n): found through the
    // trial division pre-pass or the multiplier loop.
    let ns: &[u64] = &[
        949443, // = 3 * 11 * 28771
        996433, // = 31 * 32143
        1340465, // = 5 * 7 * 38299
        1979435, // = 5 * 395887
        2514615, // = 3 * 5 * 167641
        5226867, // = 3^2 * 580763
        10518047, // = 61 * 172427
        30783267, // = 3^3 * 1140121
        62230739, // = 67 * 928817
        84836647, // = 7 * 17 * 712913
        94602505,
        258555555,
        436396385,
        612066705,
        2017001503,
        3084734169,
        6700794123,
        16032993843, // = 3 * 5344331281
        26036808587,
        41703657595, // = 5 * 8340731519
        68889614021,
        197397887859, // = 3^2 * 21933098651
        2157195374713,
        8370014680591,
        22568765132167,
        63088136564083,
        712869263, // = 89 * 8009767
        386575807, // = 73 * 5295559
        569172749, // = 83 * 6857503
        624800360363, // = 233 * 2681546611
        883246601513, // = 251 * 3518910763
        35184372094495,
        893,
        35,
        9,
    ];
    let hart = HartOneLine::new(true);
    for &n in ns {
        let g = hart.find_single_factor(n).unwrap();
        assert!(1 < g && g < n && n % g == 0, "bad factor {g} of {n}");
    }
}

#[test]
fn test_hart_known_incomplete() {
    // Inputs whose only small factor lies below cbrt(n): the pruned
    // multiplier loop exhausts its table on them, by design.
    let hart = HartOneLine::new(false);
    assert_eq!(hart.find_single_factor(16032993843), None);
    assert_eq!(hart.find_single_factor(41703657595), None);
    assert_eq!(hart.find_single_factor(197397887859), None);
}

#[test]
fn test_hart_long_scan() {
    // 26036808587 needs an unusually long multiplier scan.
    let hart = HartOneLine::new(false);
    let g = hart.find_single_factor(26036808587).unwrap();
    assert!(1 < g && g < 26036808587 && 26036808587 % g == 0);
    // Repeated searches on immutable tables give identical answers.
    assert_eq!(hart.find_single_factor(26036808587), Some(g));
}

#[test]
fn test_hart_random_semiprimes() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::numgen::random_moderate_semiprime;

    let mut rng = StdRng::seed_from_u64(2023);
    let hart = HartOneLine::new(false);
    for bits in [36, 40, 44, 48] {
        for _ in 0..50 {
            let (n, p, q) = random_moderate_semiprime(&mut rng, bits);
            let g = hart.find_single_factor(n).unwrap();
            assert!(g == p || g == q, "bad factor {g} of {n} = {p} * {q}");
        }
    }
}

#[test]
fn test_hart_concurrent() {
    // One instance, several threads: tables are read-only and search
    // state is per-call.
    let ns: &[u64] = &[
        5640012124823,
        7336014366011,
        19699548984827,
        52199161732031,
        73891306919159,
        112454098638991,
        32427229648727,
        87008511088033,
    ];
    let hart = HartOneLine::new(false);
    let expected: Vec<Option<u64>> = ns.iter().map(|n| hart.find_single_factor(*n)).collect();
    std::thread::scope(|scope| {
        let mut handles = vec![];
        for chunk in ns.chunks(2) {
            let hart = &hart;
            handles.push(scope.spawn(move || {
                chunk
                    .iter()
                    .map(|n| hart.find_single_factor(*n))
                    .collect::<Vec<_>>()
            }));
        }
        let mut got = vec![];
        for h in handles {
            got.extend(h.join().unwrap());
        }
        assert_eq!(got, expected);
    });
}
