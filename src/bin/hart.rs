// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Command line driver for the factorization engines.
//!
//! Prints the full prime decomposition of each input number, splitting
//! composite cofactors with the Hart search and checking the parts with
//! a deterministic primality test.

use std::str::FromStr;
use std::time::Instant;

use rayon::prelude::*;

use hartline::arith;
use hartline::hart::HartOneLine;
use hartline::tdiv::TDivInverse;
use hartline::Verbosity;

fn main() {
    let arg = arguments::parse(std::env::args()).unwrap();
    if arg.orphans.is_empty() || arg.get::<bool>("help").is_some() {
        eprintln!("Usage: hart [--mode hart|hart0|tdiv] [--threads N] [--v silent|info|debug] NUMBER...");
        eprintln!();
        eprintln!("Modes:");
        eprintln!("  hart   Hart search with trial division pre-pass (default)");
        eprintln!("  hart0  plain Hart search, may miss factors below cbrt(N)");
        eprintln!("  tdiv   reciprocal trial division only");
        return;
    }
    let mode = arg.get::<String>("mode").unwrap_or("hart".into());
    let threads = arg.get::<usize>("threads");
    let v = match arg.get::<String>("v") {
        Some(s) => Verbosity::from_str(&s).unwrap(),
        None => Verbosity::Info,
    };
    let ns: Vec<u64> = arg
        .orphans
        .iter()
        .map(|s| u64::from_str(s).expect("could not read decimal number"))
        .collect();
    for &n in &ns {
        assert!(n > 1, "cannot factor {n}");
        assert!(
            n >> 62 == 0,
            "number size ({} bits) exceeds 62 bits limit",
            64 - n.leading_zeros()
        );
    }

    if mode == "tdiv" {
        let tdiv = TDivInverse::new(1 << 21);
        for &n in &ns {
            let factors = tdiv.factor(n);
            let strs: Vec<String> = factors
                .iter()
                .map(|&(p, exp)| {
                    if exp > 1 {
                        format!("{p}^{exp}")
                    } else {
                        format!("{p}")
                    }
                })
                .collect();
            println!("{n} = {}", strs.join(" * "));
            for &(p, _) in &factors {
                if !arith::isprime64(p) {
                    eprintln!("Cofactor {p} is composite, its factors exceed the table capacity");
                }
            }
        }
        return;
    }
    if mode != "hart" && mode != "hart0" {
        eprintln!("Invalid operation mode {mode:?}");
        return;
    }

    let hart = HartOneLine::new(mode == "hart");
    let t0 = Instant::now();
    let results: Vec<Vec<u64>> = if let Some(t) = threads {
        if v >= Verbosity::Info {
            eprintln!("Using a pool of {t} threads");
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(t)
            .build()
            .expect("cannot create thread pool");
        pool.install(|| ns.par_iter().map(|&n| factor_full(&hart, n, v)).collect())
    } else {
        ns.iter().map(|&n| factor_full(&hart, n, v)).collect()
    };
    for (&n, factors) in ns.iter().zip(&results) {
        let strs: Vec<String> = factors.iter().map(u64::to_string).collect();
        println!("{n} = {}", strs.join(" * "));
    }
    if v >= Verbosity::Info {
        eprintln!(
            "Processed {} numbers in {:.3}s",
            ns.len(),
            t0.elapsed().as_secs_f64()
        );
    }
}

/// Prime factors of n with multiplicity, in ascending order. Cofactors
/// the search cannot split are reported as is.
fn factor_full(hart: &HartOneLine, n: u64, v: Verbosity) -> Vec<u64> {
    let mut pending = vec![n];
    let mut factors = vec![];
    while let Some(m) = pending.pop() {
        if m == 1 {
            continue;
        }
        if arith::isprime64(m) {
            factors.push(m);
            continue;
        }
        match hart.find_single_factor(m) {
            Some(d) => {
                pending.push(d);
                pending.push(m / d);
            }
            None => {
                if v >= Verbosity::Info {
                    eprintln!("Could not split composite {m}, try mode hart");
                }
                factors.push(m);
            }
        }
    }
    factors.sort_unstable();
    factors
}
