// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Random stress testing.
//!
//! This program generates random numbers of the requested bit length and
//! nature, runs the selected algorithm on them, and verifies every
//! reported factor. For trial division the None answers are also checked
//! against the known smallest factor of the generated inputs.

use std::str::FromStr;
use std::time::Instant;

use hartline::hart::HartOneLine;
use hartline::numgen::{self, NumberNature};
use hartline::tdiv::TDivInverse;

fn main() {
    let arg = arguments::parse(std::env::args()).unwrap();
    if arg.get::<bool>("help").is_some() {
        eprintln!("Usage: hart-test [OPTIONS]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --help                        show this help");
        eprintln!("  --mode hart|hart0|tdiv        algorithm selection");
        eprintln!("  --nature composite|semiprime  input distribution");
        eprintln!("  --bits B                      input length (default 46)");
        eprintln!("  --count C                     stop after C inputs (default: run forever)");
        return;
    }
    let mode = arg.get::<String>("mode").unwrap_or("hart".into());
    if mode != "hart" && mode != "hart0" && mode != "tdiv" {
        eprintln!("Invalid operation mode {mode:?}");
        return;
    }
    let nature =
        NumberNature::from_str(&arg.get::<String>("nature").unwrap_or("semiprime".into())).unwrap();
    let bits = arg.get::<u32>("bits").unwrap_or(46);
    let count = arg.get::<u64>("count").unwrap_or(u64::MAX);

    let hart = (mode != "tdiv").then(|| HartOneLine::new(mode == "hart"));
    let tdiv = (mode == "tdiv").then(|| TDivInverse::new(1 << 21));
    let p_limit = 1 << std::cmp::min(21, (bits + 1) / 2);

    let mut rng = rand::thread_rng();
    let mut found = 0u64;
    let mut missed = 0u64;
    let t0 = Instant::now();
    for i in 1..=count {
        let (n, smallest) = match nature {
            NumberNature::Composite => (numgen::random_composite(&mut rng, bits), None),
            NumberNature::ModerateSemiprime => {
                let (n, p, _) = numgen::random_moderate_semiprime(&mut rng, bits);
                (n, Some(p))
            }
        };
        let factor = match (&hart, &tdiv) {
            (Some(h), _) => h.find_single_factor(n),
            (_, Some(td)) => td.find_factor_upto(n, p_limit),
            _ => unreachable!(),
        };
        match factor {
            Some(g) => {
                assert!(1 < g && g < n && n % g == 0, "bad factor {g} of {n}");
                found += 1;
            }
            None => {
                if let (Some(_), Some(p)) = (&tdiv, smallest) {
                    assert!(p > p_limit, "missed factor {p} of {n} with limit {p_limit}");
                }
                missed += 1;
            }
        }
        if i % 1000 == 0 {
            let elapsed = t0.elapsed().as_secs_f64();
            let avg = elapsed / i as f64 * 1000.;
            eprintln!(
                "Processed {i} numbers in {elapsed:.3}s (average {avg:.3}ms, {found} factored, {missed} missed)"
            );
        }
    }
}
