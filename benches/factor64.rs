use std::time::Duration;

use brunch::Bench;
use hartline::arith;
use hartline::hart::HartOneLine;
use hartline::tdiv::TDivInverse;

brunch::benches! {
    {
        let hart = HartOneLine::new(false);
        let n44: &[u64] = &[
            5640012124823,
            7336014366011,
            19699548984827,
            26275638086419,
            32427229648727,
        ];
        Bench::new("5x hart n=44 bits")
            .with_timeout(Duration::from_secs(3))
            .run_seeded(n44, |ns| for &n in ns {
                hart.find_single_factor(n).unwrap();
            })
    },
    {
        let hart = HartOneLine::new(false);
        let n46: &[u64] = &[
            44843649362329,
            52199161732031,
            62246008190941,
            67954151927287,
            73891306919159,
        ];
        Bench::new("5x hart n=46 bits")
            .with_timeout(Duration::from_secs(3))
            .run_seeded(n46, |ns| for &n in ns {
                hart.find_single_factor(n).unwrap();
            })
    },
    {
        let hart = HartOneLine::new(false);
        let n50: &[u64] = &[
            338719143795073,
            346425669865991,
            737091621253457,
            1058244082458461,
            1112268234497993,
        ];
        Bench::new("5x hart n=50 bits")
            .with_timeout(Duration::from_secs(3))
            .run_seeded(n50, |ns| for &n in ns {
                hart.find_single_factor(n).unwrap();
            })
    },
    {
        let tdiv = TDivInverse::new(1 << 21);
        let n40: &[u64] = &[
            712869263,
            386575807,
            569172749,
            624800360363,
            883246601513,
        ];
        Bench::new("5x tdiv small factors")
            .with_timeout(Duration::from_secs(3))
            .run_seeded(n40, |ns| for &n in ns {
                tdiv.find_single_factor(n).unwrap();
            })
    },
    {
        let tdiv = TDivInverse::new(1 << 21);
        let n44: &[u64] = &[
            13293477682249,
            24596491225651,
            44579405690563,
            72795445155721,
            293851765137859,
        ];
        Bench::new("5x tdiv n=44-48 bits")
            .with_timeout(Duration::from_secs(3))
            .run_seeded(n44, |ns| for &n in ns {
                tdiv.find_single_factor(n);
            })
    },
    {
        let n48: &[u64] = &[
            235075827453629,
            166130059616737,
            159247921097933,
            224077614412439,
            219669028971857,
        ];
        Bench::new("5x isprime64 n=48 bits")
            .run_seeded(n48, |ns| for &n in ns {
                assert!(!arith::isprime64(n));
            })
    },
}
