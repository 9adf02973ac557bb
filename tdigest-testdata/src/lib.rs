//! tdigest-testdata
//! Synthetic point generators and reference inverse CDFs shared by benches and
//! tests. Nothing here is part of the digest itself.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Available random distributions for [`gen_dataset`].
#[derive(Clone, Copy, Debug)]
pub enum DistKind {
    /// Uniform in \[lo, hi)
    Uniform { lo: f64, hi: f64 },
    /// Gaussian N(mu, sigma²)
    Normal { mu: f64, sigma: f64 },
    /// Logistic(mu, s), sampled through its inverse CDF
    Logistic { mu: f64, s: f64 },
}

/// Draw `n` random samples from `kind`.
pub fn gen_dataset(kind: DistKind, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(n);

    match kind {
        DistKind::Uniform { lo, hi } => {
            for _ in 0..n {
                out.push(rng.random_range(lo..hi));
            }
        }
        DistKind::Normal { mu, sigma } => {
            let normal = Normal::new(mu, sigma).expect("sigma must be finite and >= 0");
            for _ in 0..n {
                out.push(normal.sample(&mut rng));
            }
        }
        DistKind::Logistic { mu, s } => {
            for _ in 0..n {
                // Open interval keeps ln(1/y - 1) finite.
                let y: f64 = rng.random_range(f64::EPSILON..1.0);
                out.push(logistic_inv_cdf(y, mu, s));
            }
        }
    }
    out
}

/// `n` evenly spaced points covering \[lo, hi] inclusive.
pub fn uniform_points(n: usize, lo: f64, hi: f64) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + step * i as f64).collect()
        }
    }
}

/// `(i/n)²` for `i` in `0..n`.
pub fn squared_points(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let x = i as f64 / n as f64;
            x * x
        })
        .collect()
}

/// Logistic(mu, s) quantile function: `mu − s·ln(1/y − 1)`.
pub fn logistic_inv_cdf(y: f64, mu: f64, s: f64) -> f64 {
    mu - s * (1.0 / y - 1.0).ln()
}

/// `n` logistic points at plotting positions `(i+1)/(n+1)`: deterministic and
/// free of sampling noise.
pub fn logistic_points(n: usize, mu: f64, s: f64) -> Vec<f64> {
    (0..n)
        .map(|i| logistic_inv_cdf((i as f64 + 1.0) / (n as f64 + 1.0), mu, s))
        .collect()
}

/// Seeded Fisher–Yates shuffle.
pub fn shuffled(mut xs: Vec<f64>, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    xs.shuffle(&mut rng);
    xs
}
