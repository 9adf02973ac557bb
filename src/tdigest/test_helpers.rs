//! Assertion helpers shared by unit tests, integration tests and benches.

use crate::tdigest::centroids::Centroid;

pub fn assert_exact(label: &str, expected: f64, got: f64) {
    assert!(
        expected == got,
        "{}: expected exactly {:.9}, got {:.9}",
        label,
        expected,
        got
    );
}

pub fn assert_abs_close(label: &str, expected: f64, got: f64, atol: f64) {
    let err = (expected - got).abs();
    assert!(
        err <= atol,
        "{}: expected {:.9} ± {:.3e}, got {:.9} (abs_err={:.6e})",
        label,
        expected,
        atol,
        got,
        err
    );
}

pub fn assert_rel_close(label: &str, expected: f64, got: f64, rtol: f64) {
    let denom = expected.abs().max(1e-300);
    let rel = ((expected - got).abs()) / denom;
    assert!(
        rel < rtol,
        "{}: expected ~= {:.9}, got {:.9}, rel_err={:.6e}, rtol={:.6e}",
        label,
        expected,
        got,
        rel,
        rtol
    );
}

pub fn assert_monotone_chain(label: &str, values: &[f64]) {
    for i in 1..values.len() {
        assert!(
            values[i] >= values[i - 1],
            "{}: non-monotone at i={}: {} < {}",
            label,
            i,
            values[i],
            values[i - 1]
        );
    }
}

/// Centroid means strictly increase and every weight is positive.
pub fn assert_strictly_ascending(label: &str, cs: &[Centroid]) {
    for (i, w) in cs.windows(2).enumerate() {
        assert!(
            w[0].mean() < w[1].mean(),
            "{}: means out of order at i={}: {} !< {}",
            label,
            i,
            w[0].mean(),
            w[1].mean()
        );
    }
    if let Some(c) = cs.iter().find(|c| !(c.weight() > 0.0)) {
        panic!("{}: non-positive weight in {:?}", label, c);
    }
}
