use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Scale families define the `q → k` mapping that bounds cluster size.
///
/// Both algorithms only ever ask a scale for the *next ceiling*: given the
/// cumulative weight fraction already consumed, where does the next unit of
/// `k` run out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")] // accept "k0", "k1"
pub enum ScaleFamily {
    /// Linear scale: every cluster may span `2/δ` of the mass.
    K0,
    /// k1: arcsine scale (DEFAULT). Tight near the tails, loose in the middle.
    #[default]
    K1,
    /// Caller-supplied `(k, k⁻¹)` functions. Has no serialized name, so a
    /// config carrying it cannot be written out.
    #[serde(skip)]
    Custom(ScalePair),
}

/// A `(k, k⁻¹)` pair parameterized by the compression `δ`.
///
/// Implemented by [`ScaleFamily`] and by [`ScalePair`] (plain function values),
/// so callers can inject their own mapping without touching the algorithms.
pub trait ScaleFunction {
    /// `q ∈ [0, 1]` → scale value.
    fn k(&self, q: f64, delta: f64) -> f64;

    /// Scale value → `q`.
    fn k_inv(&self, k: f64, delta: f64) -> f64;

    /// `k⁻¹(k(q) + 1)`: the fraction at which the next unit of `k` is exhausted.
    #[inline]
    fn next_ceiling(&self, q: f64, delta: f64) -> f64 {
        self.k_inv(self.k(q, delta) + 1.0, delta)
    }
}

/// Scale built from two function values.
#[derive(Debug, Copy, Clone)]
pub struct ScalePair {
    pub k: fn(f64, f64) -> f64,
    pub k_inv: fn(f64, f64) -> f64,
}

// Identity of the function pointers.
impl PartialEq for ScalePair {
    fn eq(&self, other: &Self) -> bool {
        self.k as usize == other.k as usize && self.k_inv as usize == other.k_inv as usize
    }
}

impl Eq for ScalePair {}

impl ScaleFunction for ScalePair {
    #[inline]
    fn k(&self, q: f64, delta: f64) -> f64 {
        (self.k)(q, delta)
    }
    #[inline]
    fn k_inv(&self, k: f64, delta: f64) -> f64 {
        (self.k_inv)(k, delta)
    }
}

#[inline]
pub fn k0(q: f64, delta: f64) -> f64 {
    q * delta / 2.0
}

#[inline]
pub fn k0_inv(k: f64, delta: f64) -> f64 {
    2.0 * k / delta
}

/// `k1(q, δ) = (δ/2π)·asin(2q − 1)`.
#[inline]
pub fn k1(q: f64, delta: f64) -> f64 {
    // Rounding can push 2q-1 a hair outside [-1, 1]; asin would return NaN.
    let s = (2.0 * q - 1.0).clamp(-1.0, 1.0).asin();
    (delta / (2.0 * PI)) * s
}

/// `k1⁻¹(k, δ) = 0.5·(1 + sin(2πk/δ))`.
#[inline]
pub fn k1_inv(k: f64, delta: f64) -> f64 {
    0.5 * (1.0 + (2.0 * PI * k / delta).sin())
}

impl ScaleFamily {
    /// The family as a plain function pair.
    pub fn pair(self) -> ScalePair {
        match self {
            ScaleFamily::K0 => ScalePair { k: k0, k_inv: k0_inv },
            ScaleFamily::K1 => ScalePair { k: k1, k_inv: k1_inv },
            ScaleFamily::Custom(p) => p,
        }
    }
}

impl ScaleFunction for ScaleFamily {
    #[inline]
    fn k(&self, q: f64, delta: f64) -> f64 {
        match self {
            ScaleFamily::K0 => k0(q, delta),
            ScaleFamily::K1 => k1(q, delta),
            ScaleFamily::Custom(p) => p.k(q, delta),
        }
    }

    #[inline]
    fn k_inv(&self, k: f64, delta: f64) -> f64 {
        match self {
            ScaleFamily::K0 => k0_inv(k, delta),
            ScaleFamily::K1 => k1_inv(k, delta),
            ScaleFamily::Custom(p) => p.k_inv(k, delta),
        }
    }

    #[inline]
    fn next_ceiling(&self, q: f64, delta: f64) -> f64 {
        match self {
            // Closed form avoids a round trip through k0/k0_inv.
            ScaleFamily::K0 => q + 2.0 / delta,
            ScaleFamily::K1 => k1_inv(k1(q, delta) + 1.0, delta),
            ScaleFamily::Custom(p) => p.next_ceiling(q, delta),
        }
    }
}
