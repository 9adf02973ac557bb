use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Add;

/// A centroid summarizes one or more merged samples as a `(mean, weight)` pair.
///
/// Callers guarantee `weight > 0`; the digest validates user input before a
/// centroid is ever built from it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Centroid {
    mean: OrderedFloat<f64>,
    weight: OrderedFloat<f64>,
}

impl PartialOrd for Centroid {
    fn partial_cmp(&self, other: &Centroid) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Centroid {
    fn cmp(&self, other: &Centroid) -> Ordering {
        // Stores never hold two centroids with the same mean.
        self.mean.cmp(&other.mean)
    }
}

impl Centroid {
    #[inline]
    pub fn new(mean: f64, weight: f64) -> Self {
        debug_assert!(weight > 0.0);
        Centroid {
            mean: OrderedFloat::from(mean),
            weight: OrderedFloat::from(weight),
        }
    }

    /// A raw sample of unit weight.
    #[inline]
    pub fn point(x: f64) -> Self {
        Self::new(x, 1.0)
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean.into_inner()
    }
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight.into_inner()
    }

    /// Weighted combination of two centroids.
    ///
    /// `weight = a.weight + b.weight`,
    /// `mean = (a.weight·a.mean + b.weight·b.mean) / weight`.
    #[inline]
    pub fn combine(a: &Centroid, b: &Centroid) -> Centroid {
        let (wa, wb) = (a.weight(), b.weight());
        let w = wa + wb;
        let mean = (wa * a.mean() + wb * b.mean()) / w;
        Centroid::new(mean, w)
    }

    /// Fold `other` into `self` with the same formula as [`Centroid::combine`].
    ///
    /// The receiver's mean moves: anything keyed by the old mean must be re-keyed.
    #[inline]
    pub fn combine_into(&mut self, other: &Centroid) {
        *self = Centroid::combine(self, other);
    }
}

impl Add for Centroid {
    type Output = Centroid;

    #[inline]
    fn add(self, rhs: Centroid) -> Centroid {
        Centroid::combine(&self, &rhs)
    }
}

/* ===========================
 * Helpers used by the stores and tests
 * =========================== */

/// Strictly increasing by mean.
#[inline]
pub fn is_sorted_strict_by_mean(cs: &[Centroid]) -> bool {
    cs.windows(2).all(|w| w[0].mean() < w[1].mean())
}

/// Sum of weights in slice order.
#[inline]
pub fn total_weight(cs: &[Centroid]) -> f64 {
    cs.iter().map(Centroid::weight).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_weights_means_by_weight() {
        let a = Centroid::new(1.0, 1.0);
        let b = Centroid::new(4.0, 2.0);
        let c = Centroid::combine(&a, &b);
        assert_eq!(c.weight(), 3.0);
        assert_eq!(c.mean(), 3.0);
    }

    #[test]
    fn combine_into_matches_combine_and_add() {
        let a = Centroid::new(-2.5, 3.0);
        let b = Centroid::new(7.0, 5.0);
        let mut m = a;
        m.combine_into(&b);
        assert_eq!(m, Centroid::combine(&a, &b));
        assert_eq!(m, a + b);
    }

    #[test]
    fn combine_is_commutative_up_to_rounding() {
        let a = Centroid::new(0.1, 3.0);
        let b = Centroid::new(0.7, 11.0);
        let ab = a + b;
        let ba = b + a;
        assert_eq!(ab.weight(), ba.weight());
        assert!((ab.mean() - ba.mean()).abs() <= 1e-15);
    }

    #[test]
    fn ordering_is_by_mean_only() {
        let light = Centroid::new(1.0, 1.0);
        let heavy = Centroid::new(2.0, 100.0);
        assert!(light < heavy);
        assert!(is_sorted_strict_by_mean(&[light, heavy]));
        assert!(!is_sorted_strict_by_mean(&[heavy, light]));
        assert_eq!(total_weight(&[light, heavy]), 101.0);
    }
}
