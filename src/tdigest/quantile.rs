//! Quantile evaluation for `TDigest`.
//!
//! Uses **half-weight intervals**: every interval between adjacent centroids
//! carries half the combined weight of its two bounding centroids, except that
//! the first and last centroids put their *whole* weight into the one interval
//! that touches them.
//!
//! - **Index mapping**: `q ∈ [0,1]` maps to the target cumulative weight `S·q`.
//! - **Walk**: for adjacent pairs `(left, right)` keep `below_left` /
//!   `below_right = below_left + ½(left.w + right.w)` (the first pair starts
//!   at `0` / `left.w + ½·right.w`). When the target falls in
//!   `[below_left, below_right)`, interpolate the mean linearly.
//! - **Last interval**: if the walk runs out, interpolate up to `S`.
//!
//! # Guarantees
//! - `quantile(0) == min().mean()`, `quantile(1) == max().mean()`.
//! - Monotone (non-decreasing) in `q`.
//! - Never NaN/±inf for a valid digest: a zero-width interval returns its
//!   left mean instead of dividing by zero.
//!
//! # Errors
//! - `q` outside `[0, 1]` or NaN → `InvalidArgument`.
//! - Empty digest → `EmptyDigest`.

use crate::tdigest::store::OrderedStore;
use crate::tdigest::TDigest;
use crate::{TdError, TdResult};

/// Linear interpolation of the mean at weight `target` within
/// `[w_left, w_right]`.
#[inline]
fn interpolate(target: f64, w_left: f64, w_right: f64, m_left: f64, m_right: f64) -> f64 {
    let span = w_right - w_left;
    if span <= 0.0 {
        return m_left;
    }
    let t = ((target - w_left) / span).clamp(0.0, 1.0);
    m_left + (m_right - m_left) * t
}

#[inline]
fn check_q(q: f64) -> TdResult<()> {
    if (0.0..=1.0).contains(&q) {
        Ok(())
    } else {
        Err(TdError::InvalidArgument {
            context: "quantile q must lie in [0, 1]",
        })
    }
}

/// Estimate the value at quantile `q` of `digest`.
pub fn estimate_quantile<S: OrderedStore>(digest: &TDigest<S>, q: f64) -> TdResult<f64> {
    digest.estimate_quantile(q)
}

impl<S: OrderedStore> TDigest<S> {
    /// Estimate the value below which a fraction `q` of the total weight falls.
    pub fn estimate_quantile(&self, q: f64) -> TdResult<f64> {
        check_q(q)?;
        if self.is_empty() {
            return Err(TdError::EmptyDigest {
                context: "quantile",
            });
        }
        if q == 0.0 {
            return Ok(self.min()?.mean());
        }
        if q == 1.0 {
            return Ok(self.max()?.mean());
        }
        if self.len() == 1 {
            return Ok(self.min()?.mean());
        }

        let total = self.total_weight();
        let target = total * q;

        let mut cur = self.cursor();
        let mut left = *cur.advance()?;
        let mut right = *cur.advance()?;
        let mut below_left = 0.0_f64;
        let mut below_right = left.weight() + 0.5 * right.weight();

        while cur.has_next() {
            if target < below_right {
                return Ok(interpolate(
                    target,
                    below_left,
                    below_right,
                    left.mean(),
                    right.mean(),
                ));
            }
            left = right;
            right = *cur.advance()?;
            below_left = below_right;
            below_right += 0.5 * (left.weight() + right.weight());
        }

        // Final interval runs to the true total.
        Ok(interpolate(
            target,
            below_left,
            total,
            left.mean(),
            right.mean(),
        ))
    }

    /// `estimate_quantile(0.5)`.
    #[inline]
    pub fn median(&self) -> TdResult<f64> {
        self.estimate_quantile(0.5)
    }

    /// Batch form of [`TDigest::estimate_quantile`]; fails on the first bad `q`.
    pub fn quantiles(&self, qs: &[f64]) -> TdResult<Vec<f64>> {
        qs.iter().map(|&q| self.estimate_quantile(q)).collect()
    }
}
