//! Bulk compression (merge pass).
//!
//! One ascending pass over a working store, folding neighbours into a running
//! accumulator `σ` until the scale function's ceiling would be crossed:
//!
//! ```text
//! q0 = 0, q_lim = next_ceiling(q0)
//! for next in ascending(working)[1..]:
//!     q = q0 + (σ.w + next.w) / S
//!     if q ≤ q_lim: σ ← σ + next
//!     else: emit σ; q0 += σ.w / S; q_lim = next_ceiling(q0); σ ← next
//! emit σ
//! ```
//!
//! Weights are only ever added, so the output's total weight is the sum of the
//! input weights. The input order is ascending mean, so the result does not
//! depend on the order raw points arrived in.

use crate::tdigest::centroids::Centroid;
use crate::tdigest::config::DigestConfig;
use crate::tdigest::scale::ScaleFunction;
use crate::tdigest::store::OrderedStore;
use crate::tdigest::tdigest::{ensure_finite, TDigest};
use crate::{TdError, TdResult};

/// Compress `working` into a fresh store of the same kind.
///
/// Errors with `EmptyInput` when `working` carries no weight.
pub(crate) fn compress_into<S, K>(working: &S, delta: f64, scale: &K) -> TdResult<S>
where
    S: OrderedStore,
    K: ScaleFunction + ?Sized,
{
    let total = working.total_weight();
    if working.is_empty() || total <= 0.0 {
        return Err(TdError::EmptyInput);
    }

    let mut out = S::default();
    let mut items = working.iter();
    let mut sigma: Centroid = match items.next() {
        Some(c) => *c,
        None => return Err(TdError::EmptyInput),
    };
    let mut q0 = 0.0_f64;
    let mut q_lim = scale.next_ceiling(q0, delta);

    for next in items {
        let q = q0 + (sigma.weight() + next.weight()) / total;
        if q <= q_lim {
            sigma.combine_into(next);
        } else {
            out.insert(sigma);
            q0 += sigma.weight() / total;
            q_lim = scale.next_ceiling(q0, delta);
            sigma = *next;
        }
    }
    out.insert(sigma);

    ttrace!(
        "merge) delta={}, n_in={}, n_out={}, w_in={}, w_out={}",
        delta,
        working.len(),
        out.len(),
        total,
        out.total_weight()
    );
    debug_assert!(
        (out.total_weight() - total).abs() <= 1e-9 * total,
        "total weight changed"
    );
    Ok(out)
}

/// Merge unit-weight `new_points` with an optional existing digest into a new,
/// compressed digest. The existing digest is not modified.
pub fn merge_with<S: OrderedStore>(
    new_points: &[f64],
    existing: Option<&TDigest<S>>,
    config: &DigestConfig,
) -> TdResult<TDigest<S>> {
    config.validate()?;
    let mut working: S = existing.map(|d| d.store().clone()).unwrap_or_default();
    for &x in new_points {
        ensure_finite(x, "sample value")?;
        working.insert(Centroid::point(x));
    }
    let store = compress_into(&working, config.delta, &config.scale)?;
    Ok(TDigest::from_store(store, *config))
}

/// [`merge_with`] under the default configuration (`δ = 100`, `K1`).
pub fn merge(new_points: &[f64], existing: Option<&TDigest>) -> TdResult<TDigest> {
    merge_with(new_points, existing, &DigestConfig::default())
}

/// Combine several digests' centroids and compress them in one pass.
pub fn merge_digests<S: OrderedStore>(
    digests: &[TDigest<S>],
    config: &DigestConfig,
) -> TdResult<TDigest<S>> {
    config.validate()?;
    let mut working = S::default();
    for d in digests {
        for c in d.iter() {
            working.insert(*c);
        }
    }
    let store = compress_into(&working, config.delta, &config.scale)?;
    Ok(TDigest::from_store(store, *config))
}

impl<S: OrderedStore> TDigest<S> {
    /// Build a compressed digest from raw values.
    pub fn from_values(values: &[f64], config: &DigestConfig) -> TdResult<TDigest<S>> {
        merge_with(values, None, config)
    }

    /// A new digest holding `self` plus `new_points`, compressed under this
    /// digest's configuration.
    pub fn merged(&self, new_points: &[f64]) -> TdResult<TDigest<S>> {
        let cfg = *self.config();
        merge_with(new_points, Some(self), &cfg)
    }

    /// Recompress in place. A no-op on an empty digest.
    pub fn compress(&mut self) -> TdResult<()> {
        if self.is_empty() {
            return Ok(());
        }
        let cfg = *self.config();
        let store = compress_into(self.store(), cfg.delta, &cfg.scale)?;
        *self = TDigest::from_store(store, cfg);
        Ok(())
    }
}
