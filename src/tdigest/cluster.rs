//! Streaming (incremental) clustering.
//!
//! Each point goes to its nearest centroid when a cheap weight test allows it,
//! or becomes a new centroid otherwise. Once more than `g·δ` weight has been
//! absorbed since the last compression, a full merge pass runs inline. A
//! final merge pass always runs at the end of [`cluster_with`], so the
//! returned digest is compressed.
//!
//! Absorbing into a centroid moves its mean; the store removes and re-keys it,
//! so mean ordering holds after every point, not just after the final merge.

use crate::tdigest::centroids::Centroid;
use crate::tdigest::compressor::compress_into;
use crate::tdigest::config::{ClusterBound, DigestConfig};
use crate::tdigest::search::find_merge_candidate;
use crate::tdigest::store::OrderedStore;
use crate::tdigest::tdigest::{ensure_finite, ensure_weight, TDigest};
use crate::TdResult;

/// Stream `new_points` into a copy of `existing` (or a fresh digest), then
/// compress. `existing` is never modified, so on error the caller still holds
/// it intact.
///
/// Errors with `EmptyInput` when there is nothing to compress at the end.
pub fn cluster_with<S: OrderedStore>(
    new_points: &[f64],
    existing: Option<&TDigest<S>>,
    config: &DigestConfig,
) -> TdResult<TDigest<S>> {
    config.validate()?;
    let mut td = match existing {
        Some(d) => d.clone(),
        None => TDigest::with_config(*config),
    };
    td.set_config(*config);

    for &x in new_points {
        td.stream(Centroid::point(x))?;
    }

    let store = compress_into(td.store(), config.delta, &config.scale)?;
    Ok(TDigest::from_store(store, *config))
}

/// [`cluster_with`] under the default configuration (`δ = 100`, `g = 5`, `K1`).
pub fn cluster(new_points: &[f64], existing: Option<&TDigest>) -> TdResult<TDigest> {
    cluster_with(new_points, existing, &DigestConfig::default())
}

impl<S: OrderedStore> TDigest<S> {
    /// Stream one unit-weight point. Recompresses when the growth bound is hit,
    /// but does not force a final merge; call [`TDigest::compress`] for that.
    #[inline]
    pub fn add(&mut self, x: f64) -> TdResult<()> {
        self.stream(Centroid::point(x))
    }

    /// Stream one weighted point.
    pub fn add_weighted(&mut self, x: f64, weight: f64) -> TdResult<()> {
        ensure_weight(weight)?;
        ensure_finite(x, "sample value")?;
        self.stream(Centroid::new(x, weight))
    }

    /// Stream a batch of unit-weight points. Stops at the first invalid value;
    /// points before it stay in the digest.
    pub fn add_many(&mut self, xs: &[f64]) -> TdResult<()> {
        for &x in xs {
            self.add(x)?;
        }
        Ok(())
    }

    /// This digest plus `new_points`, streamed and compressed under its own configuration.
    pub fn clustered(&self, new_points: &[f64]) -> TdResult<TDigest<S>> {
        let cfg = *self.config();
        cluster_with(new_points, Some(self), &cfg)
    }

    fn stream(&mut self, x: Centroid) -> TdResult<()> {
        ensure_finite(x.mean(), "sample value")?;
        let cfg = *self.config();
        let total = self.total_weight();

        let target = match cfg.cluster_bound {
            ClusterBound::Simplified => self
                .nearest(x.mean())
                .filter(|c| (c.weight() + x.weight()) / total < 1.0 / cfg.delta),
            ClusterBound::ScaleFunction => find_merge_candidate(
                &x,
                self.iter(),
                total + x.weight(),
                &cfg.scale,
                cfg.delta,
            ),
        };

        let absorbed = match target {
            Some(c) => self.store_mut().absorb(c.mean(), &x),
            None => false,
        };
        if !absorbed {
            self.store_mut().insert(x);
        }
        self.note_uncompressed(x.weight());

        if self.uncompressed() > cfg.recompress_threshold() {
            ttrace!(
                "cluster) growth bound hit: absorbed={}, limit={}, n={}",
                self.uncompressed(),
                cfg.recompress_threshold(),
                self.len()
            );
            self.compress()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tdigest::compressor::merge;
    use crate::tdigest::store::{BTreeStore, SortedVecStore};
    use crate::tdigest::test_helpers::*;
    use crate::TdError;

    fn seeded(cs: &[(f64, f64)], delta: f64) -> TDigest {
        TDigest::builder()
            .delta(delta)
            .with_centroids(cs.iter().map(|&(m, w)| Centroid::new(m, w)).collect())
            .build()
            .unwrap()
    }

    #[test]
    fn empty_everything_is_an_error() {
        assert_eq!(cluster(&[], None), Err(TdError::EmptyInput));
    }

    #[test]
    fn cluster_from_nothing_builds_a_digest() {
        let xs: Vec<f64> = (0..2_000).map(|i| (i % 97) as f64).collect();
        let td = cluster(&xs, None).unwrap();
        assert_eq!(td.total_weight(), 2_000.0);
        assert_strictly_ascending("cluster output", &td.centroids());
        assert_eq!(td.min().unwrap().mean(), 0.0);
        assert_eq!(td.max().unwrap().mean(), 96.0);
    }

    #[test]
    fn simplified_bound_absorbs_light_neighbours() {
        // (10 + 1) / 20 < 1/δ only for small δ.
        let mut loose = seeded(&[(0.0, 10.0), (10.0, 10.0)], 1.0);
        loose.add(9.0).unwrap();
        assert_eq!(loose.len(), 2);
        assert_eq!(loose.total_weight(), 21.0);
        assert_eq!(loose.max().unwrap().weight(), 11.0);

        let mut tight = seeded(&[(0.0, 10.0), (10.0, 10.0)], 10.0);
        tight.add(9.0).unwrap();
        assert_eq!(tight.len(), 3);
        assert_eq!(tight.total_weight(), 21.0);
    }

    #[test]
    fn absorbed_centroid_is_rekeyed() {
        let mut td = seeded(&[(0.0, 3.0), (10.0, 1.0), (20.0, 3.0)], 1.0);
        // Nearest to 14 is 10; (1+1)/7 < 1 → absorb, mean moves to 12.
        td.add(14.0).unwrap();
        let means: Vec<f64> = td.iter().map(Centroid::mean).collect();
        assert_eq!(means, vec![0.0, 12.0, 20.0]);
        assert!(td.nearest(12.0).is_some_and(|c| c.weight() == 2.0));
    }

    #[test]
    fn growth_bound_triggers_recompression() {
        let cfg = DigestConfig::builder()
            .delta(10.0)
            .growth_bound(2.0)
            .build()
            .unwrap();
        let mut td: TDigest = TDigest::with_config(cfg);
        for i in 0..20 {
            td.add(i as f64).unwrap();
        }
        // 21st point pushes absorbed weight past g·δ = 20 and compresses.
        assert_eq!(td.len(), 20);
        td.add(20.0).unwrap();
        assert!(td.len() < 21);
        assert_eq!(td.total_weight(), 21.0);
    }

    #[test]
    fn cluster_conserves_weight_and_order_for_both_bounds() {
        let base: Vec<f64> = (0..3_000).map(|i| ((i * 13) % 3_000) as f64 / 600.0).collect();
        let more: Vec<f64> = (0..1_234).map(|i| ((i * 17) % 1_234) as f64 / 246.8).collect();
        for bound in [ClusterBound::Simplified, ClusterBound::ScaleFunction] {
            let cfg = DigestConfig::builder().cluster_bound(bound).build().unwrap();
            let d0 = merge(&base, None).unwrap();
            let d1 = cluster_with(&more, Some(&d0), &cfg).unwrap();
            assert_eq!(d1.total_weight(), 4_234.0, "bound={bound:?}");
            assert_strictly_ascending("cluster output", &d1.centroids());
            assert_abs_close("median", 2.5, d1.estimate_quantile(0.5).unwrap(), 0.1);
        }
    }

    #[test]
    fn streaming_keeps_order_after_every_point() {
        let mut td: TDigest<SortedVecStore> = TDigest::default();
        for i in 0..1_500 {
            let x = ((i * 7) % 101) as f64 + (i as f64) * 1e-3;
            td.add(x).unwrap();
            if i % 50 == 0 {
                assert_strictly_ascending("mid-stream", &td.centroids());
                let w: f64 = td.iter().map(Centroid::weight).sum();
                assert_eq!(w, td.total_weight());
            }
        }
        assert_eq!(td.total_weight(), 1_500.0);
    }

    #[test]
    fn stores_agree_under_streaming() {
        let xs: Vec<f64> = (0..2_500).map(|i| ((i * 101) % 2_500) as f64).collect();
        let cfg = DigestConfig::default();
        let a: TDigest<BTreeStore> = cluster_with(&xs, None, &cfg).unwrap();
        let b: TDigest<SortedVecStore> = cluster_with(&xs, None, &cfg).unwrap();
        assert_eq!(a.centroids(), b.centroids());
    }

    #[test]
    fn add_weighted_validates() {
        let mut td = TDigest::empty();
        assert!(matches!(
            td.add_weighted(1.0, -2.0),
            Err(TdError::InvalidArgument { .. })
        ));
        assert!(matches!(
            td.add(f64::INFINITY),
            Err(TdError::NonFiniteInput { .. })
        ));
        td.add_weighted(1.0, 2.5).unwrap();
        assert_eq!(td.total_weight(), 2.5);
    }

    #[test]
    fn failed_cluster_leaves_existing_digest_intact() {
        let d = merge(&[1.0, 2.0, 3.0, 4.0], None).unwrap();
        let snapshot = d.clone();
        assert_eq!(
            cluster(&[1.5, 2.5, f64::NAN], Some(&d)),
            Err(TdError::NonFiniteInput {
                context: "sample value"
            })
        );
        assert_eq!(d, snapshot);

        let grown = cluster(&[5.0], Some(&d)).unwrap();
        assert_eq!(grown.total_weight(), 5.0);
        assert_eq!(d.total_weight(), 4.0);
    }

    #[test]
    fn injected_scale_functions_drive_streaming() {
        use crate::tdigest::scale::{k0, k0_inv, ScaleFamily};
        let xs: Vec<f64> = (0..3_000).map(|i| ((i * 37) % 3_000) as f64).collect();
        for bound in [ClusterBound::Simplified, ClusterBound::ScaleFunction] {
            let via_fns = DigestConfig::builder()
                .scale_fn(k0, k0_inv)
                .cluster_bound(bound)
                .build()
                .unwrap();
            let via_family = DigestConfig::builder()
                .scale(ScaleFamily::K0)
                .cluster_bound(bound)
                .build()
                .unwrap();
            let a: TDigest = cluster_with(&xs, None, &via_fns).unwrap();
            let b: TDigest = cluster_with(&xs, None, &via_family).unwrap();
            assert_eq!(a.total_weight(), 3_000.0, "bound={bound:?}");
            assert_strictly_ascending("custom scale", &a.centroids());
            // K0 buckets never exceed 2/δ of the mass (plus rounding).
            assert!(a.iter().all(|c| c.weight() <= 60.0 + 1e-9), "bound={bound:?}");
            assert!(b.iter().all(|c| c.weight() <= 60.0 + 1e-9), "bound={bound:?}");
        }
    }

    #[test]
    fn clustered_uses_own_config() {
        let cfg = DigestConfig::builder().delta(500.0).build().unwrap();
        let td: TDigest = TDigest::from_values(&[1.0, 2.0, 3.0], &cfg).unwrap();
        let td = td.clustered(&[4.0, 5.0]).unwrap();
        assert_eq!(td.delta(), 500.0);
        assert_eq!(td.total_weight(), 5.0);
    }
}
