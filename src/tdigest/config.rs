use serde::{Deserialize, Serialize};

use crate::tdigest::scale::{ScaleFamily, ScalePair};
use crate::{TdError, TdResult};

/// Per-point merge test used by the streaming (cluster) path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")] // "simplified" | "scale"
pub enum ClusterBound {
    /// Absorb into the nearest centroid when `(c.weight + x.weight)/S < 1/δ`.
    /// Cheap; the periodic merge pass enforces the real scale bound.
    #[default]
    Simplified,
    /// Absorb only when the candidate stays within its scale-function budget
    /// (`k(q_right) − k(q_left) ≤ 1`). O(n) per point.
    #[serde(rename = "scale")]
    ScaleFunction,
}

/// Knobs shared by merge, cluster and the digest's own streaming `add`.
///
/// Defaults: `δ = 100`, growth bound `g = 5`, scale `K1`, simplified cluster bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Compression parameter. Larger → more centroids → better fidelity.
    pub delta: f64,
    /// Streaming inserts recompress once more than `growth_bound · delta` weight
    /// has been absorbed since the last compression.
    pub growth_bound: f64,
    pub scale: ScaleFamily,
    pub cluster_bound: ClusterBound,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            delta: 100.0,
            growth_bound: 5.0,
            scale: ScaleFamily::K1,
            cluster_bound: ClusterBound::Simplified,
        }
    }
}

impl DigestConfig {
    #[inline]
    pub fn builder() -> DigestConfigBuilder {
        DigestConfigBuilder::default()
    }

    /// Reject non-finite or non-positive `delta` / `growth_bound`.
    pub fn validate(&self) -> TdResult<()> {
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(TdError::InvalidConfig { context: "delta" });
        }
        if !(self.growth_bound.is_finite() && self.growth_bound > 0.0) {
            return Err(TdError::InvalidConfig {
                context: "growth_bound",
            });
        }
        Ok(())
    }

    /// Absorbed weight above which streaming recompresses.
    #[inline]
    pub(crate) fn recompress_threshold(&self) -> f64 {
        self.growth_bound * self.delta
    }
}

/// Builder for [`DigestConfig`]; `build()` validates.
#[derive(Debug, Clone, Default)]
pub struct DigestConfigBuilder {
    cfg: DigestConfig,
}

impl DigestConfigBuilder {
    /// Set the compression parameter `δ`.
    #[inline]
    pub fn delta(mut self, delta: f64) -> Self {
        self.cfg.delta = delta;
        self
    }

    #[inline]
    pub fn growth_bound(mut self, g: f64) -> Self {
        self.cfg.growth_bound = g;
        self
    }

    /// Choose the scale family used by the merge pass.
    #[inline]
    pub fn scale(mut self, s: ScaleFamily) -> Self {
        self.cfg.scale = s;
        self
    }

    /// Use caller-supplied scale functions for both merge and cluster.
    #[inline]
    pub fn scale_fn(mut self, k: fn(f64, f64) -> f64, k_inv: fn(f64, f64) -> f64) -> Self {
        self.cfg.scale = ScaleFamily::Custom(ScalePair { k, k_inv });
        self
    }

    #[inline]
    pub fn cluster_bound(mut self, b: ClusterBound) -> Self {
        self.cfg.cluster_bound = b;
        self
    }

    pub fn build(self) -> TdResult<DigestConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = DigestConfig::default();
        assert_eq!(c.delta, 100.0);
        assert_eq!(c.growth_bound, 5.0);
        assert_eq!(c.scale, ScaleFamily::K1);
        assert_eq!(c.cluster_bound, ClusterBound::Simplified);
        assert_eq!(c.recompress_threshold(), 500.0);
    }

    #[test]
    fn builder_validates() {
        assert!(DigestConfig::builder().delta(500.0).build().is_ok());
        assert_eq!(
            DigestConfig::builder().delta(0.0).build(),
            Err(TdError::InvalidConfig { context: "delta" })
        );
        assert_eq!(
            DigestConfig::builder().delta(f64::NAN).build(),
            Err(TdError::InvalidConfig { context: "delta" })
        );
        assert_eq!(
            DigestConfig::builder().growth_bound(-1.0).build(),
            Err(TdError::InvalidConfig {
                context: "growth_bound"
            })
        );
    }

    #[test]
    fn loads_partial_config_from_json() {
        let c: DigestConfig =
            serde_json::from_str(r#"{"delta": 500, "scale": "k0", "cluster_bound": "scale"}"#)
                .unwrap();
        assert_eq!(c.delta, 500.0);
        assert_eq!(c.growth_bound, 5.0);
        assert_eq!(c.scale, ScaleFamily::K0);
        assert_eq!(c.cluster_bound, ClusterBound::ScaleFunction);
        assert!(c.validate().is_ok());
    }
}
