//! Bounded-memory approximate quantiles over weighted real-valued streams.
//!
//! A [`TDigest`] keeps an ordered-by-mean set of centroids whose sizes are
//! bounded by a scale function: tight near the tails, loose in the middle.
//! Digests are built by a bulk [`merge`] pass, by streaming [`cluster`]
//! insertion with periodic recompression, and queried with
//! [`estimate_quantile`].
//!
//! ```
//! use tree_tdigest::{cluster, estimate_quantile, merge};
//!
//! let xs: Vec<f64> = (0..10_000).map(|i| i as f64 / 2_000.0).collect();
//! let digest = merge(&xs, None)?;
//! assert_eq!(digest.total_weight(), 10_000.0);
//!
//! let more: Vec<f64> = (0..5_000).map(|i| i as f64 / 1_000.0).collect();
//! let digest = cluster(&more, Some(&digest))?;
//! let median = estimate_quantile(&digest, 0.5)?;
//! assert!((median - 2.5).abs() < 0.05);
//! # Ok::<(), tree_tdigest::TdError>(())
//! ```

mod error;
pub mod tdigest;

pub use error::{TdError, TdResult};
pub use tdigest::{
    cluster, cluster_with, estimate_quantile, merge, merge_digests, merge_with, Centroid,
    ClusterBound, DigestConfig, ScaleFamily, TDigest,
};
