// Opt-in tracing (cheap unless env var set). Defined before the submodules so
// they can all use it.
macro_rules! ttrace {
    ($($arg:tt)*) => {
        if std::env::var_os("TDIGEST_TRACE").is_some() {
            eprintln!($($arg)*);
        }
    }
}

pub mod centroids;
pub mod config;
pub mod quantile;
pub mod scale;
pub mod search;
pub mod store;
#[doc(hidden)]
pub mod test_helpers;

// Internal building blocks
mod cluster;
mod compressor;
mod tdigest;

// Public surface
pub use centroids::Centroid;
pub use cluster::{cluster, cluster_with};
pub use compressor::{merge, merge_digests, merge_with};
pub use config::{ClusterBound, DigestConfig, DigestConfigBuilder};
pub use quantile::estimate_quantile;
pub use scale::{ScaleFamily, ScaleFunction, ScalePair};
pub use search::{find_closest, find_merge_candidate, Closest};
pub use store::{BTreeStore, Cursor, OrderedStore, SortedVecStore};
pub use tdigest::{TDigest, TDigestBuilder};
