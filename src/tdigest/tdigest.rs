// src/tdigest/tdigest.rs
use crate::tdigest::centroids::Centroid;
use crate::tdigest::config::DigestConfig;
use crate::tdigest::store::{BTreeStore, Cursor, OrderedStore};
use crate::{TdError, TdResult};

/// An ordered, size-bounded collection of centroids approximating a distribution.
///
/// Generic over the backing [`OrderedStore`]; the default is [`BTreeStore`].
///
/// - Centroids are strictly ordered by mean between observable operations.
/// - `total_weight()` is the running sum of live centroid weights.
/// - Compression never edits a centroid other holders can see: [`crate::merge`]
///   builds a fresh digest, and streaming [`TDigest::add`] re-keys centroids it
///   combines into.
#[derive(Debug, Clone, PartialEq)]
pub struct TDigest<S: OrderedStore = BTreeStore> {
    store: S,
    config: DigestConfig,
    /// Weight streamed in since the last compression pass.
    uncompressed: f64,
}

impl<S: OrderedStore> Default for TDigest<S> {
    fn default() -> Self {
        Self::with_config(DigestConfig::default())
    }
}

#[inline]
pub(crate) fn ensure_finite(v: f64, context: &'static str) -> TdResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(TdError::NonFiniteInput { context })
    }
}

#[inline]
pub(crate) fn ensure_weight(w: f64) -> TdResult<()> {
    ensure_finite(w, "sample weight")?;
    if w > 0.0 {
        Ok(())
    } else {
        Err(TdError::InvalidArgument {
            context: "sample weight must be > 0",
        })
    }
}

/* =============================================================================
 * Builder
 * ============================================================================= */

/// Builder for [`TDigest`].
///
/// Use the builder when you want to:
/// - construct an empty digest with a chosen configuration, or
/// - seed a digest with *existing centroids* (e.g. restored from elsewhere).
#[derive(Debug, Clone, Default)]
pub struct TDigestBuilder {
    config: DigestConfig,
    init_centroids: Option<Vec<Centroid>>,
}

impl TDigestBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[inline]
    pub fn config(mut self, config: DigestConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the compression parameter `δ`.
    #[inline]
    pub fn delta(mut self, delta: f64) -> Self {
        self.config.delta = delta;
        self
    }

    #[inline]
    pub fn scale(mut self, s: crate::tdigest::ScaleFamily) -> Self {
        self.config.scale = s;
        self
    }

    /// Seed with centroids (any order; equal means coalesce).
    pub fn with_centroids(mut self, centroids: Vec<Centroid>) -> Self {
        self.init_centroids = Some(centroids);
        self
    }

    /// Validate the configuration and seeds, then build.
    pub fn build<S: OrderedStore>(self) -> TdResult<TDigest<S>> {
        self.config.validate()?;
        let mut td = TDigest::<S>::with_config(self.config);
        for c in self.init_centroids.unwrap_or_default() {
            ensure_finite(c.mean(), "centroid mean")?;
            ensure_weight(c.weight())?;
            td.store.insert(c);
        }
        Ok(td)
    }
}

/* =============================================================================
 * Digest
 * ============================================================================= */

impl TDigest {
    /// An empty digest with the default store and configuration.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Entry point for fluent construction.
    #[inline]
    pub fn builder() -> TDigestBuilder {
        TDigestBuilder::default()
    }
}

impl<S: OrderedStore> TDigest<S> {
    /// An empty digest carrying an already-validated `config`. Public callers go
    /// through [`TDigestBuilder`].
    #[inline]
    pub(crate) fn with_config(config: DigestConfig) -> Self {
        Self {
            store: S::default(),
            config,
            uncompressed: 0.0,
        }
    }

    pub(crate) fn from_store(store: S, config: DigestConfig) -> Self {
        Self {
            store,
            config,
            uncompressed: 0.0,
        }
    }

    /// Insert one weighted point as its own centroid. No compression happens.
    pub fn insert(&mut self, point: f64, weight: f64) -> TdResult<()> {
        ensure_finite(point, "sample value")?;
        ensure_weight(weight)?;
        self.store.insert(Centroid::new(point, weight));
        Ok(())
    }

    /// Insert a unit-weight point. Same as `insert(point, 1.0)`.
    #[inline]
    pub fn insert_point(&mut self, point: f64) -> TdResult<()> {
        self.insert(point, 1.0)
    }

    /// Σ weights of live centroids.
    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.store.total_weight()
    }

    /// Centroid with the smallest mean.
    pub fn min(&self) -> TdResult<Centroid> {
        self.store
            .min()
            .ok_or(TdError::EmptyDigest { context: "min" })
    }

    /// Centroid with the largest mean.
    pub fn max(&self) -> TdResult<Centroid> {
        self.store
            .max()
            .ok_or(TdError::EmptyDigest { context: "max" })
    }

    /// Centroid whose mean is closest to `target` (higher mean on a tie).
    #[inline]
    pub fn nearest(&self, target: f64) -> Option<Centroid> {
        self.store.nearest(target)
    }

    /// Ascending iteration over centroids.
    #[inline]
    pub fn iter(&self) -> S::Iter<'_> {
        self.store.iter()
    }

    /// Explicit single-pass cursor (see [`Cursor`]).
    #[inline]
    pub fn cursor(&self) -> Cursor<'_, S> {
        Cursor::new(&self.store)
    }

    /// Ascending snapshot of the centroids.
    pub fn centroids(&self) -> Vec<Centroid> {
        self.store.iter().copied().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[inline]
    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    #[inline]
    pub fn delta(&self) -> f64 {
        self.config.delta
    }

    #[inline]
    pub(crate) fn set_config(&mut self, config: DigestConfig) {
        self.config = config;
    }

    #[inline]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[inline]
    pub(crate) fn uncompressed(&self) -> f64 {
        self.uncompressed
    }

    #[inline]
    pub(crate) fn note_uncompressed(&mut self, w: f64) {
        self.uncompressed += w;
    }
}
