//! Mean-keyed ordered centroid stores.
//!
//! The algorithms only talk to [`OrderedStore`]; the backing structure is an
//! implementation choice. Two are provided:
//!
//! - [`BTreeStore`]: `BTreeMap<OrderedFloat<f64>, Centroid>`, O(log n) everywhere.
//!   This is the default.
//! - [`SortedVecStore`]: a maintained sorted `Vec`, O(log n) lookups and O(n)
//!   inserts. Cache-friendly and competitive for small `δ`.
//!
//! # Invariants (every store)
//! - Keys are strictly increasing: inserting a centroid whose mean equals an
//!   existing key coalesces the two (weights add, mean unchanged), so weight is
//!   never lost to a key collision.
//! - `total_weight()` equals the sum of live centroid weights and is maintained
//!   incrementally by pure addition.

use crate::tdigest::centroids::Centroid;
use crate::{TdError, TdResult};
use ordered_float::OrderedFloat;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt::Debug;
use std::iter::Peekable;
use std::ops::Bound::{Excluded, Unbounded};

/// Ordered-by-mean centroid storage backing a digest.
pub trait OrderedStore: Default + Clone + Debug {
    type Iter<'a>: Iterator<Item = &'a Centroid>
    where
        Self: 'a;

    /// Keyed insert; equal means coalesce.
    fn insert(&mut self, c: Centroid);

    /// Fold `x` into the centroid keyed at `mean` and re-key it under its new
    /// mean. Returns `false` (and changes nothing) when no centroid has that key.
    ///
    /// Total weight grows by exactly `x.weight()`.
    fn absorb(&mut self, mean: f64, x: &Centroid) -> bool;

    /// Centroid whose mean is closest to `target`. On an exact distance tie the
    /// higher mean wins.
    fn nearest(&self, target: f64) -> Option<Centroid>;

    fn min(&self) -> Option<Centroid>;
    fn max(&self) -> Option<Centroid>;

    /// Ascending, single-pass traversal.
    fn iter(&self) -> Self::Iter<'_>;

    fn total_weight(&self) -> f64;
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pick between the closest key at-or-below and the closest key above.
#[inline]
fn closer(target: f64, below: Option<Centroid>, above: Option<Centroid>) -> Option<Centroid> {
    match (below, above) {
        (Some(b), Some(a)) => {
            if a.mean() - target <= target - b.mean() {
                Some(a)
            } else {
                Some(b)
            }
        }
        (b, None) => b,
        (None, a) => a,
    }
}

/* =============================================================================
 * BTreeMap-backed store
 * ============================================================================= */

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BTreeStore {
    map: BTreeMap<OrderedFloat<f64>, Centroid>,
    total: f64,
}

impl BTreeStore {
    #[inline]
    fn put(&mut self, c: Centroid) {
        self.map
            .entry(OrderedFloat::from(c.mean()))
            .and_modify(|e| *e = Centroid::new(e.mean(), e.weight() + c.weight()))
            .or_insert(c);
    }
}

impl OrderedStore for BTreeStore {
    type Iter<'a> = btree_map::Values<'a, OrderedFloat<f64>, Centroid>;

    fn insert(&mut self, c: Centroid) {
        self.put(c);
        self.total += c.weight();
    }

    fn absorb(&mut self, mean: f64, x: &Centroid) -> bool {
        let Some(mut c) = self.map.remove(&OrderedFloat::from(mean)) else {
            return false;
        };
        c.combine_into(x);
        self.put(c);
        self.total += x.weight();
        true
    }

    fn nearest(&self, target: f64) -> Option<Centroid> {
        let key = OrderedFloat::from(target);
        let below = self.map.range(..=key).next_back().map(|(_, c)| *c);
        let above = self.map.range((Excluded(key), Unbounded)).next().map(|(_, c)| *c);
        closer(target, below, above)
    }

    #[inline]
    fn min(&self) -> Option<Centroid> {
        self.map.first_key_value().map(|(_, c)| *c)
    }
    #[inline]
    fn max(&self) -> Option<Centroid> {
        self.map.last_key_value().map(|(_, c)| *c)
    }
    #[inline]
    fn iter(&self) -> Self::Iter<'_> {
        self.map.values()
    }
    #[inline]
    fn total_weight(&self) -> f64 {
        self.total
    }
    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }
}

/* =============================================================================
 * Sorted-array store
 * ============================================================================= */

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedVecStore {
    cs: Vec<Centroid>,
    total: f64,
}

impl SortedVecStore {
    /// Index of the first centroid with mean `>= m`.
    #[inline]
    fn lower_bound(&self, m: f64) -> usize {
        self.cs.partition_point(|c| c.mean() < m)
    }

    fn put(&mut self, c: Centroid) {
        let i = self.lower_bound(c.mean());
        match self.cs.get_mut(i) {
            Some(e) if e.mean() == c.mean() => {
                *e = Centroid::new(e.mean(), e.weight() + c.weight());
            }
            _ => self.cs.insert(i, c),
        }
    }
}

impl OrderedStore for SortedVecStore {
    type Iter<'a> = std::slice::Iter<'a, Centroid>;

    fn insert(&mut self, c: Centroid) {
        self.put(c);
        self.total += c.weight();
    }

    fn absorb(&mut self, mean: f64, x: &Centroid) -> bool {
        let i = self.lower_bound(mean);
        if self.cs.get(i).map_or(true, |c| c.mean() != mean) {
            return false;
        }
        let mut c = self.cs.remove(i);
        c.combine_into(x);
        self.put(c);
        self.total += x.weight();
        true
    }

    fn nearest(&self, target: f64) -> Option<Centroid> {
        // First index strictly above target; everything before it is <= target.
        let i = self.cs.partition_point(|c| c.mean() <= target);
        let below = i.checked_sub(1).map(|j| self.cs[j]);
        let above = self.cs.get(i).copied();
        closer(target, below, above)
    }

    #[inline]
    fn min(&self) -> Option<Centroid> {
        self.cs.first().copied()
    }
    #[inline]
    fn max(&self) -> Option<Centroid> {
        self.cs.last().copied()
    }
    #[inline]
    fn iter(&self) -> Self::Iter<'_> {
        self.cs.iter()
    }
    #[inline]
    fn total_weight(&self) -> f64 {
        self.total
    }
    #[inline]
    fn len(&self) -> usize {
        self.cs.len()
    }
}

/* =============================================================================
 * Cursor
 * ============================================================================= */

/// Explicit forward-only cursor over a store.
///
/// Starts positioned *before* the first centroid. Reading before the first
/// [`Cursor::advance`] is `IteratorNotStarted`; advancing past the end (or
/// reading after that) is `IteratorExhausted`. Restart by asking the digest for
/// a fresh cursor.
pub struct Cursor<'a, S: OrderedStore + 'a> {
    iter: Peekable<S::Iter<'a>>,
    current: Option<&'a Centroid>,
    started: bool,
    exhausted: bool,
}

impl<'a, S: OrderedStore + 'a> Cursor<'a, S> {
    pub(crate) fn new(store: &'a S) -> Self {
        Self {
            iter: store.iter().peekable(),
            current: None,
            started: false,
            exhausted: false,
        }
    }

    /// Step to the next centroid and return it.
    pub fn advance(&mut self) -> TdResult<&'a Centroid> {
        if self.exhausted {
            return Err(TdError::IteratorExhausted);
        }
        self.started = true;
        match self.iter.next() {
            Some(c) => {
                self.current = Some(c);
                Ok(c)
            }
            None => {
                self.current = None;
                self.exhausted = true;
                Err(TdError::IteratorExhausted)
            }
        }
    }

    /// The centroid the cursor is positioned on.
    pub fn current(&self) -> TdResult<&'a Centroid> {
        if !self.started {
            return Err(TdError::IteratorNotStarted);
        }
        self.current.ok_or(TdError::IteratorExhausted)
    }

    /// Whether another `advance()` would succeed.
    #[inline]
    pub fn has_next(&mut self) -> bool {
        !self.exhausted && self.iter.peek().is_some()
    }
}
