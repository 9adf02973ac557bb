//! Nearest-centroid search over an ascending centroid sequence.
//!
//! Both searches scan forward while the distance to `x` keeps shrinking (or
//! stays equal) and stop at the first centroid that is farther away, so they
//! touch only the prefix up to the answer. On an exact distance tie the scan
//! lands on the *later* (higher-mean) centroid; the earlier one is reported
//! alongside it so the caller can resolve the tie.

use crate::tdigest::centroids::Centroid;
use crate::tdigest::scale::ScaleFunction;

/// Result of [`find_closest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Closest {
    One(Centroid),
    /// Two centroids equidistant from the query, in ascending order.
    Tie(Centroid, Centroid),
}

impl Closest {
    /// The forward-scan default: the higher-mean centroid on a tie.
    #[inline]
    pub fn primary(&self) -> Centroid {
        match *self {
            Closest::One(c) | Closest::Tie(_, c) => c,
        }
    }
}

/// One scan step's bookkeeping: a centroid and the weight strictly to its left.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    c: Centroid,
    w_left: f64,
}

/// Scan `ordered` for the closest mean to `x`.
///
/// Returns `(best, previous, distance)` where `previous` is the centroid just
/// before `best` in the scan.
fn scan<'a, I>(x: f64, ordered: I) -> Option<(Candidate, Option<Candidate>, f64)>
where
    I: IntoIterator<Item = &'a Centroid>,
{
    let mut min_dist = f64::INFINITY;
    let mut best: Option<Candidate> = None;
    let mut prev: Option<Candidate> = None;
    let mut w_before = 0.0_f64;

    for c in ordered {
        let dist = (c.mean() - x).abs();
        if dist <= min_dist {
            prev = best;
            best = Some(Candidate { c: *c, w_left: w_before });
            min_dist = dist;
            w_before += c.weight();
        } else {
            break;
        }
    }
    best.map(|b| (b, prev, min_dist))
}

/// Closest centroid(s) to `x` by mean. `None` only for an empty sequence.
pub fn find_closest<'a, I>(x: &Centroid, ordered: I) -> Option<Closest>
where
    I: IntoIterator<Item = &'a Centroid>,
{
    let (best, prev, min_dist) = scan(x.mean(), ordered)?;
    Some(match prev {
        Some(p) if (p.c.mean() - x.mean()).abs() == min_dist => Closest::Tie(p.c, best.c),
        _ => Closest::One(best.c),
    })
}

/// Closest centroid that can absorb `x` without exceeding its scale budget.
///
/// For a candidate with `W_left` weight to its left:
/// `q_left = W_left/S`, `q_right = q_left + (c.weight + x.weight)/S`, and the
/// merge is allowed when `k(q_right) − k(q_left) ≤ 1`.
///
/// `total_weight` (`S`) should already include `x`. On a distance tie the
/// heavier centroid wins only if both fit; otherwise whichever one fits is
/// returned, preferring the forward-scan default. `None` means `x` must be
/// inserted as a new centroid.
pub fn find_merge_candidate<'a, I, K>(
    x: &Centroid,
    ordered: I,
    total_weight: f64,
    scale: &K,
    delta: f64,
) -> Option<Centroid>
where
    I: IntoIterator<Item = &'a Centroid>,
    K: ScaleFunction + ?Sized,
{
    if total_weight <= 0.0 {
        return None;
    }
    let (best, prev, min_dist) = scan(x.mean(), ordered)?;

    let fits = |cand: &Candidate| -> bool {
        let q_left = cand.w_left / total_weight;
        let q_right = q_left + (cand.c.weight() + x.weight()) / total_weight;
        scale.k(q_right, delta) - scale.k(q_left, delta) <= 1.0
    };

    let best_fits = fits(&best);
    let tied = prev.filter(|p| (p.c.mean() - x.mean()).abs() == min_dist);

    match tied {
        Some(p) => {
            let prev_fits = fits(&p);
            match (prev_fits, best_fits) {
                (true, true) if p.c.weight() > best.c.weight() => Some(p.c),
                (_, true) => Some(best.c),
                (true, false) => Some(p.c),
                (false, false) => None,
            }
        }
        None => best_fits.then_some(best.c),
    }
}
