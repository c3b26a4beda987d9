//! ## Leaves→Balls lookup / transpose builder (C6)
//!
//! Inverts an [`AreaQueryResult`] into per-leaf-box lists of overlapping
//! balls, via starts-expand + key-value sort + group, rather
//! than by walking the tree again.

use rayon::prelude::*;
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::area_query::{area_query, AreaQueryResult};
use crate::errors::QueryError;
use crate::geometry::Coord;
use crate::peers::PeerListLookup;
use crate::tree::Tree;

/// For every box (only leaves can be non-empty), the balls overlapping it, in
/// CSR form, sorted by ball id within each group.
///
/// Indexed by global box id, length `tree.nboxes() + 1` regardless of ball
/// count — unlike [`AreaQueryResult`], which is indexed by ball, this output
/// is indexed by box, so it keeps its full shape (with all-empty groups) even
/// when there are zero balls.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct LeavesToBallsLookup {
    /// CSR offsets, length `nboxes + 1`.
    pub balls_near_box_starts: Vec<usize>,
    /// Concatenated per-box ball-id lists, sorted ascending within each
    /// group.
    pub balls_near_box_lists: Vec<usize>,
}

impl LeavesToBallsLookup {
    /// The balls overlapping `box_id`.
    pub fn balls_of(&self, box_id: usize) -> &[usize] {
        &self.balls_near_box_lists
            [self.balls_near_box_starts[box_id]..self.balls_near_box_starts[box_id + 1]]
    }
}

/// Computes the area query for every ball and immediately transposes it into
/// a per-box lookup.
pub fn leaves_to_balls<T: Coord>(
    tree: &Tree<T>,
    ball_centers: &[Vec<T>],
    ball_radii: &[T],
    peer_lists: Option<&PeerListLookup>,
) -> Result<LeavesToBallsLookup, QueryError> {
    let aq = area_query(tree, ball_centers, ball_radii, peer_lists)?;
    Ok(transpose_area_query(tree.nboxes(), &aq))
}

/// Transposes an already-computed [`AreaQueryResult`] into a
/// [`LeavesToBallsLookup`], without re-running the area query.
pub fn transpose_area_query(nboxes: usize, aq: &AreaQueryResult) -> LeavesToBallsLookup {
    let total = aq.leaves_near_ball_lists.len();
    info!(nboxes, total_pairs = total, "transposing area query into leaves-to-balls lookup");

    let starts = &aq.leaves_near_ball_starts;

    // Starts-expand: E[j] = the ball id owning position j, found by a
    // parallel binary search of j against the ball CSR offsets.
    let expanded: Vec<usize> = (0..total)
        .into_par_iter()
        .map(|j| starts.partition_point(|&s| s <= j) - 1)
        .collect();

    // Key-value sort by leaf box id. `expanded` is non-decreasing in j (ball
    // ids only increase as we scan across the ball-ordered list), so a
    // *stable* sort by box id alone is enough to leave each group's ball ids
    // in ascending order too — no separate secondary sort key is needed.
    let mut pairs: Vec<(usize, usize)> = aq
        .leaves_near_ball_lists
        .iter()
        .copied()
        .zip(expanded)
        .collect();
    pairs.par_sort_by_key(|&(box_id, _)| box_id);

    // Group into CSR indexed by box id. Since `pairs` is fully sorted by key,
    // each box's start offset is just the lower bound of its id in the key
    // sequence — no separate count + scan pass is needed here (unlike the
    // general list-of-lists assembler in `assembler`, C6's shape is known
    // once the sort completes).
    let keys: Vec<usize> = pairs.iter().map(|&(k, _)| k).collect();
    let balls_near_box_starts: Vec<usize> = (0..=nboxes)
        .into_par_iter()
        .map(|b| keys.partition_point(|&k| k < b))
        .collect();
    let balls_near_box_lists: Vec<usize> = pairs.into_iter().map(|(_, v)| v).collect();

    debug!("finished leaves-to-balls transpose");
    LeavesToBallsLookup {
        balls_near_box_starts,
        balls_near_box_lists,
    }
}
