//! ## Area-query builder (C5)
//!
//! For each ball, produces the list of leaf boxes it L∞-overlaps, using the
//! guiding box (C2) and each of its peers (C4) as entry points, then walking
//! each peer's subtree (C3) down to leaves.

use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::assembler::build_csr_lists;
use crate::descent::find_guiding_box;
use crate::errors::QueryError;
use crate::geometry::{ball_overlaps_box, level_to_rad, Coord};
use crate::peers::{find_peer_lists, PeerListLookup};
use crate::tree::Tree;
use crate::validate::{ball_center, validate_query_input};
use crate::walker::Walker;

/// For each ball, the leaf boxes it L∞-overlaps, in CSR form.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct AreaQueryResult {
    /// CSR offsets, length `nballs + 1`.
    pub leaves_near_ball_starts: Vec<usize>,
    /// Concatenated per-ball leaf-box-id lists.
    pub leaves_near_ball_lists: Vec<usize>,
}

impl AreaQueryResult {
    /// The leaves overlapping ball `i`.
    pub fn leaves_of(&self, ball: usize) -> &[usize] {
        &self.leaves_near_ball_lists
            [self.leaves_near_ball_starts[ball]..self.leaves_near_ball_starts[ball + 1]]
    }
}

/// Computes, for every ball `(ball_centers[axis][i], ball_radii[i])`, the
/// leaf boxes it overlaps.
///
/// `ball_centers` is struct-of-arrays: one row per tree axis, each row of
/// length `nballs`. If `peer_lists` is `None`, peer lists are built
/// internally for the duration of this call and not returned.
pub fn area_query<T: Coord>(
    tree: &Tree<T>,
    ball_centers: &[Vec<T>],
    ball_radii: &[T],
    peer_lists: Option<&PeerListLookup>,
) -> Result<AreaQueryResult, QueryError> {
    let nballs = validate_query_input(tree, ball_centers, ball_radii, peer_lists)?;
    info!(nballs, "running area query");

    let owned_lookup;
    let lookup = match peer_lists {
        Some(lookup) => lookup,
        None => {
            owned_lookup = find_peer_lists(tree)?;
            &owned_lookup
        }
    };

    let (leaves_near_ball_starts, leaves_near_ball_lists) = build_csr_lists(nballs, |i, emit| {
        let center = ball_center(ball_centers, i);
        let radius = ball_radii[i];
        area_query_for_ball(tree, lookup, &center, radius, emit);
    });

    debug!(
        total_hits = leaves_near_ball_lists.len(),
        "finished area query"
    );
    Ok(AreaQueryResult {
        leaves_near_ball_starts,
        leaves_near_ball_lists,
    })
}

/// Computes the overlapping leaves for a single ball: find its guiding box,
/// then walk every peer's subtree down to leaves.
fn area_query_for_ball<T: Coord>(
    tree: &Tree<T>,
    peer_lists: &PeerListLookup,
    center: &[T],
    radius: T,
    emit: &mut dyn FnMut(usize),
) {
    // A ball with non-positive radius overlaps nothing.
    if radius <= T::zero() {
        return;
    }

    let guide = find_guiding_box(tree, center, radius);
    for &peer in peer_lists.peers_of(guide) {
        visit_peer_subtree(tree, peer, center, radius, emit);
    }
}

/// Walks the subtree rooted at a peer, testing and emitting every leaf it
/// contains that L∞-overlaps the ball. Internal boxes are always descended
/// into unconditionally — the peer-list guarantee bounds how much subtree
/// there is to walk, not which parts of it can be skipped.
fn visit_peer_subtree<T: Coord>(
    tree: &Tree<T>,
    peer: usize,
    center: &[T],
    radius: T,
    emit: &mut dyn FnMut(usize),
) {
    if tree.is_leaf(peer) {
        test_and_emit_leaf(tree, peer, center, radius, emit);
        return;
    }

    let mut walker = Walker::new(tree, peer);
    loop {
        let Some((parent, morton)) = walker.current() else {
            break;
        };
        if let Some(child) = tree.child(parent, morton) {
            if tree.is_leaf(child) {
                test_and_emit_leaf(tree, child, center, radius, emit);
            } else {
                walker.push(child);
                continue;
            }
        }
        if !walker.advance() {
            break;
        }
    }
}

fn test_and_emit_leaf<T: Coord>(
    tree: &Tree<T>,
    leaf: usize,
    center: &[T],
    radius: T,
    emit: &mut dyn FnMut(usize),
) {
    let box_center = tree.center(leaf);
    let half = level_to_rad(tree.root_extent(), tree.level(leaf));
    if ball_overlaps_box(center, radius, &box_center, half) {
        emit(leaf);
    }
}
