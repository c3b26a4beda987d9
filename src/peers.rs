//! ## Peer-list finder (C4)
//!
//! Builds, for every box in the tree, its *peer list* — the minimal set of
//! same-or-larger, pairwise-non-refinable boxes that together cover the
//! box's adjacent neighbourhood. This is the substructure
//! every other query in this crate is built on.

use rayon::prelude::*;
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::assembler::build_csr_lists;
use crate::errors::QueryError;
use crate::geometry::{is_adjacent_or_overlapping, Coord};
use crate::tree::Tree;
use crate::validate::validate_tree_shape;
use crate::walker::Walker;

/// The peer lists for every box of a tree, in CSR form.
///
/// `peer_lists[peer_list_starts[b]..peer_list_starts[b + 1]]` is box `b`'s
/// peer set; `peer_list_starts[0] == 1` is not guaranteed in general, but
/// `peer_lists[peer_list_starts[0]..peer_list_starts[1]] == [0]` always holds
/// (the root's only peer is itself).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct PeerListLookup {
    /// CSR offsets, length `nboxes + 1`.
    pub peer_list_starts: Vec<usize>,
    /// Concatenated per-box peer lists, length `peer_list_starts[nboxes]`.
    pub peer_lists: Vec<usize>,
}

impl PeerListLookup {
    /// The peer list of `box_id`.
    pub fn peers_of(&self, box_id: usize) -> &[usize] {
        &self.peer_lists[self.peer_list_starts[box_id]..self.peer_list_starts[box_id + 1]]
    }
}

/// Builds the peer lists for every box of `tree` (C4).
///
/// This is the only entry point in the crate whose cost is `O(nboxes *
/// 3^dimensions)` rather than output-sized; callers that will issue many
/// area/LBL/SIQ queries against the same tree should build this once and
/// pass it to those calls rather than letting each one rebuild it.
///
/// # Errors
///
/// Returns [`QueryError::PreconditionViolated`] if any box's level meets or
/// exceeds the walker's statically bounded stack depth, i.e. the tree is
/// corrupt or deeper than this core was built to walk.
pub fn find_peer_lists<T: Coord>(tree: &Tree<T>) -> Result<PeerListLookup, QueryError> {
    validate_tree_shape(tree)?;

    let nboxes = tree.nboxes();
    info!(nboxes, dimensions = tree.dimensions(), "building peer lists");

    let (peer_list_starts, peer_lists) = build_csr_lists(nboxes, |b, emit| {
        peer_list_for_box(tree, b, emit);
    });

    debug!(total_peers = peer_lists.len(), "finished building peer lists");
    Ok(PeerListLookup {
        peer_list_starts,
        peer_lists,
    })
}

/// Builds the peer lists for every box of `tree`, dispatching across `rayon`
/// workers explicitly rather than going through [`build_csr_lists`]'s
/// generic count/write passes. Equivalent to [`find_peer_lists`]; kept
/// separate because unlike area/LBL/SIQ queries, peer-list counts are cheap
/// enough (`O(3^d)`) that some callers may prefer per-box `Vec`s without the
/// CSR indirection.
pub fn find_peer_lists_per_box<T: Coord>(tree: &Tree<T>) -> Vec<Vec<usize>> {
    (0..tree.nboxes())
        .into_par_iter()
        .map(|b| {
            let mut list = Vec::new();
            peer_list_for_box(tree, b, &mut |p| list.push(p));
            list
        })
        .collect()
}

/// Computes box `b`'s peer list, calling `emit` once per peer.
fn peer_list_for_box<T: Coord>(tree: &Tree<T>, b: usize, emit: &mut dyn FnMut(usize)) {
    if b == 0 {
        emit(0);
        return;
    }

    let dims = tree.dimensions();
    let mut b_center = vec![T::zero(); dims];
    tree.center_into(b, &mut b_center);
    let lb = tree.level(b);

    let mut child_center = vec![T::zero(); dims];
    let mut grandchild_center = vec![T::zero(); dims];

    let mut walker = Walker::new(tree, 0);
    loop {
        let Some((parent, morton)) = walker.current() else {
            break;
        };

        if let Some(child) = tree.child(parent, morton) {
            tree.center_into(child, &mut child_center);
            let lc = tree.level(child);

            if is_adjacent_or_overlapping(tree.root_extent(), &child_center, lc, &b_center, lb) {
                if lc == lb || tree.is_leaf(child) {
                    // Condition (3) is vacuous: we can't descend past `b`'s
                    // level, or there's nothing to descend into.
                    emit(child);
                } else {
                    // `child` is strictly coarser than `b` and has children:
                    // it's only a peer if none of ITS children also touch
                    // `b`'s neighbourhood (the "must-be-peer" test).
                    let mut any_child_adjacent = false;
                    for m in 0..tree.nchildren_per_box() {
                        if let Some(grandchild) = tree.child(child, m) {
                            tree.center_into(grandchild, &mut grandchild_center);
                            let lgc = tree.level(grandchild);
                            if is_adjacent_or_overlapping(
                                tree.root_extent(),
                                &grandchild_center,
                                lgc,
                                &b_center,
                                lb,
                            ) {
                                any_child_adjacent = true;
                                break;
                            }
                        }
                    }
                    if any_child_adjacent {
                        walker.push(child);
                        continue;
                    } else {
                        emit(child);
                    }
                }
            }
            // Not adjacent: prune — neither entered nor emitted.
        }

        if !walker.advance() {
            break;
        }
    }
}
