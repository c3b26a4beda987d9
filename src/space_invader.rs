//! ## Space-invader builder (C7)
//!
//! For each leaf, reduces (by atomic max) the center-to-center Chebyshev
//! distance to every ball overlapping a slightly grown neighbourhood of that
//! leaf. Shares the guided-descent + peer-walk skeleton of area query (C5),
//! but the per-leaf test is looser and the output is a single reduced value
//! per leaf instead of a list.

use std::sync::atomic::{AtomicU32, Ordering};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::descent::find_guiding_box;
use crate::errors::QueryError;
use crate::geometry::{chebyshev_distance, level_to_rad, Coord};
use crate::peers::{find_peer_lists, PeerListLookup};
use crate::tree::Tree;
use crate::validate::{ball_center, validate_query_input};
use crate::walker::Walker;

/// Computes, for every box (only leaves are ever non-zero), the maximum
/// center-to-center Chebyshev distance to any ball overlapping a superset
/// neighbourhood of that box.
///
/// The reduction itself runs in `f32`, using the hardware-friendly trick of
/// reinterpreting non-negative `f32` bit patterns as `u32` and taking an
/// integer atomic max (valid because IEEE-754 non-negative floats and their
/// bit patterns share the same ordering). If `T = f64`, the result is widened
/// element-wise after the reduction completes; this is the one place in the
/// crate where precision loss is deliberately accepted.
pub fn space_invader_query<T: Coord>(
    tree: &Tree<T>,
    ball_centers: &[Vec<T>],
    ball_radii: &[T],
    peer_lists: Option<&PeerListLookup>,
) -> Result<Vec<T>, QueryError> {
    let nballs = validate_query_input(tree, ball_centers, ball_radii, peer_lists)?;
    info!(nballs, "running space-invader query");

    let owned_lookup;
    let lookup = match peer_lists {
        Some(lookup) => lookup,
        None => {
            owned_lookup = find_peer_lists(tree)?;
            &owned_lookup
        }
    };

    let nboxes = tree.nboxes();
    let dist_bits: Vec<AtomicU32> = (0..nboxes).map(|_| AtomicU32::new(0.0f32.to_bits())).collect();

    (0..nballs).into_par_iter().for_each(|i| {
        let center = ball_center(ball_centers, i);
        let radius = ball_radii[i];
        if radius <= T::zero() {
            return;
        }
        let guide = find_guiding_box(tree, &center, radius);
        for &peer in lookup.peers_of(guide) {
            visit_peer_subtree_for_siq(tree, peer, &center, radius, &dist_bits);
        }
    });

    let result: Vec<T> = dist_bits
        .iter()
        .map(|cell| {
            let value = f32::from_bits(cell.load(Ordering::Relaxed));
            T::from_f64(value as f64)
        })
        .collect();

    debug!("finished space-invader query");
    Ok(result)
}

fn visit_peer_subtree_for_siq<T: Coord>(
    tree: &Tree<T>,
    peer: usize,
    center: &[T],
    radius: T,
    dist_bits: &[AtomicU32],
) {
    if tree.is_leaf(peer) {
        test_and_reduce_leaf(tree, peer, center, radius, dist_bits);
        return;
    }

    let mut walker = Walker::new(tree, peer);
    loop {
        let Some((parent, morton)) = walker.current() else {
            break;
        };
        if let Some(child) = tree.child(parent, morton) {
            if tree.is_leaf(child) {
                test_and_reduce_leaf(tree, child, center, radius, dist_bits);
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

fn test_and_reduce_leaf<T: Coord>(
    tree: &Tree<T>,
    leaf: usize,
    center: &[T],
    radius: T,
    dist_bits: &[AtomicU32],
) {
    let box_center = tree.center(leaf);
    let dist = chebyshev_distance(center, &box_center);
    let half = level_to_rad(tree.root_extent(), tree.level(leaf));
    let threshold = T::from_f64(half.to_f64() + radius.to_f64());
    if dist.le(threshold) {
        atomic_max_f32(&dist_bits[leaf], dist.to_f64() as f32);
    }
}

/// Atomically sets `cell` to `max(cell, value)`, where `value` is always a
/// non-negative Chebyshev distance. Relies on `AtomicU32::fetch_max`
/// comparing bit patterns as unsigned integers, which is equivalent to
/// comparing as floats for any non-negative `f32`.
fn atomic_max_f32(cell: &AtomicU32, value: f32) {
    debug_assert!(value >= 0.0, "space-invader distances are never negative");
    cell.fetch_max(value.to_bits(), Ordering::Relaxed);
}
