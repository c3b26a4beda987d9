//! ## Guided descent (C2)
//!
//! Locates the guiding box for a ball: the deepest box in the tree that
//! contains the ball's center and whose half-side is at least the ball's
//! radius, with the tightest such bound the tree actually has. Every leaf a
//! ball overlaps is guaranteed to be a descendant of some peer of its guiding
//! box — this is what lets area query skip straight to the
//! guiding box's peer list instead of walking from the root.

use crate::geometry::{child_morton_number, level_to_rad, Coord};
use crate::tree::Tree;

/// Finds the guiding box for a ball `(center, radius)`.
///
/// Starts at the root; if the root's half-side divided by
/// two is already smaller than `radius`, the root itself is the guiding box.
/// Otherwise descends one level at a time, by the tree's own Morton
/// convention, stopping at a leaf or once `level_to_rad(L)/2 < radius <=
/// level_to_rad(L)`.
pub fn find_guiding_box<T: Coord>(tree: &Tree<T>, center: &[T], radius: T) -> usize {
    let root_half = level_to_rad(tree.root_extent(), 0);
    if T::from_f64(root_half.to_f64() / 2.0) < radius {
        return 0;
    }

    let mut box_id = 0usize;
    let mut level = 0u32;
    loop {
        if tree.is_leaf(box_id) {
            return box_id;
        }
        let half = level_to_rad(tree.root_extent(), level);
        let half_div2 = T::from_f64(half.to_f64() / 2.0);
        if half_div2 < radius && radius <= half {
            return box_id;
        }
        let morton = child_morton_number(center, tree.bbox_min(), tree.root_extent(), level);
        match tree.child(box_id, morton) {
            Some(child) => {
                box_id = child;
                level += 1;
            }
            // The ball's center routes outside the populated part of the
            // tree (e.g. center lies outside the root box along this path,
            // the current box is the best available guide.
            None => return box_id,
        }
    }
}
