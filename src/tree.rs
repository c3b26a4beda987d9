//! ## The linearised tree view Boxwalk's query core consumes
//!
//! Construction of the tree (box centers, levels, child pointers, the
//! bounding box) is an external concern, out of scope for this core. This
//! module only defines the read-only view the core needs and a small,
//! explicitly test-only builder used to assemble fixture trees in unit tests
//! and benchmarks.
//!
//! Storage is structure-of-arrays, per-axis, the same layout the source this
//! core is modeled on uses for its device buffers: `box_centers[axis][box]`
//! rather than `box_centers[box][axis]`, and `box_child_ids[morton][box]`
//! rather than `box_child_ids[box][morton]`.

use crate::geometry::Coord;

/// Bit of [`Tree::box_flags`] set on internal (non-leaf) boxes.
pub const HAS_CHILDREN: u8 = 1 << 0;

/// A read-only, arena-indexed view of a pre-built 2^d-tree.
///
/// All arrays are borrowed for the duration of a call by the builders in
/// [`crate::peers`], [`crate::area_query`], [`crate::transpose`], and
/// [`crate::space_invader`]; `Tree` never mutates them.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound = "T: serde::Serialize + serde::de::DeserializeOwned")
)]
pub struct Tree<T: Coord> {
    dimensions: usize,
    nlevels: u32,
    root_extent: T,
    bbox_min: Vec<T>,
    /// `box_centers[axis][box]`.
    box_centers: Vec<Vec<T>>,
    box_levels: Vec<u32>,
    box_flags: Vec<u8>,
    /// `box_child_ids[morton][box]`; `0` means "no such child" (box 0 is the
    /// root and is never anyone's child).
    box_child_ids: Vec<Vec<usize>>,
    aligned_nboxes: usize,
}

impl<T: Coord> Tree<T> {
    /// Builds a tree view from already-computed arrays.
    ///
    /// # Panics
    ///
    /// Panics if the arrays' shapes are inconsistent with `dimensions`: a
    /// corrupt/malformed tree is a precondition violation, not a
    /// recoverable error, because it can only be triggered by the tree
    /// builder external to this core, never by ordinary query input.
    pub fn new(
        dimensions: usize,
        nlevels: u32,
        root_extent: T,
        bbox_min: Vec<T>,
        box_centers: Vec<Vec<T>>,
        box_levels: Vec<u32>,
        box_flags: Vec<u8>,
        box_child_ids: Vec<Vec<usize>>,
    ) -> Self {
        assert_eq!(bbox_min.len(), dimensions, "bbox_min must have `dimensions` entries");
        assert_eq!(
            box_centers.len(),
            dimensions,
            "box_centers must have `dimensions` rows"
        );
        let nboxes = box_levels.len();
        for row in &box_centers {
            assert_eq!(row.len(), nboxes, "box_centers rows must all have length nboxes");
        }
        assert_eq!(box_flags.len(), nboxes);
        let nchildren = 1usize << dimensions;
        assert_eq!(
            box_child_ids.len(),
            nchildren,
            "box_child_ids must have 2^dimensions rows"
        );
        let aligned_nboxes = box_child_ids.first().map_or(nboxes, |row| row.len());
        for row in &box_child_ids {
            assert_eq!(row.len(), aligned_nboxes, "box_child_ids rows must be equal length");
        }
        Tree {
            dimensions,
            nlevels,
            root_extent,
            bbox_min,
            box_centers,
            box_levels,
            box_flags,
            box_child_ids,
            aligned_nboxes,
        }
    }

    /// Number of boxes in the tree (root included).
    pub fn nboxes(&self) -> usize {
        self.box_levels.len()
    }

    /// Dimensionality `d` of the tree (2 for a quadtree, 3 for an octree).
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of distinct levels present in the tree; root is level 0.
    pub fn nlevels(&self) -> u32 {
        self.nlevels
    }

    /// Side length of the level-0 (root) box.
    pub fn root_extent(&self) -> T {
        self.root_extent
    }

    /// Minimum corner of the root box, one coordinate per axis.
    pub fn bbox_min(&self) -> &[T] {
        &self.bbox_min
    }

    /// Padded stride of the child table's columns; `>= nboxes()`.
    pub fn aligned_nboxes(&self) -> usize {
        self.aligned_nboxes
    }

    /// The center of `box_id`, one coordinate per axis.
    pub fn center(&self, box_id: usize) -> Vec<T> {
        self.box_centers.iter().map(|row| row[box_id]).collect()
    }

    /// Writes the center of `box_id` into `out`, one coordinate per axis.
    /// `out.len()` must equal [`Tree::dimensions`].
    pub fn center_into(&self, box_id: usize, out: &mut [T]) {
        debug_assert_eq!(out.len(), self.dimensions);
        for (axis, row) in self.box_centers.iter().enumerate() {
            out[axis] = row[box_id];
        }
    }

    /// The level of `box_id`; root is level 0.
    pub fn level(&self, box_id: usize) -> u32 {
        self.box_levels[box_id]
    }

    /// True iff `box_id` has no children.
    pub fn is_leaf(&self, box_id: usize) -> bool {
        self.box_flags[box_id] & HAS_CHILDREN == 0
    }

    /// The `morton`-th child of `box_id`, or `None` if that child slot is
    /// empty.
    pub fn child(&self, box_id: usize, morton: usize) -> Option<usize> {
        let child = self.box_child_ids[morton][box_id];
        if child == 0 {
            None
        } else {
            Some(child)
        }
    }

    /// Number of morton slots per box: `2^dimensions`.
    pub fn nchildren_per_box(&self) -> usize {
        self.box_child_ids.len()
    }

    /// The statically bounded walk-stack depth for this tree: `nlevels`
    /// rounded up to the next multiple of 10. This keeps the
    /// memoisation key for any downstream kernel cache coarse-grained; the
    /// bound is correct for any value `>= nlevels`.
    pub fn max_levels(&self) -> u32 {
        self.nlevels.div_ceil(10) * 10
    }
}

#[cfg(test)]
/// Small fixture builder for unit tests: builds fixed quadtree/octree shapes
/// by uniform subdivision. Not a
/// general tree-construction facility — that remains out of scope.
pub(crate) mod fixtures {
    use super::*;

    /// Builds a 2-D tree with a single root box (no subdivision): scenario
    /// a ball fully inside the root, and one fully outside it.
    pub fn root_only_2d() -> Tree<f64> {
        Tree::new(
            2,
            0,
            1.0,
            vec![0.0, 0.0],
            vec![vec![0.5], vec![0.5]],
            vec![0],
            vec![0],
            vec![vec![0]; 4],
        )
    }

    /// Builds a 2-D tree with the root split once into 4 leaves (boxes
    /// 1..=4, in morton order SW, SE, NW, NE per this module's convention).
    pub fn split_once_2d() -> Tree<f64> {
        // Morton order here: axis0 = x (MSB), axis1 = y (LSB).
        // morton 0b00 -> (low x, low y)  -> center (0.25, 0.25)
        // morton 0b01 -> (low x, high y) -> center (0.25, 0.75)
        // morton 0b10 -> (high x, low y) -> center (0.75, 0.25)
        // morton 0b11 -> (high x, high y)-> center (0.75, 0.75)
        let centers_x = vec![0.5, 0.25, 0.25, 0.75, 0.75];
        let centers_y = vec![0.5, 0.25, 0.75, 0.25, 0.75];
        let levels = vec![0, 1, 1, 1, 1];
        let flags = vec![HAS_CHILDREN, 0, 0, 0, 0];
        let child_ids = vec![
            vec![1, 0, 0, 0, 0], // morton 0: box0 -> box1
            vec![2, 0, 0, 0, 0], // morton 1: box0 -> box2
            vec![3, 0, 0, 0, 0], // morton 2: box0 -> box3
            vec![4, 0, 0, 0, 0], // morton 3: box0 -> box4
        ];
        Tree::new(2, 1, 1.0, vec![0.0, 0.0], vec![centers_x, centers_y], levels, flags, child_ids)
    }

    /// The SW leaf of [`split_once_2d`] (box 1) is further split into 4
    /// level-2 leaves (boxes 5..=8).
    pub fn split_sw_again_2d() -> Tree<f64> {
        let mut centers_x = vec![0.5, 0.25, 0.25, 0.75, 0.75];
        let mut centers_y = vec![0.5, 0.25, 0.75, 0.25, 0.75];
        let mut levels = vec![0, 1, 1, 1, 1];
        let mut flags = vec![HAS_CHILDREN, HAS_CHILDREN, 0, 0, 0];

        // Box 1 spans [0, 0.5] x [0, 0.5]; its 4 children at level 2:
        centers_x.extend([0.125, 0.125, 0.375, 0.375]);
        centers_y.extend([0.125, 0.375, 0.125, 0.375]);
        levels.extend([2, 2, 2, 2]);
        flags.extend([0, 0, 0, 0]);

        let child_ids = vec![
            vec![1, 5, 0, 0, 0, 0, 0, 0, 0], // morton 0: box0 -> box1, box1 -> box5
            vec![2, 6, 0, 0, 0, 0, 0, 0, 0], // morton 1: box0 -> box2, box1 -> box6
            vec![3, 7, 0, 0, 0, 0, 0, 0, 0], // morton 2: box0 -> box3, box1 -> box7
            vec![4, 8, 0, 0, 0, 0, 0, 0, 0], // morton 3: box0 -> box4, box1 -> box8
        ];
        Tree::new(2, 2, 1.0, vec![0.0, 0.0], vec![centers_x, centers_y], levels, flags, child_ids)
    }
}
