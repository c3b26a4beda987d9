//! ## Geometry predicates for Boxwalk
//!
//! All predicates here are Chebyshev (L∞): a "ball" is an axis-aligned cube
//! and "distance" always means `max` over per-axis absolute differences. The
//! core never computes a Euclidean norm (see spec Non-goals).

/// The coordinate type used by a tree's box centers and ball centers/radii.
///
/// Implemented for `f32` and `f64`, mirroring the `coord_t` parameter of the
/// source this core is modeled on.
pub trait Coord: Copy + PartialOrd + std::fmt::Debug + Send + Sync + 'static {
    /// Machine epsilon for this type, used to size the adjacency tolerance.
    const EPSILON: Self;

    /// Additive identity.
    fn zero() -> Self;

    /// `|self - other|`.
    fn abs_diff(self, other: Self) -> Self;

    /// Pointwise max.
    fn max(self, other: Self) -> Self;

    /// Lossless-enough round-trip through `f64` for the handful of
    /// computations (level-to-radius scaling, Morton bit extraction) where a
    /// generic implementation over `f64` arithmetic is clearer than
    /// duplicating it per concrete type.
    fn to_f64(self) -> f64;

    /// Inverse of [`Coord::to_f64`].
    fn from_f64(value: f64) -> Self;

    /// True if `self` is not less than `other` (avoids requiring `PartialOrd`
    /// bounds at every call site).
    fn ge(self, other: Self) -> bool {
        self >= other
    }

    /// True if `self` is not greater than `other`.
    fn le(self, other: Self) -> bool {
        self <= other
    }
}

impl Coord for f32 {
    const EPSILON: Self = f32::EPSILON;

    fn zero() -> Self {
        0.0
    }

    fn abs_diff(self, other: Self) -> Self {
        (self - other).abs()
    }

    fn max(self, other: Self) -> Self {
        f32::max(self, other)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Coord for f64 {
    const EPSILON: Self = f64::EPSILON;

    fn zero() -> Self {
        0.0
    }

    fn abs_diff(self, other: Self) -> Self {
        (self - other).abs()
    }

    fn max(self, other: Self) -> Self {
        f64::max(self, other)
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Half the side length of a box at level `level`, given the root box's full
/// side length `root_extent`.
///
/// `level_to_rad(L) = root_extent / 2^(L+1)`; level 0 is the root.
pub fn level_to_rad<T: Coord>(root_extent: T, level: u32) -> T {
    let scale = 2f64.powi((level + 1) as i32);
    T::from_f64(root_extent.to_f64() / scale)
}

/// Returns true iff two axis-aligned cube boxes, given by center and level,
/// are adjacent to or overlapping one another under the L∞ (Chebyshev) norm.
///
/// Boxes are adjacent-or-overlapping iff for every axis `a`,
/// `|c1[a] - c2[a]| <= h1 + h2`, where `h1`/`h2` are the boxes' half-sides.
/// Edge-touching counts as adjacency, so the comparison uses `<=` with a
/// small tolerance sized to one ULP of the larger half-side, to absorb
/// floating-point round-off at the boundary rather than reporting spurious
/// non-adjacency for boxes that are meant to touch exactly.
///
/// `targets_have_extent`/`sources_have_extent` in the source this is modeled
/// on are always `false` for peer-list purposes; this predicate only
/// implements that point/point case (see DESIGN.md Open Questions).
pub fn is_adjacent_or_overlapping<T: Coord>(
    root_extent: T,
    center1: &[T],
    level1: u32,
    center2: &[T],
    level2: u32,
) -> bool {
    debug_assert_eq!(center1.len(), center2.len());
    let h1 = level_to_rad(root_extent, level1);
    let h2 = level_to_rad(root_extent, level2);
    let sum = T::from_f64(h1.to_f64() + h2.to_f64());
    let tol = T::from_f64(T::EPSILON.to_f64() * sum.to_f64().max(1.0));
    let bound = T::from_f64(sum.to_f64() + tol.to_f64());
    center1
        .iter()
        .zip(center2.iter())
        .all(|(&a, &b)| a.abs_diff(b).le(bound))
}

/// Returns true iff an L∞ ball of the given center/radius overlaps an
/// axis-aligned cube box of the given center/half-side.
///
/// `max_a |center[a] - box_center[a]| <= box_half + radius`.
pub fn ball_overlaps_box<T: Coord>(
    center: &[T],
    radius: T,
    box_center: &[T],
    box_half: T,
) -> bool {
    debug_assert_eq!(center.len(), box_center.len());
    if radius <= T::zero() {
        return false;
    }
    let bound = T::from_f64(box_half.to_f64() + radius.to_f64());
    center
        .iter()
        .zip(box_center.iter())
        .all(|(&c, &bc)| c.abs_diff(bc).le(bound))
}

/// The Chebyshev (L∞) distance between two points: `max_a |a[a] - b[a]|`.
pub fn chebyshev_distance<T: Coord>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| x.abs_diff(y))
        .fold(T::zero(), |acc, d| acc.max(d))
}

/// Computes the Morton child number a point routes to when descending one
/// level from a box at `level`, i.e. which of the `2^dims` children of a box
/// centered on `box_center` (at `level`) contains `point`.
///
/// Per axis `a`, `bits_a = floor(((point[a] - bbox_min[a]) / root_extent) *
/// 2^(level+1))`; the Morton number is the concatenation of the low bit of
/// each axis, with axis 0 as the most-significant bit. This must match the
/// tree's own Morton convention exactly, or guided descent silently picks the
/// wrong child.
pub fn child_morton_number<T: Coord>(
    point: &[T],
    bbox_min: &[T],
    root_extent: T,
    level: u32,
) -> usize {
    let scale = 2f64.powi((level + 1) as i32);
    let mut morton = 0usize;
    for (&p, &min) in point.iter().zip(bbox_min.iter()) {
        let bits = (((p.to_f64() - min.to_f64()) / root_extent.to_f64()) * scale).floor() as i64;
        let low_bit = (bits & 1) as usize;
        morton = (morton << 1) | low_bit;
    }
    morton
}
