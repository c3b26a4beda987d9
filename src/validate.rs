//! Shared precondition checks for the four public query entry points
//! ball array shapes and, when supplied, a pre-built peer-list
//! lookup's shape. All reported as [`QueryError::*`](crate::errors::QueryError)
//! before any work starts, never recovered mid-call.

use crate::errors::QueryError;
use crate::geometry::Coord;
use crate::peers::PeerListLookup;
use crate::tree::Tree;

/// Validates that every box's level is within the walker's statically
/// bounded stack depth ([`Tree::max_levels`]). A box whose level meets or
/// exceeds that bound means the tree is corrupt or deeper than the core was
/// built to walk; the walker's stack would grow past its intended bound
/// silently in a release build if this were only checked by a `debug_assert`
/// inside the walk itself, so it is checked once, up front, for every entry
/// point that walks the tree.
pub(crate) fn validate_tree_shape<T: Coord>(tree: &Tree<T>) -> Result<(), QueryError> {
    let max_levels = tree.max_levels();
    for box_id in 0..tree.nboxes() {
        let level = tree.level(box_id);
        if level >= max_levels {
            return Err(QueryError::PreconditionViolated {
                reason: format!(
                    "box {box_id} has level {level} >= the walker's statically bounded depth {max_levels}"
                ),
            });
        }
    }
    Ok(())
}

/// Validates ball array shapes (and an optional peer-list lookup's shape)
/// against `tree`, returning the ball count on success.
pub(crate) fn validate_query_input<T: Coord>(
    tree: &Tree<T>,
    ball_centers: &[Vec<T>],
    ball_radii: &[T],
    peer_lists: Option<&PeerListLookup>,
) -> Result<usize, QueryError> {
    validate_tree_shape(tree)?;

    if ball_centers.len() != tree.dimensions() {
        return Err(QueryError::BallCenterAxisCountMismatch {
            got: ball_centers.len(),
            expected: tree.dimensions(),
        });
    }

    let nballs = ball_radii.len();
    for row in ball_centers {
        if row.len() != nballs {
            return Err(QueryError::BallArrayLengthMismatch {
                array: "ball_centers",
                got: row.len(),
                expected: nballs,
            });
        }
    }

    if let Some(lookup) = peer_lists {
        let expected = tree.nboxes() + 1;
        if lookup.peer_list_starts.len() != expected {
            return Err(QueryError::PeerListLengthMismatch {
                got: lookup.peer_list_starts.len(),
                expected,
            });
        }
    }

    Ok(nballs)
}

/// Reads ball `i`'s center into a freshly allocated `Vec`, one coordinate per
/// axis, from the struct-of-arrays `ball_centers`.
pub(crate) fn ball_center<T: Coord>(ball_centers: &[Vec<T>], i: usize) -> Vec<T> {
    ball_centers.iter().map(|row| row[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::fixtures::split_once_2d;

    #[test]
    fn test_rejects_wrong_axis_count() {
        let tree = split_once_2d();
        let centers = vec![vec![0.5]]; // only 1 axis row, tree is 2-D
        let radii = vec![0.1];
        let err = validate_query_input(&tree, &centers, &radii, None).unwrap_err();
        assert!(matches!(err, QueryError::BallCenterAxisCountMismatch { .. }));
    }

    #[test]
    fn test_rejects_mismatched_row_lengths() {
        let tree = split_once_2d();
        let centers = vec![vec![0.5, 0.5], vec![0.5]];
        let radii = vec![0.1, 0.1];
        let err = validate_query_input(&tree, &centers, &radii, None).unwrap_err();
        assert!(matches!(err, QueryError::BallArrayLengthMismatch { .. }));
    }

    #[test]
    fn test_accepts_well_formed_input() {
        let tree = split_once_2d();
        let centers = vec![vec![0.5, 0.25], vec![0.5, 0.25]];
        let radii = vec![0.1, 0.1];
        assert_eq!(validate_query_input(&tree, &centers, &radii, None).unwrap(), 2);
    }

    #[test]
    fn test_rejects_box_deeper_than_max_levels() {
        use crate::tree::Tree;
        // A single box whose level (15) meets or exceeds max_levels() (10
        // for nlevels = 1): simulates a corrupt or overdeep tree.
        let tree: Tree<f64> = Tree::new(
            2,
            1,
            1.0,
            vec![0.0, 0.0],
            vec![vec![0.5], vec![0.5]],
            vec![15],
            vec![0],
            vec![vec![0]; 4],
        );
        let err = validate_tree_shape(&tree).unwrap_err();
        assert!(matches!(err, QueryError::PreconditionViolated { .. }));
    }
}
