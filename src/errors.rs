//! ## Errors for Boxwalk
//!
//! This module defines the errors that the query core can report. Per the
//! contract, precondition violations are reported before any work starts, so
//! a caller never observes a partially mutated output.

use std::error::Error;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors produced by the peer-list/area-query/LBL/SIQ entry points.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug)]
pub enum QueryError {
    /// A ball array length doesn't match the declared ball count, or doesn't
    /// match another ball array's length.
    BallArrayLengthMismatch {
        /// Name of the offending array.
        array: &'static str,
        /// Length the array actually has.
        got: usize,
        /// Length it was expected to have.
        expected: usize,
    },
    /// `ball_centers` does not have one row per tree axis.
    BallCenterAxisCountMismatch {
        /// Number of axis rows supplied.
        got: usize,
        /// `tree.dimensions()`.
        expected: usize,
    },
    /// A supplied [`PeerListLookup`](crate::peers::PeerListLookup) has the
    /// wrong number of CSR offsets for this tree.
    PeerListLengthMismatch {
        /// `peer_list_starts.len()` as supplied.
        got: usize,
        /// `tree.nboxes() + 1`.
        expected: usize,
    },
    /// The tree itself violates a structural precondition (corrupt child
    /// table, a level deeper than the walker's stack bound, etc). This is
    /// undefined behavior at the contract level; we surface a diagnostic
    /// instead of mis-indexing.
    PreconditionViolated {
        /// Human-readable description of what was violated.
        reason: String,
    },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::BallArrayLengthMismatch {
                array,
                got,
                expected,
            } => write!(
                f,
                "ball array `{array}` has length {got}, expected {expected}"
            ),
            QueryError::BallCenterAxisCountMismatch { got, expected } => write!(
                f,
                "ball_centers has {got} axis rows, expected {expected} (tree.dimensions())"
            ),
            QueryError::PeerListLengthMismatch { got, expected } => write!(
                f,
                "peer_list_starts has length {got}, expected {expected} (nboxes + 1)"
            ),
            QueryError::PreconditionViolated { reason } => {
                write!(f, "precondition violated: {reason}")
            }
        }
    }
}

impl Error for QueryError {}
