//! # boxwalk
//!
//! Data-parallel ball-vs-box area queries over a linearised 2^d-tree
//! (quadtree/octree). Given a pre-built tree whose leaf boxes tile a bounded
//! region and a batch of query balls in the Chebyshev (L∞) norm, this crate
//! computes:
//!
//! - [`area_query`] — for each ball, the leaf boxes it overlaps.
//! - [`leaves_to_balls`] — the transpose: for each leaf, the balls overlapping it.
//! - [`space_invader_query`] — for each leaf, the farthest overlapping ball's
//!   center-to-center Chebyshev distance.
//!
//! All three are built on [`find_peer_lists`], a precomputed, per-box
//! substructure that bounds each query to `O(peer-list + overlapping-leaves)`
//! instead of `O(tree-size)`.
//!
//! Building the tree itself — box centers, levels, child pointers, the
//! bounding box — is outside this crate's scope; [`tree::Tree`] is a
//! read-only view over arrays supplied by the caller.

pub mod area_query;
pub mod assembler;
pub mod descent;
pub mod errors;
pub mod geometry;
mod logging;
pub mod peers;
pub mod space_invader;
pub mod transpose;
pub mod tree;
mod validate;
pub mod walker;

pub use area_query::{area_query, AreaQueryResult};
pub use errors::QueryError;
pub use peers::{find_peer_lists, PeerListLookup};
pub use space_invader::space_invader_query;
pub use transpose::{leaves_to_balls, LeavesToBallsLookup};
pub use tree::Tree;
