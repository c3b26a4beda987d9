//! ## Stackful tree walker (C3)
//!
//! A depth-first child enumeration over the tree using an explicit stack of
//! `(box_id, next_morton_nr, level)` frames, rather than native recursion.
//! The source this core is modeled on needs this because it runs inside a
//! kernel with no call stack; on the CPU, native recursion would work just as
//! well, but the explicit-stack form is kept for parity with that design and
//! because it makes the statically-bounded-depth invariant
//! trivial to check: the stack's `Vec` never grows past `tree.max_levels()`.
//!
//! The walker is a plain state machine driven by [`Walker::advance`], not a
//! coroutine, so it composes with both a sequential loop and a `rayon`
//! parallel-for body.

use crate::tree::Tree;
use crate::geometry::Coord;

/// One frame of the explicit walk stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    box_id: usize,
    morton_nr: usize,
    #[allow(dead_code)]
    level: u32,
}

/// Depth-first walker over a subtree, driven by an explicit stack.
///
/// Typical use:
///
/// ```ignore
/// let mut walker = Walker::new(tree, start_box);
/// while let Some((parent, morton_nr)) = walker.current() {
///     if let Some(child) = tree.child(parent, morton_nr) {
///         // inspect `child`; call `walker.push(child)` to descend into it,
///         // or leave it alone to skip it.
///     }
///     walker.advance();
/// }
/// ```
pub struct Walker<'a, T: Coord> {
    tree: &'a Tree<T>,
    stack: Vec<Frame>,
}

impl<'a, T: Coord> Walker<'a, T> {
    /// `walk_init(start)`: push `(start, 0, level(start))`.
    pub fn new(tree: &'a Tree<T>, start: usize) -> Self {
        let mut stack = Vec::with_capacity(tree.max_levels() as usize);
        stack.push(Frame {
            box_id: start,
            morton_nr: 0,
            level: tree.level(start),
        });
        Walker { tree, stack }
    }

    /// Returns `(box_id, morton_nr)` of the slot the caller should inspect
    /// next, or `None` if the walk is finished.
    pub fn current(&self) -> Option<(usize, usize)> {
        self.stack
            .last()
            .map(|frame| (frame.box_id, frame.morton_nr))
    }

    /// `walk_push(child)`: push current + switch to `child` with
    /// `morton_nr = 0`.
    pub fn push(&mut self, child: usize) {
        debug_assert!((self.stack.len() as u32) < self.tree.max_levels());
        self.stack.push(Frame {
            box_id: child,
            morton_nr: 0,
            level: self.tree.level(child),
        });
    }

    /// `walk_advance()`: increment top-of-stack `morton_nr`; if it reaches
    /// `2^d`, pop. Returns `false` once the stack has emptied (the walk is
    /// over), mirroring the source's `continue_walk` flag.
    pub fn advance(&mut self) -> bool {
        let nchildren = self.tree.nchildren_per_box();
        while let Some(frame) = self.stack.last_mut() {
            frame.morton_nr += 1;
            if frame.morton_nr < nchildren {
                return true;
            }
            self.stack.pop();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::fixtures::split_once_2d;

    #[test]
    fn test_walk_visits_all_four_children_of_root() {
        let tree = split_once_2d();
        let mut walker = Walker::new(&tree, 0);
        let mut visited = Vec::new();
        loop {
            let Some((parent, morton_nr)) = walker.current() else {
                break;
            };
            if let Some(child) = tree.child(parent, morton_nr) {
                visited.push(child);
            }
            if !walker.advance() {
                break;
            }
        }
        visited.sort_unstable();
        assert_eq!(visited, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_walk_can_descend_into_pushed_child() {
        let tree = split_once_2d();
        let mut walker = Walker::new(&tree, 0);
        let (parent, morton_nr) = walker.current().unwrap();
        assert_eq!(parent, 0);
        let child = tree.child(parent, morton_nr).unwrap();
        walker.push(child);
        assert_eq!(walker.current(), Some((child, 0)));
    }
}
