//! ## List-of-lists assembler (C8)
//!
//! Assembles a CSR-encoded list-of-lists from many independent producers
//! without any shared mutable state other than the output buffer itself, and
//! without locks. This is the generic engine behind the `_starts`/`_lists`
//! pairs produced by [`crate::peers`], [`crate::area_query`], and
//! [`crate::transpose`].
//!
//! The pattern is a two-pass count/scan/write:
//!
//! 1. **Count**: run `produce` for every item with its callback replaced by a
//!    counter increment.
//! 2. **Scan**: an exclusive prefix sum over the per-item counts yields
//!    `starts[]` and the total output size.
//! 3. **Write**: re-run `produce`, this time writing into the item's own
//!    disjoint slice of the preallocated output buffer.
//!
//! `produce` must be a pure function of its read-only inputs: passes 1 and 2
//! must emit the same sequence for a given `i`, or the write pass will either
//! under- or over-run its slice.

use rayon::prelude::*;

/// Builds a CSR list-of-lists over `n` items by calling `produce(i, emit)`
/// for each `i` in `0..n`, where `emit` appends one value to item `i`'s list.
///
/// Returns `(starts, items)` where `starts.len() == n + 1` and
/// `items[starts[i]..starts[i + 1]]` is item `i`'s list, in the order
/// `produce` emitted it.
pub fn build_csr_lists<T, F>(n: usize, produce: F) -> (Vec<usize>, Vec<T>)
where
    T: Send,
    F: Fn(usize, &mut dyn FnMut(T)) + Sync,
{
    if n == 0 {
        return (vec![0], Vec::new());
    }

    // Pass 1: count.
    let counts: Vec<usize> = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut count = 0usize;
            produce(i, &mut |_value| count += 1);
            count
        })
        .collect();

    // Scan: exclusive prefix sum.
    let mut starts = vec![0usize; n + 1];
    for i in 0..n {
        starts[i + 1] = starts[i] + counts[i];
    }
    let total = starts[n];

    // Pass 2: write. Each work-item owns a disjoint sub-slice of `items`,
    // fixed by the prefix sum computed above, so no two items ever write the
    // same index.
    let mut items: Vec<T> = Vec::with_capacity(total);

    // Wrapper to share the raw pointer across threads. Safe because each
    // parallel task only ever writes inside its own disjoint `[starts[i],
    // starts[i + 1])` range, as established above.
    struct SyncPtr<T>(*mut T);
    #[allow(unsafe_code)]
    unsafe impl<T> Sync for SyncPtr<T> {}

    let base_ptr = SyncPtr(items.as_mut_ptr());
    (0..n).into_par_iter().for_each(|i| {
        let base_ptr = &base_ptr;
        let mut cursor = starts[i];
        produce(i, &mut |value| {
            debug_assert!(cursor < starts[i + 1], "producer emitted more items than counted");
            // SAFETY: `starts` is an exclusive prefix sum over the same
            // per-item counts `produce` will emit again here (producers are
            // pure), so the half-open range
            // `[starts[i], starts[i + 1])` is disjoint across `i` and lies
            // entirely within `items`'s allocated (but not yet
            // length-tracked) capacity. Each parallel task only ever writes
            // inside its own range.
            #[allow(unsafe_code)]
            unsafe {
                base_ptr.0.add(cursor).write(value);
            }
            cursor += 1;
        });
        debug_assert_eq!(cursor, starts[i + 1], "producer emitted fewer items than counted");
    });
    // SAFETY: every index in `0..total` was written exactly once by the loop
    // above (each item's disjoint range was fully covered, asserted in debug
    // builds), so the buffer is fully initialized up to `total`.
    #[allow(unsafe_code)]
    unsafe {
        items.set_len(total);
    }

    (starts, items)
}
