//! Row-parallel iteration with a sequential fallback.
//!
//! With the `parallel` feature this re-exports rayon's slice and iterator
//! traits. Without it, stand-ins with the same method names resolve to the
//! standard iterator chain, so call sites compile unchanged.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Sequential stand-in for `rayon::slice::ParallelSliceMut`.
    pub trait ParallelSliceMut<T> {
        /// Calls `chunks_mut` instead of `par_chunks_mut`.
        fn par_chunks_mut(&mut self, chunk_size: usize) -> std::slice::ChunksMut<'_, T>;
    }

    impl<T> ParallelSliceMut<T> for [T] {
        fn par_chunks_mut(&mut self, chunk_size: usize) -> std::slice::ChunksMut<'_, T> {
            self.chunks_mut(chunk_size)
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;

/// Fill `data` row by row, handing each row's index and mutable slice to `f`.
///
/// Rows are disjoint so the result never depends on scheduling.
pub(crate) fn for_each_row<T, F>(data: &mut [T], row_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_len == 0 {
        return;
    }
    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}
