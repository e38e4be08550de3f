//! Chunked request planner
//!
//! Splits an identifier list into contiguous, order-preserving chunks sized
//! for a bulk lookup endpoint.

use std::iter::FusedIterator;
use std::slice::Chunks;

/// Lazy, restartable sequence of chunks.
///
/// Cloning the plan restarts it from the first chunk.
#[derive(Debug, Clone)]
pub struct ChunkPlan<'a, T> {
    chunks: Chunks<'a, T>,
}

/// Plan chunks of at most `chunk_size` items.
///
/// Yields `ceil(len / chunk_size)` chunks and none for empty input. A chunk
/// size of zero is treated as one.
pub fn plan_chunks<T>(items: &[T], chunk_size: usize) -> ChunkPlan<'_, T> {
    ChunkPlan { chunks: items.chunks(chunk_size.max(1)) }
}

impl<'a, T> Iterator for ChunkPlan<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<T> ExactSizeIterator for ChunkPlan<'_, T> {}

impl<T> FusedIterator for ChunkPlan<'_, T> {}
