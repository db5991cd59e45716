// Chunk planning
// Partitions the ordered (audio, label) pair list into fixed-size groups so
// the orchestrator never holds more than piece_per_file pairs in memory

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("piece-per-file must be a positive number of pairs (got {0})")]
    InvalidChunkSize(usize),
}

/// One audio recording and its ground-truth label file
pub type PairedPaths = (PathBuf, PathBuf);

/// A contiguous group of (audio, label) pairs processed as one artifact
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// Zero-based ordinal in chunk-processing order
    pub index: usize,

    /// The pairs belonging to this chunk, in original catalogue order
    pub pairs: &'a [PairedPaths],
}

impl<'a> Chunk<'a> {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Plan the chunk boundaries for `pairs` with `size` pairs per chunk.
///
/// Produces `ceil(len / size)` chunks lazily; every chunk except possibly the
/// last has exactly `size` pairs, and concatenating all chunks in order
/// reproduces the input sequence exactly. Deterministic: no shuffling, no
/// randomness, so repeated runs yield identical boundaries.
pub fn plan(
    pairs: &[PairedPaths],
    size: usize,
) -> Result<impl Iterator<Item = Chunk<'_>>, ChunkError> {
    if size == 0 {
        return Err(ChunkError::InvalidChunkSize(size));
    }

    Ok(pairs
        .chunks(size)
        .enumerate()
        .map(|(index, pairs)| Chunk { index, pairs }))
}
