//! Fixed-duration chunk segmentation.
//!
//! Partitions an audio stream's time range into contiguous windows that
//! are transcribed independently and reassembled in order.

/// A contiguous `[start_ms, end_ms)` sub-range of an audio stream.
///
/// Chunks are produced in increasing start order, do not overlap, and
/// collectively cover the full duration. The final chunk may be shorter
/// than the nominal chunk length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk within its stream, starting at 0.
    pub index: usize,
    /// Start offset in milliseconds, inclusive.
    pub start_ms: u64,
    /// End offset in milliseconds, exclusive.
    pub end_ms: u64,
}

impl Chunk {
    /// Duration of this chunk in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Start offset in seconds, for ffmpeg arguments.
    pub fn start_seconds(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    /// Duration in seconds, for ffmpeg arguments.
    pub fn duration_seconds(&self) -> f64 {
        self.duration_ms() as f64 / 1000.0
    }
}

/// Partition `[0, duration_ms)` into chunks of `chunk_length_ms`.
///
/// The last chunk is truncated to the remaining duration. A zero
/// duration yields an empty vector. `chunk_length_ms` must be positive;
/// it is validated when the pipeline configuration is built.
pub fn segment(duration_ms: u64, chunk_length_ms: u64) -> Vec<Chunk> {
    debug_assert!(chunk_length_ms > 0);

    let mut chunks = Vec::new();
    let mut start_ms = 0;
    let mut index = 0;

    while start_ms < duration_ms {
        let end_ms = (start_ms + chunk_length_ms).min(duration_ms);
        chunks.push(Chunk {
            index,
            start_ms,
            end_ms,
        });
        start_ms = end_ms;
        index += 1;
    }

    chunks
}
