//! Transfer chunks
//!
//! Content moves over the wire in bounded chunks. The caller picks the chunk
//! size per transfer; it must be non-zero and strictly below [`MAX_CHUNK_SIZE`].

use bytes::Bytes;
use std::fmt;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Result, SiriusError};

/// Upper bound (exclusive) for a caller-supplied chunk size: 1 MiB
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Chunk size used when the caller does not pick one: 512 KiB
pub const DEFAULT_CHUNK_SIZE: usize = 512 * 1024;

/// A validated chunk size
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkSize(usize);

impl ChunkSize {
    /// Validate a chunk size.
    ///
    /// Sizes equal to or above [`MAX_CHUNK_SIZE`] are rejected, not clamped.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(SiriusError::ChunkSizeZero);
        }
        if size >= MAX_CHUNK_SIZE {
            return Err(SiriusError::ChunkSizeTooLarge {
                size,
                max: MAX_CHUNK_SIZE,
            });
        }
        Ok(Self(size))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Wire representation (`int64` in the schema)
    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self(DEFAULT_CHUNK_SIZE)
    }
}

impl TryFrom<usize> for ChunkSize {
    type Error = SiriusError;

    fn try_from(size: usize) -> Result<Self> {
        Self::new(size)
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bounded piece of file content plus the chunk size that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub data: Bytes,
    pub chunk_size: ChunkSize,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Read the next chunk from `reader`.
///
/// Fills up to `chunk_size` bytes, reading past short reads, so every chunk
/// except the last one is exactly `chunk_size` long. Returns `None` at end of
/// input.
pub async fn read_chunk<R>(reader: &mut R, chunk_size: ChunkSize) -> std::io::Result<Option<Chunk>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(chunk_size.get());
    (&mut *reader)
        .take(chunk_size.get() as u64)
        .read_to_end(&mut buf)
        .await?;

    if buf.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Chunk {
            data: Bytes::from(buf),
            chunk_size,
        }))
    }
}
