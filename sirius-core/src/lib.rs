//! Sirius Core Library
//!
//! Core abstractions shared by the Sirius file sync client crates:
//! - Unified error type
//! - Region label to endpoint resolution
//! - Chunk size rules and the chunk reader used for uploads
//! - TLS configuration helpers for tonic

pub mod chunk;
pub mod error;
pub mod region;
pub mod tls;

pub use chunk::{read_chunk, Chunk, ChunkSize, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
pub use error::{Result, SiriusError};
pub use region::{RegionTable, BUILTIN_REGIONS};
pub use tls::TlsClientConfig;
