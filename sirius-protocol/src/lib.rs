//! Sirius Protocol Definitions
//!
//! Generated Rust code from Protocol Buffers.
//!
//! # Services
//! - `Sirius` - Mounts, file listing, chunked download and upload

/// Shared message types (mounts, files)
pub mod types {
    tonic::include_proto!("sirius.types");
}

/// Sirius service messages and client/server
pub mod services {
    tonic::include_proto!("sirius.services");
}

// Re-export commonly used types
pub use services::sirius_client::SiriusClient as SiriusStub;
pub use services::sirius_server::{Sirius, SiriusServer};
pub use types::file::Type as FileKind;
pub use types::{File, Mount};
