//! Sirius Client SDK
//!
//! Client for the Sirius file sync service:
//! - [`SiriusClient`]: mounts, streamed file listings, chunked download and upload over gRPC
//! - [`DriverClient`]: storage driver management over REST
//!
//! ```no_run
//! # async fn run() -> sirius_core::Result<()> {
//! use futures::StreamExt;
//! use sirius_client::SiriusClient;
//!
//! let client = SiriusClient::new("us-west1", "my-token").await?;
//! for mount in client.get_mounts("my-group").await? {
//!     let mut files = client.get_files("my-group", &mount.id, "/");
//!     while let Some(entry) = files.next().await {
//!         println!("{}", entry?.path);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod drivers;
pub mod listing;
pub mod metadata;
pub mod models;
mod transfer;

pub use client::SiriusClient;
pub use config::{ClientConfig, TlsMode};
pub use drivers::{create_gcs_driver_request, CreateDriverRequest, Driver, DriverClient};
pub use listing::FileListing;
pub use metadata::CallMetadata;
pub use models::{FileEntry, FileType, Mount};
pub use sirius_core::{ChunkSize, Result, SiriusError, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
