//! gRPC client for the Sirius file sync service
//!
//! One [`SiriusClient`] owns one channel to one regional endpoint, opened at
//! construction and shared by every call it makes.

use sirius_core::tls::{create_tonic_client_tls, system_roots_tls};
use sirius_core::{region, ChunkSize, Result, SiriusError};
use sirius_protocol::services::{
    FileContentsRequest, FilesListRequest, MountsRequest,
};
use sirius_protocol::SiriusStub;
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, info, instrument, warn};

use crate::config::{ClientConfig, TlsMode};
use crate::listing::FileListing;
use crate::metadata::CallMetadata;
use crate::models::{FileEntry, Mount};
use crate::transfer;

/// Client for one Sirius region, authenticated with one bearer token
#[derive(Clone)]
pub struct SiriusClient {
    /// Resolved endpoint address (`host:port`)
    endpoint: String,
    /// Bearer token attached to every call
    token: String,
    stub: SiriusStub<Channel>,
}

impl SiriusClient {
    /// Connect to the endpoint serving `region` with the default configuration
    pub async fn new(region: &str, token: impl Into<String>) -> Result<Self> {
        Self::with_config(region, token, ClientConfig::default()).await
    }

    /// Connect to the endpoint serving `region`
    #[instrument(skip(token, config))]
    pub async fn with_config(
        region: &str,
        token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let address = config.regions.resolve(region)?.to_string();
        Self::connect(&address, token, &config).await
    }

    /// Connect to an explicit `host:port` (or URL), bypassing region lookup
    pub async fn connect(
        address: &str,
        token: impl Into<String>,
        config: &ClientConfig,
    ) -> Result<Self> {
        let channel = open_channel(address, config).await?;
        Ok(Self::build(channel, address, token.into(), config.max_message_size))
    }

    /// Wrap an already established channel
    pub fn from_channel(channel: Channel, address: &str, token: impl Into<String>) -> Self {
        Self::build(
            channel,
            address,
            token.into(),
            ClientConfig::default().max_message_size,
        )
    }

    fn build(channel: Channel, address: &str, token: String, max_message_size: usize) -> Self {
        let stub = SiriusStub::new(channel)
            .max_decoding_message_size(max_message_size)
            .max_encoding_message_size(max_message_size);
        Self {
            endpoint: address.to_string(),
            token,
            stub,
        }
    }

    /// Endpoint this client is connected to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn metadata(&self, group_id: &str) -> CallMetadata {
        CallMetadata::new(&self.token, group_id)
    }

    /// Mounts visible to the caller for `group_id`.
    ///
    /// The service decides visibility (typically the group and its ancestors).
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn get_mounts(&self, group_id: &str) -> Result<Vec<Mount>> {
        let request = self.metadata(group_id).into_request(MountsRequest {})?;

        let mut stub = self.stub.clone();
        let response = stub.mounts(request).await.map_err(|status| {
            warn!(code = ?status.code(), message = %status.message(), "Mounts RPC failed");
            SiriusError::from(status)
        })?;

        let mounts: Vec<Mount> = response
            .into_inner()
            .mounts
            .into_iter()
            .map(Mount::from)
            .collect();
        debug!(count = mounts.len(), "Received mounts");
        Ok(mounts)
    }

    /// Stream the entries at `path` (relative to the mount root; use `"/"` for the root).
    ///
    /// The call is issued when the listing is first polled.
    pub fn get_files(&self, group_id: &str, mount_id: &str, path: &str) -> FileListing {
        debug!(mount_id = %mount_id, path = %path, "Listing files");

        let request = match self.metadata(group_id).into_request(FilesListRequest {
            mount_id: mount_id.to_string(),
            path: path.to_string(),
        }) {
            Ok(request) => request,
            Err(e) => return FileListing::failed(e),
        };

        let mut stub = self.stub.clone();
        FileListing::new(Box::pin(async move {
            stub.files_list(request)
                .await
                .map(tonic::Response::into_inner)
        }))
    }

    /// Download the file at `path` into `sink`, `chunk_size` bytes per message.
    ///
    /// Returns the number of bytes written. `chunk_size` must be below
    /// [`MAX_CHUNK_SIZE`](sirius_core::MAX_CHUNK_SIZE); it is checked before
    /// anything is sent. Directories and missing paths fail on the server and
    /// come back as [`SiriusError::Transport`]. The sink is not flushed or
    /// closed, and holds whatever arrived before a failure.
    #[instrument(skip(self, sink), fields(endpoint = %self.endpoint))]
    pub async fn download_to_file<W>(
        &self,
        group_id: &str,
        mount_id: &str,
        sink: &mut W,
        path: &str,
        chunk_size: usize,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let chunk_size = ChunkSize::new(chunk_size)?;
        let request = self.metadata(group_id).into_request(FileContentsRequest {
            mount_id: mount_id.to_string(),
            path: path.to_string(),
            chunk_size: chunk_size.as_i64(),
        })?;

        let mut stub = self.stub.clone();
        let stream = stub
            .file_contents(request)
            .await
            .map_err(|status| {
                warn!(code = ?status.code(), message = %status.message(), "FileContents RPC failed");
                SiriusError::from(status)
            })?
            .into_inner();

        let total_bytes = transfer::write_contents(stream, sink).await?;
        debug!(total_bytes, "Successfully wrote download into sink");
        Ok(total_bytes)
    }

    /// Upload `source` to `destination_path` on `mount_id`, `chunk_size` bytes per message.
    ///
    /// `destination_path` is relative to the mount root, e.g. with a mount rooted
    /// at `/data/org/default-my-org`, `uploads/movie.mov` lands in its `uploads`
    /// folder. Returns the metadata of the stored file.
    #[instrument(skip(self, source), fields(endpoint = %self.endpoint))]
    pub async fn upload_file<R>(
        &self,
        group_id: &str,
        mount_id: &str,
        source: R,
        destination_path: &str,
        chunk_size: usize,
    ) -> Result<FileEntry>
    where
        R: AsyncRead + Unpin,
    {
        let chunk_size = ChunkSize::new(chunk_size)?;
        let metadata = self
            .metadata(group_id)
            .with_upload_target(mount_id, destination_path);

        let (tx, rx) = mpsc::channel(transfer::UPLOAD_QUEUE_DEPTH);
        let request = metadata.into_request(ReceiverStream::new(rx))?;

        let mut stub = self.stub.clone();
        let response = transfer::drive_upload(stub.file_upload(request), source, chunk_size, tx)
            .await
            .inspect_err(|e| warn!(error = %e, "FileUpload failed"))?;

        let file = response.into_inner().file.ok_or_else(|| {
            SiriusError::Shape("UploadResponse carries no file metadata".to_string())
        })?;
        let entry = FileEntry::from(file);
        info!(path = %entry.path, size = entry.size, "Upload complete");
        Ok(entry)
    }
}

impl fmt::Debug for SiriusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiriusClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Build and connect the channel for `address`
async fn open_channel(address: &str, config: &ClientConfig) -> Result<Channel> {
    let url = if address.contains("://") {
        address.to_string()
    } else if matches!(config.tls, TlsMode::Disabled) {
        format!("http://{}", address)
    } else {
        format!("https://{}", address)
    };
    debug!(url = %url, "Creating gRPC channel");

    let mut endpoint = Endpoint::from_shared(url)
        .map_err(|e| SiriusError::Configuration(format!("Invalid endpoint {}: {}", address, e)))?
        .connect_timeout(config.connect_timeout)
        .http2_keep_alive_interval(config.keep_alive_interval)
        .keep_alive_timeout(Duration::from_secs(20));

    if let Some(timeout) = config.request_timeout {
        endpoint = endpoint.timeout(timeout);
    }

    let domain = region::host_of(address.rsplit("://").next().unwrap_or(address));
    let tls = match &config.tls {
        TlsMode::SystemRoots => Some(system_roots_tls(domain)),
        TlsMode::Custom(tls_config) => Some(create_tonic_client_tls(tls_config, domain)?),
        TlsMode::Disabled => None,
    };
    if let Some(tls) = tls {
        endpoint = endpoint.tls_config(tls).map_err(|e| {
            SiriusError::Configuration(format!("Failed to configure TLS: {}", e))
        })?;
    }

    let channel = endpoint
        .connect()
        .await
        .map_err(|e| SiriusError::Connect(format!("{}: {}", address, e)))?;

    info!(address = %address, tls = !matches!(config.tls, TlsMode::Disabled), "gRPC connection established");
    Ok(channel)
}
