//! In-process Sirius server for integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use sirius_client::{ClientConfig, SiriusClient};
use sirius_protocol::services::{
    FileContentsRequest, FileContentsResponse, FileUploadRequest, FilesListRequest,
    FilesListResponse, MountsRequest, MountsResponse, UploadResponse,
};
use sirius_protocol::{types, FileKind, Sirius, SiriusServer};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tokio_stream::StreamExt;
use tonic::metadata::MetadataMap;
use tonic::transport::Server;
use tonic::{Code, Request, Response, Status, Streaming};

pub const TOKEN: &str = "T";

/// Metadata seen by the server on one call
#[derive(Debug, Clone, Default)]
pub struct RecordedCall {
    pub rpc: &'static str,
    pub authorization: Option<String>,
    pub active_group: Option<String>,
    pub mount_id: Option<String>,
    pub path: Option<String>,
}

/// What the mock observed, shared with the test
#[derive(Debug, Default)]
pub struct MockState {
    pub calls: Mutex<Vec<RecordedCall>>,
    pub contents_requests: Mutex<Vec<FileContentsRequest>>,
    /// Completed uploads, one entry per call
    pub uploads: Mutex<Vec<Vec<FileUploadRequest>>>,
}

impl MockState {
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }
}

/// Scripted Sirius service
#[derive(Default)]
pub struct MockSirius {
    pub mounts: Vec<types::Mount>,
    pub mounts_error: Option<(Code, &'static str)>,
    pub files: Vec<types::File>,
    /// Sent after every entry of `files`
    pub files_error: Option<(Code, &'static str)>,
    pub contents: Vec<Vec<u8>>,
    /// Sent after every payload of `contents`
    pub contents_error: Option<(Code, &'static str)>,
    pub upload_error: Option<(Code, &'static str)>,
    pub state: Arc<MockState>,
}

impl MockSirius {
    fn record(&self, rpc: &'static str, metadata: &MetadataMap) {
        let get = |key: &str| {
            metadata
                .get(key)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.state.calls.lock().push(RecordedCall {
            rpc,
            authorization: get("authorization"),
            active_group: get("active-group"),
            mount_id: get("mount-id"),
            path: get("path"),
        });
    }
}

#[tonic::async_trait]
impl Sirius for MockSirius {
    async fn mounts(
        &self,
        request: Request<MountsRequest>,
    ) -> Result<Response<MountsResponse>, Status> {
        self.record("Mounts", request.metadata());
        if let Some((code, message)) = self.mounts_error {
            return Err(Status::new(code, message));
        }
        Ok(Response::new(MountsResponse {
            mounts: self.mounts.clone(),
        }))
    }

    type FilesListStream = ReceiverStream<Result<FilesListResponse, Status>>;

    async fn files_list(
        &self,
        request: Request<FilesListRequest>,
    ) -> Result<Response<Self::FilesListStream>, Status> {
        self.record("FilesList", request.metadata());
        let req = request.into_inner();

        let (tx, rx) = mpsc::channel(4);
        let files = self.files.clone();
        let error = self.files_error;
        tokio::spawn(async move {
            for file in files {
                let message = FilesListResponse {
                    path: req.path.clone(),
                    mount_id: req.mount_id.clone(),
                    file: Some(file),
                };
                if tx.send(Ok(message)).await.is_err() {
                    return;
                }
            }
            if let Some((code, message)) = error {
                let _ = tx.send(Err(Status::new(code, message))).await;
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    type FileContentsStream = ReceiverStream<Result<FileContentsResponse, Status>>;

    async fn file_contents(
        &self,
        request: Request<FileContentsRequest>,
    ) -> Result<Response<Self::FileContentsStream>, Status> {
        self.record("FileContents", request.metadata());
        self.state.contents_requests.lock().push(request.into_inner());

        let (tx, rx) = mpsc::channel(4);
        let contents = self.contents.clone();
        let error = self.contents_error;
        tokio::spawn(async move {
            for bytes in contents {
                if tx.send(Ok(FileContentsResponse { bytes })).await.is_err() {
                    return;
                }
            }
            if let Some((code, message)) = error {
                let _ = tx.send(Err(Status::new(code, message))).await;
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn file_upload(
        &self,
        request: Request<Streaming<FileUploadRequest>>,
    ) -> Result<Response<UploadResponse>, Status> {
        self.record("FileUpload", request.metadata());
        let path = request
            .metadata()
            .get("path")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let mount_id = request
            .metadata()
            .get("mount-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if let Some((code, message)) = self.upload_error {
            return Err(Status::new(code, message));
        }

        let mut stream = request.into_inner();
        let mut chunks = Vec::new();
        while let Some(chunk) = stream.next().await {
            chunks.push(chunk?);
        }

        let size: u64 = chunks.iter().map(|c| c.bytes.len() as u64).sum();
        self.state.uploads.lock().push(chunks);

        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Ok(Response::new(UploadResponse {
            file: Some(types::File {
                path,
                name,
                mount_id,
                size,
                r#type: FileKind::File as i32,
            }),
        }))
    }
}

pub fn mount(id: &str, name: &str) -> types::Mount {
    types::Mount {
        id: id.to_string(),
        name: name.to_string(),
        mount_location: format!("/data/group/{}", name.to_lowercase()),
        group_id: "g1".to_string(),
    }
}

pub fn file(path: &str, kind: FileKind, size: u64) -> types::File {
    types::File {
        path: path.to_string(),
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        mount_id: "m1".to_string(),
        size,
        r#type: kind as i32,
    }
}

/// Serve `mock` on an ephemeral local port and connect a client to it
pub async fn start_mock(mock: MockSirius) -> (SiriusClient, Arc<MockState>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = mock.state.clone();

    tokio::spawn(async move {
        Server::builder()
            .add_service(SiriusServer::new(mock))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    let client = SiriusClient::connect(&addr.to_string(), TOKEN, &ClientConfig::insecure())
        .await
        .unwrap();
    (client, state)
}
