//! Integration tests for SiriusClient against an in-process server

mod common;

use common::{file, mount, start_mock, MockSirius, TOKEN};
use futures::StreamExt;
use sirius_client::{FileType, SiriusError, MAX_CHUNK_SIZE};
use sirius_protocol::FileKind;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;
use tonic::Code;

#[tokio::test]
async fn test_get_mounts() {
    let (client, state) = start_mock(MockSirius {
        mounts: vec![mount("m1", "Home"), mount("m2", "Org")],
        ..Default::default()
    })
    .await;

    let mounts = client.get_mounts("g1").await.unwrap();
    assert_eq!(mounts.len(), 2);
    assert_eq!(mounts[0].id, "m1");
    assert_eq!(mounts[1].name, "Org");
    assert_eq!(mounts[1].mount_location, "/data/group/org");

    let call = state.last_call().unwrap();
    assert_eq!(call.rpc, "Mounts");
    assert_eq!(call.authorization.as_deref(), Some("bearer: T"));
    assert_eq!(call.active_group.as_deref(), Some("g1"));
    assert_eq!(call.mount_id, None);
}

#[tokio::test]
async fn test_get_mounts_failure() {
    let (client, _state) = start_mock(MockSirius {
        mounts_error: Some((Code::Unauthenticated, "token expired")),
        ..Default::default()
    })
    .await;

    let err = client.get_mounts("g1").await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.code(), Some(Code::Unauthenticated));
}

#[tokio::test]
async fn test_empty_listing() {
    let (client, state) = start_mock(MockSirius::default()).await;

    let mut listing = client.get_files("g1", "m1", "/");
    assert!(listing.next().await.is_none());
    assert_eq!(listing.received(), 0);
    assert_eq!(state.last_call().unwrap().rpc, "FilesList");
}

#[tokio::test]
async fn test_listing_is_lazy() {
    let (client, state) = start_mock(MockSirius::default()).await;

    let listing = client.get_files("g1", "m1", "/");
    drop(listing);
    assert_eq!(state.call_count(), 0);
}

#[tokio::test]
async fn test_listing_entries() {
    let (client, _state) = start_mock(MockSirius {
        files: vec![
            file("renders", FileKind::Directory, 0),
            file("notes.txt", FileKind::File, 12),
            file("shot_010.####.exr", FileKind::Sequence, 4096),
        ],
        ..Default::default()
    })
    .await;

    let entries: Vec<_> = client
        .get_files("g1", "m1", "/")
        .map(|entry| entry.unwrap())
        .collect()
        .await;

    assert_eq!(entries.len(), 3);
    assert!(entries[0].is_dir());
    assert_eq!(entries[1].size, 12);
    assert_eq!(entries[2].file_type, FileType::Sequence);
}

#[tokio::test]
async fn test_listing_failure_after_entries() {
    let (client, _state) = start_mock(MockSirius {
        files: vec![
            file("a.txt", FileKind::File, 1),
            file("b.txt", FileKind::File, 2),
        ],
        files_error: Some((Code::Internal, "index unavailable")),
        ..Default::default()
    })
    .await;

    let items: Vec<_> = client.get_files("g1", "m1", "/").collect().await;
    assert_eq!(items.len(), 3);
    assert!(items[0].is_ok());
    assert!(items[1].is_ok());
    assert_eq!(items[2].as_ref().unwrap_err().code(), Some(Code::Internal));
}

#[tokio::test]
async fn test_download_writes_in_order() {
    let (client, state) = start_mock(MockSirius {
        contents: vec![b"first ".to_vec(), b"second ".to_vec(), b"third".to_vec()],
        ..Default::default()
    })
    .await;

    let mut sink = Vec::new();
    let total = client
        .download_to_file("g1", "m1", &mut sink, "docs/a.txt", 6)
        .await
        .unwrap();

    assert_eq!(total, 18);
    assert_eq!(sink, b"first second third");

    let requests = state.contents_requests.lock();
    assert_eq!(requests[0].mount_id, "m1");
    assert_eq!(requests[0].path, "docs/a.txt");
    assert_eq!(requests[0].chunk_size, 6);
}

#[tokio::test]
async fn test_download_into_file() {
    let (client, _state) = start_mock(MockSirius {
        contents: vec![vec![1u8; 1000], vec![2u8; 24]],
        ..Default::default()
    })
    .await;

    let dir = TempDir::new().unwrap();
    let target = dir.path().join("out.bin");
    let mut sink = tokio::fs::File::create(&target).await.unwrap();
    let total = client
        .download_to_file("g1", "m1", &mut sink, "blob.bin", 1000)
        .await
        .unwrap();
    drop(sink);

    assert_eq!(total, 1024);
    assert_eq!(tokio::fs::read(&target).await.unwrap().len(), 1024);
}

#[tokio::test]
async fn test_download_failure_keeps_partial_output() {
    let (client, _state) = start_mock(MockSirius {
        contents: vec![b"partial".to_vec()],
        contents_error: Some((Code::NotFound, "is a directory")),
        ..Default::default()
    })
    .await;

    let mut sink = Vec::new();
    let err = client
        .download_to_file("g1", "m1", &mut sink, "renders", 1024)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(Code::NotFound));
    assert_eq!(sink, b"partial");
}

#[tokio::test]
async fn test_chunk_size_rejected_before_any_call() {
    let (client, state) = start_mock(MockSirius::default()).await;

    let mut sink = Vec::new();
    let err = client
        .download_to_file("g1", "m1", &mut sink, "a.txt", MAX_CHUNK_SIZE)
        .await
        .unwrap_err();
    assert!(matches!(err, SiriusError::ChunkSizeTooLarge { .. }));

    let err = client
        .upload_file("g1", "m1", &b"data"[..], "a.txt", MAX_CHUNK_SIZE + 1)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = client
        .upload_file("g1", "m1", &b"data"[..], "a.txt", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, SiriusError::ChunkSizeZero));

    assert_eq!(state.call_count(), 0);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_upload_chunks_and_metadata() {
    let (client, state) = start_mock(MockSirius::default()).await;

    let data: Vec<u8> = (0..2500u32).map(|i| (i % 251) as u8).collect();
    let entry = client
        .upload_file("g1", "m1", &data[..], "uploads/movie.mov", 1000)
        .await
        .unwrap();

    assert_eq!(entry.path, "uploads/movie.mov");
    assert_eq!(entry.name, "movie.mov");
    assert_eq!(entry.size, 2500);

    let uploads = state.uploads.lock();
    let chunks = &uploads[0];
    assert_eq!(
        chunks.iter().map(|c| c.bytes.len()).collect::<Vec<_>>(),
        vec![1000, 1000, 500]
    );
    assert!(chunks.iter().all(|c| c.chunk_size == 1000));
    let joined: Vec<u8> = chunks.iter().flat_map(|c| c.bytes.clone()).collect();
    assert_eq!(joined, data);

    let call = state.last_call().unwrap();
    assert_eq!(call.rpc, "FileUpload");
    assert_eq!(call.authorization, Some(format!("bearer: {}", TOKEN)));
    assert_eq!(call.active_group.as_deref(), Some("g1"));
    assert_eq!(call.mount_id.as_deref(), Some("m1"));
    assert_eq!(call.path.as_deref(), Some("uploads/movie.mov"));
}

#[tokio::test]
async fn test_upload_empty_source() {
    let (client, state) = start_mock(MockSirius::default()).await;

    let entry = client
        .upload_file("g1", "m1", tokio::io::empty(), "empty.txt", 64)
        .await
        .unwrap();

    assert_eq!(entry.size, 0);
    assert_eq!(state.call_count(), 1);
    assert!(state.uploads.lock()[0].is_empty());
}

#[tokio::test]
async fn test_upload_from_file() {
    let (client, state) = start_mock(MockSirius::default()).await;

    let dir = TempDir::new().unwrap();
    let source_path = dir.path().join("in.bin");
    tokio::fs::write(&source_path, vec![9u8; 3000]).await.unwrap();
    let source = tokio::fs::File::open(&source_path).await.unwrap();

    let entry = client
        .upload_file("g1", "m1", source, "in.bin", 1024)
        .await
        .unwrap();
    assert_eq!(entry.size, 3000);
    assert_eq!(state.uploads.lock()[0].len(), 3);
}

#[tokio::test]
async fn test_upload_rejected_by_server() {
    let (client, state) = start_mock(MockSirius {
        upload_error: Some((Code::PermissionDenied, "read-only mount")),
        ..Default::default()
    })
    .await;

    let err = client
        .upload_file("g1", "m1", &[5u8; 100][..], "a.bin", 10)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(Code::PermissionDenied));
    assert!(state.uploads.lock().is_empty());
}

#[tokio::test]
async fn test_upload_source_failure() {
    let (client, _state) = start_mock(MockSirius::default()).await;

    // Fails once the first 10 bytes are consumed
    let source = (&[1u8; 10][..]).chain(FailingReader);
    let err = client
        .upload_file("g1", "m1", source, "a.bin", 4)
        .await
        .unwrap_err();
    assert!(matches!(err, SiriusError::Io(_)));
}

struct FailingReader;

impl tokio::io::AsyncRead for FailingReader {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Err(std::io::Error::other("device removed")))
    }
}

#[tokio::test]
async fn test_client_is_reusable() {
    let (client, state) = start_mock(MockSirius {
        mounts: vec![mount("m1", "Home")],
        ..Default::default()
    })
    .await;

    let other = client.clone();
    let (a, b) = tokio::join!(client.get_mounts("g1"), other.get_mounts("g2"));
    assert_eq!(a.unwrap().len(), 1);
    assert_eq!(b.unwrap().len(), 1);
    assert_eq!(state.call_count(), 2);
}
