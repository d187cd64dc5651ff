//! Chunked transfers
//!
//! Upload: a reader is cut into chunks that are pushed through a bounded
//! channel feeding the client-streaming `FileUpload` call.
//!
//! Download: the `FileContents` response stream is appended to a sink in
//! arrival order.

use futures::{Stream, StreamExt};
use sirius_core::{read_chunk, ChunkSize, Result};
use sirius_protocol::services::{FileContentsResponse, FileUploadRequest};
use std::future::Future;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tonic::Status;
use tracing::{debug, trace, warn};

/// Chunks buffered between the reader and the RPC body.
pub(crate) const UPLOAD_QUEUE_DEPTH: usize = 2;

/// What the chunk pump pushed into the request stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PumpStats {
    pub chunks: usize,
    pub bytes: u64,
}

/// Read `source` chunk by chunk into `tx` until end of input.
///
/// Stops early, without error, when the receiving side is gone: the call has
/// already finished and its own result is what matters.
pub(crate) async fn pump_chunks<R>(
    source: &mut R,
    chunk_size: ChunkSize,
    tx: &mpsc::Sender<FileUploadRequest>,
) -> std::io::Result<PumpStats>
where
    R: AsyncRead + Unpin,
{
    let mut stats = PumpStats::default();

    while let Some(chunk) = read_chunk(source, chunk_size).await? {
        let len = chunk.len();
        let message = FileUploadRequest {
            chunk_size: chunk.chunk_size.as_i64(),
            bytes: chunk.data.to_vec(),
        };
        if tx.send(message).await.is_err() {
            debug!(chunks = stats.chunks, "Upload stream closed by the call");
            break;
        }
        stats.chunks += 1;
        stats.bytes += len as u64;
        trace!(chunk = stats.chunks, len, "Queued upload chunk");
    }

    Ok(stats)
}

/// Drive a client-streaming upload `call` whose body is fed from `tx`.
///
/// On a local read error the call is dropped while `tx` is still open, so the
/// request stream is reset rather than completed and the server never sees a
/// truncated upload as finished.
pub(crate) async fn drive_upload<F, T, R>(
    call: F,
    mut source: R,
    chunk_size: ChunkSize,
    tx: mpsc::Sender<FileUploadRequest>,
) -> Result<T>
where
    F: Future<Output = std::result::Result<T, Status>>,
    R: AsyncRead + Unpin,
{
    tokio::pin!(call);

    let pumped = {
        let pump = pump_chunks(&mut source, chunk_size, &tx);
        tokio::pin!(pump);

        tokio::select! {
            pumped = &mut pump => pumped,
            early = &mut call => {
                // Server answered before the body was complete (typically a rejection)
                return early.map_err(Into::into);
            }
        }
    };

    match pumped {
        Ok(stats) => {
            debug!(chunks = stats.chunks, bytes = stats.bytes, "Upload body complete");
            // Closing the sender ends the request stream
            drop(tx);
            Ok(call.await?)
        }
        Err(e) => {
            warn!(error = %e, "Reading upload source failed, cancelling call");
            Err(e.into())
        }
    }
}

/// Append every payload of `stream` to `sink`, returning the bytes written.
///
/// The sink is neither flushed nor closed.
pub(crate) async fn write_contents<S, W>(mut stream: S, sink: &mut W) -> Result<u64>
where
    S: Stream<Item = std::result::Result<FileContentsResponse, Status>> + Unpin,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut total_bytes: u64 = 0;
    let mut messages = 0usize;

    while let Some(message) = stream.next().await {
        let message = message?;
        sink.write_all(&message.bytes).await?;
        total_bytes += message.bytes.len() as u64;
        messages += 1;
        trace!(messages, total_bytes, "Wrote download chunk");
    }

    Ok(total_bytes)
}
