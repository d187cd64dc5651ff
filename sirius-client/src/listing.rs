//! Lazy file listing
//!
//! [`FileListing`] yields one [`FileEntry`] per message of the server-streaming
//! `FilesList` call. Any failure, including failing to open the call, is
//! yielded exactly once as the final item.

use futures::future::BoxFuture;
use futures::stream::{FusedStream, Stream};
use sirius_core::{Result, SiriusError};
use sirius_protocol::services::FilesListResponse;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tonic::{Status, Streaming};
use tracing::{debug, warn};

use crate::models::FileEntry;

pub(crate) type OpenListing =
    BoxFuture<'static, std::result::Result<Streaming<FilesListResponse>, Status>>;

enum ListingState {
    /// Call not yet answered
    Opening(OpenListing),
    Receiving(Streaming<FilesListResponse>),
    /// Failed before the call could be issued
    Failed(SiriusError),
    Done,
}

/// Finite, non-restartable stream of the entries under a path.
///
/// Entries are decoded as they arrive; nothing is buffered beyond what the
/// transport holds in flight.
#[must_use = "streams do nothing unless polled"]
pub struct FileListing {
    state: ListingState,
    received: usize,
}

impl FileListing {
    pub(crate) fn new(open: OpenListing) -> Self {
        Self {
            state: ListingState::Opening(open),
            received: 0,
        }
    }

    pub(crate) fn failed(error: SiriusError) -> Self {
        Self {
            state: ListingState::Failed(error),
            received: 0,
        }
    }

    /// Entries yielded so far
    pub fn received(&self) -> usize {
        self.received
    }

    fn finish(&mut self, error: SiriusError) -> SiriusError {
        warn!(received = self.received, error = %error, "File listing failed");
        self.state = ListingState::Done;
        error
    }
}

impl Stream for FileListing {
    type Item = Result<FileEntry>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            match &mut this.state {
                ListingState::Opening(open) => match ready!(open.as_mut().poll(cx)) {
                    Ok(stream) => this.state = ListingState::Receiving(stream),
                    Err(status) => return Poll::Ready(Some(Err(this.finish(status.into())))),
                },
                ListingState::Receiving(stream) => {
                    let next = ready!(Pin::new(stream).poll_next(cx));
                    let item = match next {
                        Some(Ok(message)) => match FileEntry::try_from(message) {
                            Ok(entry) => {
                                this.received += 1;
                                Some(Ok(entry))
                            }
                            Err(e) => Some(Err(this.finish(e))),
                        },
                        Some(Err(status)) => Some(Err(this.finish(status.into()))),
                        None => {
                            debug!(received = this.received, "File listing complete");
                            this.state = ListingState::Done;
                            None
                        }
                    };
                    return Poll::Ready(item);
                }
                ListingState::Failed(_) => {
                    if let ListingState::Failed(error) =
                        std::mem::replace(&mut this.state, ListingState::Done)
                    {
                        return Poll::Ready(Some(Err(error)));
                    }
                }
                ListingState::Done => return Poll::Ready(None),
            }
        }
    }
}

impl FusedStream for FileListing {
    fn is_terminated(&self) -> bool {
        matches!(self.state, ListingState::Done)
    }
}
