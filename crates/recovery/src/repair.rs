//! Re-upload of chunks on behalf of recovery requests.
//!
//! A [`RepairHandler`] is installed on the recovery message topic of a pinning
//! node. For every recovery message it asks the local [`ChunkStore`] to
//! re-upload the named chunk. The store transition runs on a detached task so
//! the transport is never held up by it; the outcome is still observable
//! through the returned [`RepairTask`] and failures are logged.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use strum::{Display, EnumString, IntoStaticStr};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::BoxError;
use crate::{ChunkAddress, Message};

/// State transitions a chunk store can be asked to perform on a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ModeSet {
    /// The chunk was accessed.
    Access,
    /// The chunk was pushed to its neighbourhood.
    SyncPush,
    /// The chunk was pulled by a neighbour.
    SyncPull,
    /// The chunk is pinned locally.
    Pin,
    /// The chunk is no longer pinned locally.
    Unpin,
    /// The chunk is to be uploaded to the network again.
    ReUpload,
}

/// A trait for changing the state of chunks in a local store.
///
/// Requesting [`ModeSet::ReUpload`] for a chunk that is already being
/// re-uploaded, or is already available in the network, must succeed.
pub trait ChunkStore: Send + Sync + 'static {
    /// The error type returned by store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Applies the state transition `mode` to the chunk at `address`.
    fn set(
        &self,
        mode: ModeSet,
        address: ChunkAddress,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Errors that can occur while repairing a chunk.
#[derive(Debug, Error)]
pub enum RepairError {
    /// The message payload is not a chunk address.
    #[error("invalid recovery payload: expected a 32-byte chunk address, got {0} bytes")]
    InvalidPayload(usize),

    /// The store rejected the re-upload.
    #[error("failed to re-upload chunk {address}: {source}")]
    Store {
        /// The chunk that was to be re-uploaded.
        address: ChunkAddress,
        /// The store error.
        #[source]
        source: BoxError,
    },

    /// The repair task panicked or was cancelled.
    #[error("repair task aborted: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

/// Handles inbound recovery messages by re-uploading the named chunk.
#[derive(Debug)]
pub struct RepairHandler<S> {
    store: Arc<S>,
}

impl<S> Clone for RepairHandler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ChunkStore> RepairHandler<S> {
    /// Creates a handler re-uploading chunks to `store`.
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Creates a handler sharing an existing store.
    pub const fn from_arc(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Spawns the re-upload of the chunk named by `message`.
    ///
    /// The caller does not need to await the returned task; dropping it
    /// detaches the re-upload, whose failure is then only logged. Must be
    /// called from within a tokio runtime.
    pub fn handle(&self, message: &Message) -> RepairTask {
        RepairTask(tokio::spawn(reupload(
            Arc::clone(&self.store),
            message.payload.clone(),
        )))
    }
}

async fn reupload<S: ChunkStore>(store: Arc<S>, payload: Bytes) -> Result<ChunkAddress, RepairError> {
    let Ok(address) = ChunkAddress::from_slice(&payload) else {
        warn!(len = payload.len(), "Ignoring recovery message without chunk address");
        return Err(RepairError::InvalidPayload(payload.len()));
    };

    match store.set(ModeSet::ReUpload, address).await {
        Ok(()) => {
            debug!(%address, "Re-upload requested for pinned chunk");
            Ok(address)
        }
        Err(err) => {
            warn!(%address, %err, "Failed to re-upload pinned chunk");
            Err(RepairError::Store {
                address,
                source: err.into(),
            })
        }
    }
}

/// The outcome of a spawned re-upload.
///
/// Resolves to the repaired chunk address once the store has accepted the
/// re-upload.
#[derive(Debug)]
#[must_use = "dropping a repair task detaches it; its failure is only logged"]
pub struct RepairTask(JoinHandle<Result<ChunkAddress, RepairError>>);

impl RepairTask {
    /// Returns `true` if the re-upload has completed.
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }

    /// Detaches the task, leaving it to run to completion in the background.
    pub fn detach(self) {}
}

impl Future for RepairTask {
    type Output = Result<ChunkAddress, RepairError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx).map(|joined| joined?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::RECOVERY_TOPIC_TEXT;
    use crate::{MemoryChunkStore, MessageTopic};
    use alloy_primitives::B256;

    fn recovery_message(address: ChunkAddress) -> Message {
        Message::new(
            MessageTopic::new(RECOVERY_TOPIC_TEXT),
            address.as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_mode_set_names() {
        assert_eq!(ModeSet::ReUpload.to_string(), "re-upload");
        assert_eq!("sync-push".parse::<ModeSet>().unwrap(), ModeSet::SyncPush);
        let name: &'static str = ModeSet::Unpin.into();
        assert_eq!(name, "unpin");
    }

    #[tokio::test]
    async fn test_repair_requests_reupload() {
        let handler = RepairHandler::new(MemoryChunkStore::new());
        let address = ChunkAddress::from(B256::repeat_byte(0xa1));

        let repaired = handler.handle(&recovery_message(address)).await.unwrap();

        assert_eq!(repaired, address);
        assert_eq!(handler.store().calls(), vec![(ModeSet::ReUpload, address)]);
    }

    #[tokio::test]
    async fn test_repeated_delivery_is_not_deduplicated() {
        let handler = RepairHandler::new(MemoryChunkStore::new());
        let address = ChunkAddress::from(B256::repeat_byte(0xa2));
        let message = recovery_message(address);

        handler.handle(&message).await.unwrap();
        handler.handle(&message).await.unwrap();

        assert_eq!(
            handler.store().calls(),
            vec![(ModeSet::ReUpload, address), (ModeSet::ReUpload, address)]
        );
    }

    #[tokio::test]
    async fn test_invalid_payload() {
        let handler = RepairHandler::new(MemoryChunkStore::new());
        let message = Message::new(MessageTopic::new(RECOVERY_TOPIC_TEXT), vec![0u8; 20]);

        let err = handler.handle(&message).await.unwrap_err();

        assert!(matches!(err, RepairError::InvalidPayload(20)));
        assert!(handler.store().calls().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_observable() {
        let store = MemoryChunkStore::new();
        store.fail_with("disk full");
        let handler = RepairHandler::new(store);
        let address = ChunkAddress::from(B256::repeat_byte(0xa3));

        let err = handler.handle(&recovery_message(address)).await.unwrap_err();

        match err {
            RepairError::Store { address: failed, source } => {
                assert_eq!(failed, address);
                assert!(source.to_string().contains("disk full"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_detached_repair_completes() {
        let handler = RepairHandler::new(MemoryChunkStore::new());
        let address = ChunkAddress::from(B256::repeat_byte(0xa4));

        handler.handle(&recovery_message(address)).detach();

        // Yield until the detached task has reached the store.
        for _ in 0..100 {
            if !handler.store().calls().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(handler.store().calls(), vec![(ModeSet::ReUpload, address)]);
    }
}
