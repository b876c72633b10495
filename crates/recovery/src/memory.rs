//! In-memory collaborators for testing and local development.
//!
//! These implementations keep everything in process memory and record how
//! they were used, so that protocol behaviour can be observed without a
//! network, a feed engine or a chunk store.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use crate::feed::{Feed, FeedHandler, FeedUpdate, Query};
use crate::repair::{ChunkStore, ModeSet};
use crate::transport::Sender;
use crate::{ChunkAddress, MessageTopic, Targets};

/// Error type for in-memory feed operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryFeedError {
    /// The feed has no content.
    #[error("feed not found: {0}")]
    NotFound(Feed),
}

#[derive(Debug, Clone)]
struct StoredUpdate {
    timestamp: u64,
    content: Bytes,
}

/// An in-memory feed store.
///
/// Every published update is kept, and every lookup is recorded.
#[derive(Debug, Default)]
pub struct MemoryFeedStore {
    feeds: RwLock<HashMap<Feed, Vec<StoredUpdate>>>,
    queries: Mutex<Vec<Query>>,
}

impl MemoryFeedStore {
    /// Creates an empty feed store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an update to `feed`, returning its version.
    pub fn publish(&self, feed: Feed, content: impl Into<Bytes>) -> u64 {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();

        let mut feeds = self.feeds.write();
        let updates = feeds.entry(feed).or_default();
        updates.push(StoredUpdate {
            timestamp,
            content: content.into(),
        });
        updates.len() as u64 - 1
    }

    /// Returns the queries received so far, oldest first.
    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().clone()
    }
}

impl FeedHandler for MemoryFeedStore {
    type Error = MemoryFeedError;

    async fn lookup(&self, query: &Query) -> Result<Option<FeedUpdate>, Self::Error> {
        self.queries.lock().push(*query);

        let feeds = self.feeds.read();
        let update = feeds.get(query.feed()).and_then(|updates| {
            updates.last().map(|latest| FeedUpdate {
                version: updates.len() as u64 - 1,
                timestamp: latest.timestamp,
            })
        });
        Ok(update)
    }

    async fn content(&self, feed: &Feed) -> Result<(u64, Bytes), Self::Error> {
        let feeds = self.feeds.read();
        feeds
            .get(feed)
            .and_then(|updates| {
                updates
                    .last()
                    .map(|latest| (updates.len() as u64 - 1, latest.content.clone()))
            })
            .ok_or(MemoryFeedError::NotFound(*feed))
    }
}

/// Error type for in-memory transport operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MemorySendError(String);

/// A message recorded by [`MemorySender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// The recipients of the message.
    pub targets: Targets,
    /// The topic the message was sent on.
    pub topic: MessageTopic,
    /// The message payload.
    pub payload: Bytes,
}

/// An in-memory transport recording every message it is asked to send.
///
/// The monitor of a sent message is its index in [`MemorySender::sent`].
#[derive(Debug, Default)]
pub struct MemorySender {
    sent: Mutex<Vec<SentMessage>>,
    failure: Mutex<Option<String>>,
}

impl MemorySender {
    /// Creates a sender with no recorded messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following send fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock() = Some(reason.into());
    }

    /// Returns the messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }
}

impl Sender for MemorySender {
    type Monitor = usize;
    type Error = MemorySendError;

    async fn send(
        &self,
        targets: &Targets,
        topic: MessageTopic,
        payload: Bytes,
    ) -> Result<Self::Monitor, Self::Error> {
        if let Some(reason) = self.failure.lock().clone() {
            return Err(MemorySendError(reason));
        }

        let mut sent = self.sent.lock();
        sent.push(SentMessage {
            targets: targets.clone(),
            topic,
            payload,
        });
        Ok(sent.len() - 1)
    }
}

/// Error type for in-memory chunk store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MemoryStoreError(String);

/// An in-memory chunk store recording every state transition.
///
/// Transitions are idempotent: repeating one for the same chunk succeeds.
#[derive(Debug, Default)]
pub struct MemoryChunkStore {
    calls: Mutex<Vec<(ModeSet, ChunkAddress)>>,
    modes: RwLock<HashMap<ChunkAddress, ModeSet>>,
    failure: Mutex<Option<String>>,
}

impl MemoryChunkStore {
    /// Creates an empty chunk store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following transition fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock() = Some(reason.into());
    }

    /// Returns the transitions requested so far, oldest first.
    pub fn calls(&self) -> Vec<(ModeSet, ChunkAddress)> {
        self.calls.lock().clone()
    }

    /// Returns the last transition applied to `address`.
    pub fn mode(&self, address: &ChunkAddress) -> Option<ModeSet> {
        self.modes.read().get(address).copied()
    }
}

impl ChunkStore for MemoryChunkStore {
    type Error = MemoryStoreError;

    async fn set(&self, mode: ModeSet, address: ChunkAddress) -> Result<(), Self::Error> {
        self.calls.lock().push((mode, address));
        if let Some(reason) = self.failure.lock().clone() {
            return Err(MemoryStoreError(reason));
        }

        self.modes.write().insert(address, mode);
        Ok(())
    }
}
