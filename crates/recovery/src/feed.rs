//! Feed identifiers and the feed handler capability.
//!
//! A feed is an append-only update stream owned by a single publisher and
//! namespaced by a [`Topic`]. The recovery protocol only ever reads the latest
//! update of a feed; storage and version resolution are delegated to an
//! implementation of [`FeedHandler`].

use std::fmt;

use alloy_primitives::Address;
use bytes::Bytes;

use crate::Topic;

/// A feed, identified by its topic and the address of its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Feed {
    topic: Topic,
    owner: Address,
}

impl Feed {
    /// Creates a new feed identifier.
    pub const fn new(topic: Topic, owner: Address) -> Self {
        Self { topic, owner }
    }

    /// Returns the topic of the feed.
    pub const fn topic(&self) -> Topic {
        self.topic
    }

    /// Returns the address of the feed owner.
    pub const fn owner(&self) -> Address {
        self.owner
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.topic, self.owner)
    }
}

/// Where a lookup starts searching for the latest update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupHint {
    /// Discover the latest update from scratch.
    #[default]
    NoClue,
    /// Resume from a previously known version.
    Version(u64),
}

/// A query for the latest update of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    feed: Feed,
    hint: LookupHint,
}

impl Query {
    /// Creates a query for the latest update of `feed`.
    pub const fn latest(feed: Feed, hint: LookupHint) -> Self {
        Self { feed, hint }
    }

    /// Returns the queried feed.
    pub const fn feed(&self) -> &Feed {
        &self.feed
    }

    /// Returns the lookup hint.
    pub const fn hint(&self) -> LookupHint {
        self.hint
    }
}

/// The latest update located by a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedUpdate {
    /// Version of the update within the feed.
    pub version: u64,
    /// Time the update was published, in seconds since the Unix epoch.
    pub timestamp: u64,
}

/// A trait for looking up feeds and reading their content.
///
/// Implementations may resolve feeds from local storage or by querying the
/// network. `lookup` is expected to be cancellation-safe: callers bound it
/// with a timeout and drop the future when it elapses.
pub trait FeedHandler: Send + Sync {
    /// The error type returned by feed operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Locates the latest update of the queried feed.
    ///
    /// Returns `None` if the feed has no recorded update yet.
    fn lookup(
        &self,
        query: &Query,
    ) -> impl std::future::Future<Output = Result<Option<FeedUpdate>, Self::Error>> + Send;

    /// Returns the version and content currently addressable for `feed`.
    fn content(
        &self,
        feed: &Feed,
    ) -> impl std::future::Future<Output = Result<(u64, Bytes), Self::Error>> + Send;
}

impl<T: FeedHandler> FeedHandler for std::sync::Arc<T> {
    type Error = T::Error;

    fn lookup(
        &self,
        query: &Query,
    ) -> impl std::future::Future<Output = Result<Option<FeedUpdate>, Self::Error>> + Send {
        (**self).lookup(query)
    }

    fn content(
        &self,
        feed: &Feed,
    ) -> impl std::future::Future<Output = Result<(u64, Bytes), Self::Error>> + Send {
        (**self).content(feed)
    }
}
