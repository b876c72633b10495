//! Dispatch of recovery requests for missing pinned chunks.

use bytes::Bytes;
use tracing::debug;

use crate::error::{RecoveryError, Result};
use crate::feed::FeedHandler;
use crate::publisher::Publisher;
use crate::resolver::{PinnerResolver, RECOVERY_TOPIC_TEXT};
use crate::transport::Sender;
use crate::{ChunkAddress, MessageTopic, RecoveryConfig, RequestContext};

/// Returns the topic recovery messages are sent on.
pub fn recovery_topic() -> MessageTopic {
    MessageTopic::new(RECOVERY_TOPIC_TEXT)
}

/// Asks the pinners of a chunk to re-upload it.
///
/// Invoked once for every pinned chunk that could not be retrieved. Each call
/// resolves the current pinners from the recovery feeds and sends them a
/// single recovery message carrying the chunk address. Nothing is retried.
///
/// # Example
///
/// ```
/// use nectar_recovery::{
///     ChunkAddress, Feed, MemoryFeedStore, MemorySender, Publisher, RecoveryHook,
///     RequestContext, Target, Targets, Topic, fallback_topic_text, resolve_address,
/// };
/// use alloy_primitives::B256;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let fallback = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
/// let root_hash = "ab".repeat(32);
///
/// // Pinners of this content are announced in the fallback publisher's feed
/// let feeds = MemoryFeedStore::new();
/// let feed = Feed::new(
///     Topic::from_text(&fallback_topic_text(&root_hash)),
///     resolve_address(fallback).unwrap(),
/// );
/// feeds.publish(feed, Targets::new(vec![Target::new(vec![0x07])]).to_json());
///
/// let hook = RecoveryHook::new(MemorySender::new(), feeds, Some(Publisher::new(fallback)));
/// let ctx = RequestContext::new().with_hash(root_hash);
/// let address = ChunkAddress::from(B256::repeat_byte(0x01));
///
/// let monitor = hook.recover(&ctx, address).await.unwrap();
/// assert_eq!(monitor, 0);
/// assert_eq!(hook.sender().sent().len(), 1);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct RecoveryHook<S, F> {
    sender: S,
    resolver: PinnerResolver<F>,
    topic: MessageTopic,
}

impl<S: Sender, F: FeedHandler> RecoveryHook<S, F> {
    /// Creates a hook sending through `sender` to pinners resolved from `feeds`.
    pub fn new(sender: S, feeds: F, fallback_publisher: Option<Publisher>) -> Self {
        Self::with_resolver(sender, PinnerResolver::new(feeds, fallback_publisher))
    }

    /// Creates a hook from a [`RecoveryConfig`].
    pub fn from_config(sender: S, feeds: F, config: RecoveryConfig) -> Self {
        Self::with_resolver(sender, PinnerResolver::from_config(feeds, config))
    }

    /// Creates a hook using an existing resolver.
    pub fn with_resolver(sender: S, resolver: PinnerResolver<F>) -> Self {
        Self {
            sender,
            resolver,
            topic: recovery_topic(),
        }
    }

    /// Returns the pinner resolver.
    pub const fn resolver(&self) -> &PinnerResolver<F> {
        &self.resolver
    }

    /// Returns the message sender.
    pub const fn sender(&self) -> &S {
        &self.sender
    }

    /// Resolves the pinners of `address` and sends them a recovery request.
    ///
    /// Returns the transport's delivery monitor for the sent message.
    ///
    /// # Errors
    ///
    /// - any [`PinnerResolver::resolve`] error, unchanged
    /// - [`RecoveryError::NoTargets`] if the recovery feed lists no pinners
    /// - [`RecoveryError::Send`] wrapping the transport error
    pub async fn recover(&self, ctx: &RequestContext, address: ChunkAddress) -> Result<S::Monitor> {
        let targets = self.resolver.resolve(ctx).await?;
        if targets.is_empty() {
            return Err(RecoveryError::NoTargets);
        }

        debug!(%address, targets = targets.len(), "Dispatching recovery request");
        let payload = Bytes::copy_from_slice(address.as_bytes());
        self.sender
            .send(&targets, self.topic, payload)
            .await
            .map_err(RecoveryError::send)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::tests::{Lookup, StubFeeds, fallback_feed, keys, primary_feed};
    use crate::{MemorySender, Target, Targets};
    use alloy_primitives::B256;
    use std::error::Error as _;

    fn address() -> ChunkAddress {
        ChunkAddress::from(B256::repeat_byte(0x5c))
    }

    #[tokio::test]
    async fn test_recover_sends_once() {
        let keys = keys();
        let feeds = StubFeeds::default().with(
            primary_feed(&keys.primary),
            Lookup::Found,
            Some(br#"["0x0a","0x0b0c"]"#),
        );
        let hook = RecoveryHook::new(MemorySender::new(), feeds, None);

        let ctx = RequestContext::new().with_publisher(keys.primary.as_str());
        let monitor = hook.recover(&ctx, address()).await.unwrap();

        let sent = hook.sender().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(monitor, 0);
        assert_eq!(sent[0].topic, MessageTopic::new("RECOVERY"));
        assert_eq!(sent[0].payload.as_ref(), address().as_bytes());
        assert_eq!(
            sent[0].targets,
            Targets::new(vec![Target::new(vec![0x0a]), Target::new(vec![0x0b, 0x0c])])
        );
    }

    #[tokio::test]
    async fn test_recover_through_fallback() {
        let keys = keys();
        let feeds = StubFeeds::default().with(
            fallback_feed(&keys.fallback, "abc123"),
            Lookup::Found,
            Some(br#"["0xfa"]"#),
        );
        let hook = RecoveryHook::new(
            MemorySender::new(),
            feeds,
            Some(Publisher::new(keys.fallback.as_str())),
        );

        let ctx = RequestContext::new()
            .with_publisher(keys.primary.as_str())
            .with_hash("abc123");
        hook.recover(&ctx, address()).await.unwrap();

        let sent = hook.sender().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].targets[0].as_bytes(), &[0xfa]);
    }

    #[tokio::test]
    async fn test_resolution_error_is_not_sent() {
        let keys = keys();
        let hook = RecoveryHook::new(
            MemorySender::new(),
            StubFeeds::default(),
            Some(Publisher::new(keys.fallback.as_str())),
        );

        let ctx = RequestContext::new().with_publisher(keys.primary.as_str());
        let err = hook.recover(&ctx, address()).await.unwrap_err();

        assert!(matches!(err, RecoveryError::MissingHashContext));
        assert!(hook.sender().sent().is_empty());
    }

    #[tokio::test]
    async fn test_empty_targets_are_not_sent() {
        let keys = keys();
        let feeds =
            StubFeeds::default().with(primary_feed(&keys.primary), Lookup::Found, Some(b"[]"));
        let hook = RecoveryHook::new(MemorySender::new(), feeds, None);

        let ctx = RequestContext::new().with_publisher(keys.primary.as_str());
        let err = hook.recover(&ctx, address()).await.unwrap_err();

        assert!(matches!(err, RecoveryError::NoTargets));
        assert!(hook.sender().sent().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let keys = keys();
        let feeds = StubFeeds::default().with(
            primary_feed(&keys.primary),
            Lookup::Found,
            Some(br#"["0x0a"]"#),
        );
        let sender = MemorySender::new();
        sender.fail_with("no route to targets");
        let hook = RecoveryHook::new(sender, feeds, None);

        let ctx = RequestContext::new().with_publisher(keys.primary.as_str());
        let err = hook.recover(&ctx, address()).await.unwrap_err();

        assert!(matches!(err, RecoveryError::Send(_)));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "no route to targets");
    }

    #[test]
    fn test_recovery_topic() {
        assert_eq!(recovery_topic(), MessageTopic::new("RECOVERY"));
    }
}
