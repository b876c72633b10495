//! Resolution of the pinners responsible for a chunk.
//!
//! Pinners are published as a JSON array of [`Targets`] in a recovery feed.
//! Resolution consults two feeds at most:
//!
//! 1. the primary feed, topic `RECOVERY`, owned by the publisher named in the
//!    request context;
//! 2. if that fails and a fallback publisher is configured, the content-scoped
//!    feed, topic `RECOVERY_<hash>`, owned by the fallback publisher.
//!
//! A primary feed whose content does not decode as targets is an error in its
//! own right and never falls through to the fallback feed.

use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::{RecoveryError, Result};
use crate::feed::{Feed, FeedHandler, LookupHint, Query};
use crate::publisher::{Publisher, resolve_address};
use crate::{RecoveryConfig, RequestContext, Targets, Topic};

/// Text of the primary recovery feed topic and of the recovery message topic.
pub const RECOVERY_TOPIC_TEXT: &str = "RECOVERY";

/// Upper bound on a single recovery feed lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(100);

/// Returns the topic text of the fallback feed scoped to `hash`.
pub fn fallback_topic_text(hash: &str) -> String {
    format!("{RECOVERY_TOPIC_TEXT}_{hash}")
}

/// Resolves the target pinners of a chunk from its recovery feeds.
#[derive(Debug, Clone)]
pub struct PinnerResolver<F> {
    feeds: F,
    fallback_publisher: Option<Publisher>,
    lookup_timeout: Duration,
}

impl<F: FeedHandler> PinnerResolver<F> {
    /// Creates a resolver reading feeds from `feeds`.
    ///
    /// An empty fallback publisher is treated as no fallback publisher.
    pub fn new(feeds: F, fallback_publisher: Option<Publisher>) -> Self {
        Self {
            feeds,
            fallback_publisher: fallback_publisher.filter(|publisher| !publisher.is_empty()),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Creates a resolver from a [`RecoveryConfig`].
    pub fn from_config(feeds: F, config: RecoveryConfig) -> Self {
        Self::new(feeds, config.fallback_publisher).with_lookup_timeout(config.lookup_timeout)
    }

    /// Sets the upper bound on a single feed lookup.
    #[must_use]
    pub const fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Returns the configured fallback publisher.
    pub const fn fallback_publisher(&self) -> Option<&Publisher> {
        self.fallback_publisher.as_ref()
    }

    /// Returns the upper bound on a single feed lookup.
    pub const fn lookup_timeout(&self) -> Duration {
        self.lookup_timeout
    }

    /// Returns the underlying feed handler.
    pub const fn feeds(&self) -> &F {
        &self.feeds
    }

    /// Resolves the current pinners for the request described by `ctx`.
    ///
    /// # Errors
    ///
    /// - the primary feed error, if the primary feed fails and no fallback
    ///   publisher is configured
    /// - [`RecoveryError::MissingHashContext`] if the primary feed fails, a
    ///   fallback publisher is configured and `ctx` carries no hash
    /// - the fallback feed error, if the fallback feed fails as well
    /// - [`RecoveryError::TargetsDecode`] if the feed content is not a targets array
    pub async fn resolve(&self, ctx: &RequestContext) -> Result<Targets> {
        let primary = self
            .query(
                ctx,
                RECOVERY_TOPIC_TEXT,
                ctx.publisher().unwrap_or_default(),
            )
            .await;

        let content = match primary {
            Ok(content) => content,
            Err(err) => {
                let Some(fallback) = &self.fallback_publisher else {
                    return Err(err);
                };
                let hash = ctx.hash().ok_or(RecoveryError::MissingHashContext)?;
                debug!(%err, %hash, "Primary recovery feed unavailable, trying fallback");

                self.query(ctx, &fallback_topic_text(hash), fallback.as_str())
                    .await?
            }
        };

        Ok(Targets::from_json(&content)?)
    }

    async fn query(&self, ctx: &RequestContext, topic_text: &str, publisher: &str) -> Result<Bytes> {
        let topic = Topic::from_text(topic_text);
        let owner = resolve_address(publisher)?;
        self.feed_content(ctx, Feed::new(topic, owner)).await
    }

    /// Looks up the latest update of `feed` and reads its content.
    async fn feed_content(&self, ctx: &RequestContext, feed: Feed) -> Result<Bytes> {
        let query = Query::latest(feed, LookupHint::NoClue);
        let budget = ctx.budget(self.lookup_timeout);
        if budget.is_zero() {
            return Err(RecoveryError::feed_lookup("request deadline exceeded"));
        }

        match tokio::time::timeout(budget, self.feeds.lookup(&query)).await {
            Ok(Ok(Some(update))) => {
                trace!(%feed, version = update.version, "Found recovery feed update")
            }
            // The feed may still have addressable content without a recorded update.
            Ok(Ok(None)) => debug!(%feed, "Recovery feed has no updates yet"),
            Ok(Err(err)) => return Err(RecoveryError::feed_lookup(err)),
            Err(elapsed) => return Err(RecoveryError::feed_lookup(elapsed)),
        }

        let (version, content) = self
            .feeds
            .content(&feed)
            .await
            .map_err(RecoveryError::feed_content)?;
        trace!(%feed, version, len = content.len(), "Read recovery feed content");

        Ok(content)
    }
}
