//! Request-scoped parameters of a recovery attempt.

use std::time::Duration;

use tokio::time::Instant;

/// Parameters carried by a single recovery request.
///
/// The `publisher` selects the primary recovery feed, the `hash` scopes the
/// fallback feed to the content being retrieved, and the `deadline` bounds
/// the feed lookup.
///
/// ```
/// use nectar_recovery::RequestContext;
/// use std::time::Duration;
///
/// let ctx = RequestContext::new()
///     .with_publisher("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
///     .with_hash("abc123")
///     .with_timeout(Duration::from_secs(1));
/// assert_eq!(ctx.hash(), Some("abc123"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    publisher: Option<String>,
    hash: Option<String>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Creates an empty context without a deadline.
    pub const fn new() -> Self {
        Self {
            publisher: None,
            hash: None,
            deadline: None,
        }
    }

    /// Sets the publisher of the primary recovery feed.
    #[must_use]
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Sets the content hash used to scope the fallback recovery feed.
    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Sets an absolute deadline for the request.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the publisher of the primary recovery feed.
    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    /// Returns the content hash.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Returns the deadline, if any.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns how long an operation may take, capped at `limit`.
    pub(crate) fn budget(&self, limit: Duration) -> Duration {
        self.deadline.map_or(limit, |deadline| {
            limit.min(deadline.saturating_duration_since(Instant::now()))
        })
    }
}
