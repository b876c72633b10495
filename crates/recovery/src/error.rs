//! Error types for the recovery protocol.
//!
//! Resolution and dispatch failures are reported as [`RecoveryError`] and
//! propagate synchronously to the caller. Errors raised by the external
//! collaborators (feed handler, transport) are boxed without modification so
//! the original error remains reachable through [`std::error::Error::source`].
//!
//! Failures of the receiving side are reported separately as
//! [`RepairError`](crate::RepairError), since they never reach the sender.

use thiserror::Error;

/// A boxed error from an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for recovery operations
pub type Result<T> = std::result::Result<T, RecoveryError>;

/// Errors that can occur while resolving pinners or dispatching a recovery request.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// The publisher string is not valid hexadecimal.
    #[error("failed to decode publisher: {0}")]
    PublisherDecode(#[from] alloy_primitives::hex::FromHexError),

    /// The publisher bytes do not decompress to a valid secp256k1 public key.
    #[error("failed to decompress public key")]
    PubKey(#[source] k256::elliptic_curve::Error),

    /// The recovery feed lookup failed or did not finish in time.
    #[error("failed to look up recovery feed: {0}")]
    FeedLookup(#[source] BoxError),

    /// The content of the recovery feed could not be retrieved.
    #[error("failed to get content for recovery feed: {0}")]
    FeedContent(#[source] BoxError),

    /// A fallback publisher is configured but the request carries no hash.
    #[error("failed to extract hash from request context")]
    MissingHashContext,

    /// The feed content is not a JSON array of targets.
    #[error("failed to unmarshal targets in recovery feed content: {0}")]
    TargetsDecode(#[from] serde_json::Error),

    /// The recovery feed resolved to an empty set of targets.
    #[error("recovery feed resolved to no targets")]
    NoTargets,

    /// The transport failed to send the recovery message.
    #[error("failed to send recovery message: {0}")]
    Send(#[source] BoxError),
}

impl RecoveryError {
    pub(crate) fn feed_lookup<E: Into<BoxError>>(err: E) -> Self {
        Self::FeedLookup(err.into())
    }

    pub(crate) fn feed_content<E: Into<BoxError>>(err: E) -> Self {
        Self::FeedContent(err.into())
    }

    pub(crate) fn send<E: Into<BoxError>>(err: E) -> Self {
        Self::Send(err.into())
    }

    /// Returns `true` if the error came from the feed lookup or content read.
    pub const fn is_feed_error(&self) -> bool {
        matches!(self, Self::FeedLookup(_) | Self::FeedContent(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, Error)]
    #[error("transport down")]
    struct TransportDown;

    #[test]
    fn test_send_error_keeps_source() {
        let err = RecoveryError::send(TransportDown);
        let source = err.source().expect("send error has a source");
        assert!(source.downcast_ref::<TransportDown>().is_some());
        assert_eq!(
            err.to_string(),
            "failed to send recovery message: transport down"
        );
    }

    #[test]
    fn test_is_feed_error() {
        assert!(RecoveryError::feed_lookup(TransportDown).is_feed_error());
        assert!(RecoveryError::feed_content(TransportDown).is_feed_error());
        assert!(!RecoveryError::MissingHashContext.is_feed_error());
        assert!(!RecoveryError::NoTargets.is_feed_error());
    }
}
