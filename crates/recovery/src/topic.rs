//! Topic derivation for feeds and point-to-point messages.
//!
//! A feed [`Topic`] namespaces the updates of a publisher, while a
//! [`MessageTopic`] tells a receiving node which handler a routed message
//! belongs to. Both are 32-byte keccak digests of their text and are pure
//! functions of their inputs.

use std::fmt;

use alloy_primitives::{B256, Keccak256, keccak256};
use thiserror::Error;

/// Length of a topic in bytes
pub const TOPIC_SIZE: usize = 32;

/// Domain byte for topics derived from text only.
const TEXT_DOMAIN: u8 = 0x00;
/// Domain byte for topics derived from text and a related reference.
const RELATED_DOMAIN: u8 = 0x01;

/// Errors that can occur when deriving a topic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopicError {
    /// The related reference is not a 32-byte chunk reference.
    #[error("invalid related content: expected {TOPIC_SIZE} bytes, got {0}")]
    InvalidRelated(usize),
}

/// The namespace of a feed.
///
/// ```
/// use nectar_recovery::Topic;
///
/// let topic = Topic::from_text("RECOVERY");
/// assert_eq!(topic, Topic::new("RECOVERY", None).unwrap());
/// assert_ne!(topic, Topic::new("RECOVERY", Some(&[1u8; 32])).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic(B256);

impl Topic {
    /// Derives a topic from `text` and an optional related chunk reference.
    ///
    /// # Errors
    ///
    /// Returns [`TopicError::InvalidRelated`] if `related` is not exactly
    /// [`TOPIC_SIZE`] bytes long.
    pub fn new(text: &str, related: Option<&[u8]>) -> Result<Self, TopicError> {
        let mut hasher = Keccak256::new();
        match related {
            Some(related) if related.len() != TOPIC_SIZE => {
                return Err(TopicError::InvalidRelated(related.len()));
            }
            Some(related) => {
                hasher.update([RELATED_DOMAIN]);
                hasher.update(related);
            }
            None => hasher.update([TEXT_DOMAIN]),
        }
        hasher.update(text.as_bytes());
        Ok(Self(hasher.finalize()))
    }

    /// Derives a topic from `text` alone.
    pub fn from_text(text: &str) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update([TEXT_DOMAIN]);
        hasher.update(text.as_bytes());
        Self(hasher.finalize())
    }

    /// Returns the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Topic> for B256 {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

impl AsRef<[u8]> for Topic {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// The topic of a routed point-to-point message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageTopic(B256);

impl MessageTopic {
    /// Derives a message topic from its text.
    pub fn new(text: &str) -> Self {
        Self(keccak256(text.as_bytes()))
    }

    /// Returns the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Display for MessageTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<B256> for MessageTopic {
    fn from(value: B256) -> Self {
        Self(value)
    }
}
