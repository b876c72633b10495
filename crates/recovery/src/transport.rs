//! Point-to-point messaging capability.
//!
//! Recovery requests travel as routed messages addressed to a set of
//! [`Targets`]. The transport itself (encryption, routing, delivery) lives
//! outside this crate behind the [`Sender`] trait.

use bytes::Bytes;

use crate::{MessageTopic, Targets};

/// A message as delivered to a handler on the receiving node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The topic the message was sent on.
    pub topic: MessageTopic,
    /// The message payload.
    pub payload: Bytes,
}

impl Message {
    /// Creates a new message.
    pub fn new(topic: MessageTopic, payload: impl Into<Bytes>) -> Self {
        Self {
            topic,
            payload: payload.into(),
        }
    }
}

/// A trait for sending routed messages to a set of targets.
pub trait Sender: Send + Sync {
    /// Handle for observing the delivery of a sent message.
    type Monitor: Send;

    /// The error type returned when sending fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends `payload` on `topic` to the peers matching `targets`.
    fn send(
        &self,
        targets: &Targets,
        topic: MessageTopic,
        payload: Bytes,
    ) -> impl std::future::Future<Output = Result<Self::Monitor, Self::Error>> + Send;
}

impl<T: Sender> Sender for std::sync::Arc<T> {
    type Monitor = T::Monitor;
    type Error = T::Error;

    fn send(
        &self,
        targets: &Targets,
        topic: MessageTopic,
        payload: Bytes,
    ) -> impl std::future::Future<Output = Result<Self::Monitor, Self::Error>> + Send {
        (**self).send(targets, topic, payload)
    }
}
