//! Recovery of globally pinned chunks for Ethereum Swarm.
//!
//! When a pinned chunk cannot be retrieved, the node asks the peers that pin
//! it to upload it into the network again. This crate implements both sides
//! of that exchange:
//!
//! - [`RecoveryHook`]: resolves the current pinners of a chunk from its
//!   recovery feeds ([`PinnerResolver`]) and sends them a recovery message.
//! - [`RepairHandler`]: reacts to an inbound recovery message by asking the
//!   local [`ChunkStore`] to re-upload the chunk.
//!
//! The feed engine, the messaging transport and the chunk store are external
//! collaborators, abstracted as the [`FeedHandler`], [`Sender`] and
//! [`ChunkStore`] traits. In-memory implementations live in [`memory`].
//!
//! ## Usage Examples
//!
//! ```
//! use nectar_recovery::{
//!     ChunkAddress, Feed, MemoryChunkStore, MemoryFeedStore, MemorySender, Message,
//!     RecoveryHook, RepairHandler, RequestContext, Target, Targets, Topic, recovery_topic,
//!     resolve_address,
//! };
//! use alloy_primitives::B256;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let publisher = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
//!
//! // The publisher announces the pinners in its recovery feed
//! let feeds = MemoryFeedStore::new();
//! let feed = Feed::new(Topic::from_text("RECOVERY"), resolve_address(publisher).unwrap());
//! feeds.publish(feed, Targets::new(vec![Target::new(vec![0x2a])]).to_json());
//!
//! // A node missing a pinned chunk asks the pinners to re-upload it
//! let hook = RecoveryHook::new(MemorySender::new(), feeds, None);
//! let address = ChunkAddress::from(B256::repeat_byte(0x11));
//! let ctx = RequestContext::new().with_publisher(publisher);
//! hook.recover(&ctx, address).await.unwrap();
//!
//! // A pinner receiving the message re-uploads the chunk
//! let repair = RepairHandler::new(MemoryChunkStore::new());
//! let sent = &hook.sender().sent()[0];
//! let message = Message::new(recovery_topic(), sent.payload.clone());
//! assert_eq!(repair.handle(&message).await.unwrap(), address);
//! # });
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod address;
mod config;
mod context;
pub mod error;
mod feed;
mod hook;
pub mod memory;
pub mod pricing;
mod publisher;
mod repair;
mod resolver;
mod targets;
mod topic;
mod transport;

// Core types
pub use address::{CHUNK_ADDRESS_SIZE, ChunkAddress};
pub use context::RequestContext;
pub use error::{BoxError, RecoveryError, Result};
pub use publisher::{COMPRESSED_PUBLIC_KEY_SIZE, Publisher, resolve_address};
pub use targets::{Target, Targets};
pub use topic::{MessageTopic, TOPIC_SIZE, Topic, TopicError};

// Configuration
pub use config::RecoveryConfig;

// Feeds
pub use feed::{Feed, FeedHandler, FeedUpdate, LookupHint, Query};
pub use resolver::{
    DEFAULT_LOOKUP_TIMEOUT, PinnerResolver, RECOVERY_TOPIC_TEXT, fallback_topic_text,
};

// Dispatch and repair
pub use hook::{RecoveryHook, recovery_topic};
pub use repair::{ChunkStore, ModeSet, RepairError, RepairHandler, RepairTask};
pub use transport::{Message, Sender};

// In-memory collaborators
pub use memory::{
    MemoryChunkStore, MemoryFeedError, MemoryFeedStore, MemorySendError, MemorySender,
    MemoryStoreError, SentMessage,
};
