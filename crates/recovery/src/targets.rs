//! Routing targets for recovery messages.
//!
//! A [`Target`] is an opaque address prefix selecting the class of peers a
//! routed message is delivered to. Recovery feeds publish the current pinners
//! of a chunk as a JSON array of targets, each encoded as a `0x`-prefixed hex
//! string.

use std::ops::Deref;

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

/// An address prefix identifying a class of network peers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(Bytes);

impl Target {
    /// Creates a target from its prefix bytes.
    pub fn new(prefix: impl Into<Bytes>) -> Self {
        Self(prefix.into())
    }

    /// Returns the prefix bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Target {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// The ordered recipient set of a recovery message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Targets(Vec<Target>);

impl Targets {
    /// Creates a target set from its elements.
    pub const fn new(targets: Vec<Target>) -> Self {
        Self(targets)
    }

    /// Decodes the JSON array published in a recovery feed.
    ///
    /// Any content that is not an array of hex strings is rejected as a whole.
    pub fn from_json(content: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(content)
    }

    /// Encodes the targets as the JSON array published in a recovery feed.
    pub fn to_json(&self) -> Vec<u8> {
        // A list of byte strings always serializes.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Returns the targets as a vector.
    pub fn into_inner(self) -> Vec<Target> {
        self.0
    }
}

impl Deref for Targets {
    type Target = [Target];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Target>> for Targets {
    fn from(targets: Vec<Target>) -> Self {
        Self(targets)
    }
}

impl FromIterator<Target> for Targets {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Targets {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
