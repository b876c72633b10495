//! Feed publishers and their network addresses.
//!
//! A publisher is identified by its hex-encoded compressed secp256k1 public
//! key. The owner of a feed is the account address derived from that key, so
//! resolving a publisher is a pure function of the string.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, hex};
use k256::PublicKey;
use k256::ecdsa::VerifyingKey;

use crate::error::{RecoveryError, Result};

/// Length of a SEC1 compressed public key.
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

/// SEC1 tags of a compressed point with even and odd y coordinate.
const COMPRESSED_TAGS: [u8; 2] = [0x02, 0x03];

/// Resolves a hex-encoded compressed public key to the account address of its owner.
///
/// # Errors
///
/// - [`RecoveryError::PublisherDecode`] if `publisher` is not plain
///   hexadecimal; a `0x` prefix is rejected
/// - [`RecoveryError::PubKey`] if the bytes are not a compressed point on the curve
pub fn resolve_address(publisher: &str) -> Result<Address> {
    if let Some((index, c)) = publisher
        .char_indices()
        .find(|(_, c)| !c.is_ascii_hexdigit())
    {
        return Err(hex::FromHexError::InvalidHexCharacter { c, index }.into());
    }

    let bytes = hex::decode(publisher)?;
    if bytes.len() != COMPRESSED_PUBLIC_KEY_SIZE || !COMPRESSED_TAGS.contains(&bytes[0]) {
        return Err(RecoveryError::PubKey(k256::elliptic_curve::Error));
    }

    let key = PublicKey::from_sec1_bytes(&bytes).map_err(RecoveryError::PubKey)?;
    Ok(Address::from_public_key(&VerifyingKey::from(key)))
}

/// A feed publisher, given as a hex-encoded compressed public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Publisher(String);

impl Publisher {
    /// Creates a publisher from its hex encoding without validating it.
    pub fn new(publisher: impl Into<String>) -> Self {
        Self(publisher.into())
    }

    /// Returns the hex encoding of the publisher key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if no publisher key is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves the account address of this publisher.
    pub fn address(&self) -> Result<Address> {
        resolve_address(&self.0)
    }
}

impl FromStr for Publisher {
    type Err = RecoveryError;

    /// Parses a publisher, rejecting strings that do not resolve to an address.
    fn from_str(s: &str) -> Result<Self> {
        resolve_address(s)?;
        Ok(Self::new(s))
    }
}

impl fmt::Display for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Publisher {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Publisher {
    fn from(s: String) -> Self {
        Self(s)
    }
}
