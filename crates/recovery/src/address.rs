//! Chunk address implementation
//!
//! This module provides the [`ChunkAddress`] type, the 32-byte content-derived
//! identifier of a chunk. The recovery protocol treats it as an opaque key: it
//! is carried verbatim as the payload of a recovery message and handed back to
//! the chunk store on the receiving side.
//!
//! ## Example Usage
//!
//! ```
//! use nectar_recovery::ChunkAddress;
//! use alloy_primitives::B256;
//!
//! let address = ChunkAddress::from(B256::repeat_byte(0xaa));
//! let decoded = ChunkAddress::from_slice(address.as_bytes()).unwrap();
//! assert_eq!(address, decoded);
//!
//! // Payloads of the wrong length are rejected
//! assert!(ChunkAddress::from_slice(&[0u8; 31]).is_err());
//! ```

use std::fmt;
use std::ops::Deref;

use alloy_primitives::{B256, hex};

/// Length of a chunk address in bytes
pub const CHUNK_ADDRESS_SIZE: usize = 32;

/// A 256-bit address of a chunk in the Swarm network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkAddress(pub B256);

impl ChunkAddress {
    /// Creates a new ChunkAddress from raw bytes
    pub const fn new(bytes: [u8; CHUNK_ADDRESS_SIZE]) -> Self {
        Self(B256::new(bytes))
    }

    /// Returns the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Creates a new address from a slice, checking the length
    pub fn from_slice(slice: &[u8]) -> Result<Self, std::array::TryFromSliceError> {
        let address = B256::try_from(slice)?;
        Ok(Self(address))
    }

    /// Checks if this address is zeros
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for ChunkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0.as_slice()[..8]))
    }
}

impl Deref for ChunkAddress {
    type Target = B256;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<B256> for ChunkAddress {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl From<[u8; CHUNK_ADDRESS_SIZE]> for ChunkAddress {
    fn from(bytes: [u8; CHUNK_ADDRESS_SIZE]) -> Self {
        Self::new(bytes)
    }
}

impl From<ChunkAddress> for B256 {
    fn from(addr: ChunkAddress) -> Self {
        addr.0
    }
}

impl AsRef<[u8]> for ChunkAddress {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn test_from_slice_length() {
        assert!(ChunkAddress::from_slice(&[1u8; 32]).is_ok());
        assert!(ChunkAddress::from_slice(&[1u8; 33]).is_err());
        assert!(ChunkAddress::from_slice(&[]).is_err());
    }

    #[test]
    fn test_display_is_short_hex() {
        let address = ChunkAddress::from(b256!(
            "9100000000000000000000000000000000000000000000000000000000000001"
        ));
        assert_eq!(address.to_string(), "9100000000000000");
        assert!(!address.is_zero());
        assert!(ChunkAddress::default().is_zero());
    }
}
