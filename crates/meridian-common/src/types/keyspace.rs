//! Keyspace id type and codec.
//!
//! A keyspace id is the routing key of the sharded keyspace: an opaque
//! byte string identifying the physical partition that owns a row.
//! Partition boundaries are expressed as prefixes of the 64-bit
//! keyspace hash ring, so a well-formed keyspace id is a non-empty
//! byte string of at most eight bytes.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum keyspace id size in bytes (the width of the hash ring).
pub const MAX_KEYSPACE_ID_SIZE: usize = 8;

/// Error returned when a byte string is not a well-formed keyspace id.
///
/// The display embeds a lowercase hex dump of the offending bytes so
/// corrupt routing metadata can be diagnosed from logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid keyspace id: {hex}")]
pub struct InvalidKeyspaceId {
    hex: String,
}

impl InvalidKeyspaceId {
    fn new(raw: &[u8]) -> Self {
        Self {
            hex: hex::encode(raw),
        }
    }

    /// Returns the hex dump of the rejected bytes.
    #[must_use]
    pub fn hex(&self) -> &str {
        &self.hex
    }
}

/// A validated routing key.
///
/// Keyspace ids are opaque to the routing layer: two ids are equal iff
/// their byte sequences are equal, and no further structure is
/// interpreted here. Construction goes through [`KeyspaceId::decode`],
/// so every value of this type is well-formed.
///
/// # Example
///
/// ```rust
/// use meridian_common::types::KeyspaceId;
///
/// let ksid = KeyspaceId::decode(b"test").unwrap();
/// assert_eq!(ksid.as_bytes(), b"test");
/// assert_eq!(ksid.to_string(), "74657374");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyspaceId(Bytes);

impl KeyspaceId {
    /// Decodes a keyspace id from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidKeyspaceId`] if `raw` is empty or longer than
    /// [`MAX_KEYSPACE_ID_SIZE`] bytes.
    pub fn decode(raw: &[u8]) -> Result<Self, InvalidKeyspaceId> {
        if raw.is_empty() || raw.len() > MAX_KEYSPACE_ID_SIZE {
            return Err(InvalidKeyspaceId::new(raw));
        }
        Ok(Self(Bytes::copy_from_slice(raw)))
    }

    /// Creates the keyspace id for a point on the 64-bit hash ring.
    #[inline]
    #[must_use]
    pub fn from_hash(hash: u64) -> Self {
        Self(Bytes::copy_from_slice(&hash.to_be_bytes()))
    }

    /// Returns the wire representation.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the underlying `Bytes`.
    #[inline]
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns the length of the id in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; decoding rejects empty ids.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the lowercase hex form of the id.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl AsRef<[u8]> for KeyspaceId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for KeyspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyspaceId({})", self.to_hex())
    }
}

impl fmt::Display for KeyspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
