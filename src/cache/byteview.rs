//! Immutable Byte View
//!
//! The payload type stored by groups. Bytes are copied in on construction and
//! copied out on every accessor, so a caller can never observe or cause a
//! mutation of a cached value.

use std::fmt;

use bytes::Bytes;

use super::lru::CacheValue;

/// Immutable view over a cached byte payload
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    data: Bytes,
}

impl ByteView {
    /// Create a view holding a private copy of `data`
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: Bytes::copy_from_slice(data),
        }
    }

    /// Payload size in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the payload is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Independent copy of the payload
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }

    /// Payload decoded as text (invalid UTF-8 sequences are replaced)
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

impl CacheValue for ByteView {
    #[inline]
    fn logical_size(&self) -> i64 {
        self.data.len() as i64
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<&[u8]> for ByteView {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(data: Vec<u8>) -> Self {
        // The Vec is moved in, so nobody else holds a handle to its buffer.
        Self {
            data: Bytes::from(data),
        }
    }
}

impl From<&str> for ByteView {
    fn from(data: &str) -> Self {
        Self::new(data.as_bytes())
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.data))
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.data.len())
            .field("text", &String::from_utf8_lossy(&self.data))
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
