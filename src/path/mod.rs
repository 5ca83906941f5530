//! # Path Encoding
//!
//! Converts the runtime's NUL-terminated byte paths into the
//! length-prefixed Pascal strings the File Manager takes.

use crate::Errno;

/// Longest path the native representation can carry
pub const MAX_PATH_LEN: usize = 255;

/// Length-prefixed native path (`Str255`)
///
/// Byte 0 holds the length; bytes 1..=len hold the path.
#[derive(Clone, Copy)]
pub struct PascalString {
    buf: [u8; MAX_PATH_LEN + 1],
}

impl PascalString {
    /// Encode a byte path
    ///
    /// The input is the path without its NUL terminator. Paths longer
    /// than 255 bytes or containing an interior NUL are rejected with
    /// `Einval` before any native call is made.
    pub fn from_bytes(path: &[u8]) -> Result<Self, Errno> {
        if path.len() > MAX_PATH_LEN {
            return Err(Errno::Einval);
        }
        let mut buf = [0u8; MAX_PATH_LEN + 1];
        buf[0] = path.len() as u8;
        for (i, &b) in path.iter().enumerate() {
            if b == 0 {
                return Err(Errno::Einval);
            }
            buf[i + 1] = b;
        }
        Ok(Self { buf })
    }

    /// Path length in bytes
    #[inline]
    pub const fn len(&self) -> usize {
        self.buf[0] as usize
    }

    /// Whether the path is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.buf[0] == 0
    }

    /// The path bytes, without the length prefix
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[1..=self.len()]
    }

    /// The full native representation, length prefix included
    #[inline]
    pub fn as_pascal_bytes(&self) -> &[u8] {
        &self.buf[..=self.len()]
    }
}

impl core::fmt::Debug for PascalString {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PascalString({:?})", core::str::from_utf8(self.as_bytes()))
    }
}

impl PartialEq for PascalString {
    fn eq(&self, other: &Self) -> bool {
        self.as_pascal_bytes() == other.as_pascal_bytes()
    }
}

impl Eq for PascalString {}
