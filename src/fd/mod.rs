//! # File Descriptor Space
//!
//! One integer namespace multiplexing two handle domains: descriptors
//! 0-9 are console streams, descriptors >= 10 carry a File Manager
//! refnum at a fixed offset. Internally the shim works with a tagged
//! [`Descriptor`]; the raw encoding exists only at the ABI edge.
//!
//! There is no registry behind the encoding: any raw value at or above
//! the offset that fits the native refnum width is trusted to be a
//! previously-issued refnum.

use crate::toolbox::FileRef;
use crate::Errno;

/// First descriptor value that addresses a native file
pub const FILE_FD_OFFSET: i32 = 10;

/// Classified descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descriptor {
    /// Console stream index (0-9); implicit and permanent
    Console(i32),
    /// Native file handle; created by open, destroyed by close
    File(FileRef),
}

impl Descriptor {
    /// Classify a raw descriptor from the runtime
    ///
    /// Values that cannot encode a refnum (negative, or past the i16
    /// refnum range) are bad descriptors.
    pub const fn from_raw(fd: i32) -> Result<Self, Errno> {
        if fd < 0 || fd - FILE_FD_OFFSET > i16::MAX as i32 {
            Err(Errno::Ebadf)
        } else if fd < FILE_FD_OFFSET {
            Ok(Descriptor::Console(fd))
        } else {
            Ok(Descriptor::File(FileRef::from_raw((fd - FILE_FD_OFFSET) as i16)))
        }
    }

    /// Encode back into the runtime's integer namespace
    pub const fn to_raw(self) -> i32 {
        match self {
            Descriptor::Console(stream) => stream,
            Descriptor::File(file) => file.as_raw() as i32 + FILE_FD_OFFSET,
        }
    }

    /// Whether this descriptor addresses a console stream
    #[inline]
    pub const fn is_console(self) -> bool {
        matches!(self, Descriptor::Console(_))
    }
}
