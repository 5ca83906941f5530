//! # POSIX Compatibility Types and Structures
//!
//! Types the C runtime sees at the syscall boundary.

use bitflags::bitflags;

use crate::Errno;

/// POSIX file descriptor
pub type Fd = i32;

/// POSIX process ID
pub type Pid = i32;

/// POSIX mode
pub type Mode = u32;

/// POSIX offset
pub type Off = i64;

/// Seconds between the Mac epoch (1 Jan 1904) and the Unix epoch
/// (1 Jan 1970): 66 years of 365 days plus 17 leap days, in seconds.
pub const MAC_UNIX_EPOCH_DELTA_SECS: i64 = 24_107 * 86_400;

/// File open flags (POSIX)
pub mod open_flags {
    pub const O_RDONLY: i32 = 0;
    pub const O_WRONLY: i32 = 1;
    pub const O_RDWR: i32 = 2;
    pub const O_ACCMODE: i32 = 3;
    pub const O_CREAT: i32 = 0o100;
    pub const O_TRUNC: i32 = 0o1000;
}

/// File seek whence (POSIX)
pub mod seek_whence {
    pub const SEEK_SET: i32 = 0;
    pub const SEEK_CUR: i32 = 1;
    pub const SEEK_END: i32 = 2;
}

/// Requested file access mode, decoded from the open flag word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Read only
    ReadOnly,
    /// Write only
    WriteOnly,
    /// Read and write
    ReadWrite,
}

impl AccessMode {
    /// Decode the access mode bits of an open flag word
    ///
    /// `O_ACCMODE == 3` is not a valid mode. The decoded mode gates the
    /// open call; the data fork itself is always opened read-write (the
    /// host enforces nothing finer), so no permission byte is derived
    /// from it.
    pub const fn from_flags(flags: i32) -> Result<Self, Errno> {
        match flags & open_flags::O_ACCMODE {
            open_flags::O_RDONLY => Ok(AccessMode::ReadOnly),
            open_flags::O_WRONLY => Ok(AccessMode::WriteOnly),
            open_flags::O_RDWR => Ok(AccessMode::ReadWrite),
            _ => Err(Errno::Einval),
        }
    }
}

bitflags! {
    /// POSIX `st_mode` bits
    pub struct FileMode: u32 {
        /// Character device
        const IFCHR = 0o020000;
        /// Directory
        const IFDIR = 0o040000;
        /// Regular file
        const IFREG = 0o100000;
        /// Owner read
        const IRUSR = 0o400;
        /// Owner write
        const IWUSR = 0o200;
        /// Owner execute
        const IXUSR = 0o100;
        /// Group write
        const IWGRP = 0o020;
    }
}

/// POSIX stat record synthesized from native metadata
///
/// Built fresh on every `fstat`; never cached.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stat {
    pub st_dev: i32,
    pub st_ino: u64,
    pub st_mode: u32,
    pub st_nlink: u32,
    pub st_uid: u32,
    pub st_gid: u32,
    pub st_size: i64,
    pub st_blksize: i32,
    pub st_blocks: i64,
    pub st_atime: i64,
    pub st_mtime: i64,
    pub st_ctime: i64,
}

/// POSIX timeval structure
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeval {
    pub tv_sec: i64,
    pub tv_usec: i64,
}

/// Seek origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekWhence {
    /// From the start of the file
    Start,
    /// From the current mark
    Current,
    /// From the logical end of file
    End,
}

impl SeekWhence {
    /// Decode a raw POSIX whence value
    pub const fn from_raw(whence: i32) -> Result<Self, Errno> {
        match whence {
            seek_whence::SEEK_SET => Ok(SeekWhence::Start),
            seek_whence::SEEK_CUR => Ok(SeekWhence::Current),
            seek_whence::SEEK_END => Ok(SeekWhence::End),
            _ => Err(Errno::Einval),
        }
    }

    /// The File Manager positioning mode this whence maps to
    pub const fn native_pos_mode(self) -> i16 {
        match self {
            SeekWhence::Start => crate::toolbox::pos_mode::FROM_START,
            SeekWhence::Current => crate::toolbox::pos_mode::FROM_MARK,
            SeekWhence::End => crate::toolbox::pos_mode::FROM_EOF,
        }
    }
}
