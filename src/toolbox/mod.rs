//! # Toolbox Interface - Native Host Services
//!
//! Capability-style traits over the host services the shim consumes:
//! File Manager calls, console byte I/O, the coarse wall clock and tick
//! counter, and process/heap control. The syscall dispatch is generic
//! over these traits so tests can drive every translation branch with
//! injected native failures.

use core::ptr::NonNull;

use crate::Errno;

#[cfg(test)]
pub(crate) mod mock;

/// Native status code returned by Toolbox calls
pub type OsErr = i16;

/// Native status values the shim recognizes
pub mod os_err {
    use super::OsErr;

    /// Success
    pub const NO_ERR: OsErr = 0;
    /// No such volume / device missing
    pub const NSV_ERR: OsErr = -35;
    /// Generic I/O failure
    pub const IO_ERR: OsErr = -36;
    /// Bad file name
    pub const BD_NAM_ERR: OsErr = -37;
    /// End of file reached during a read
    pub const EOF_ERR: OsErr = -39;
    /// File not found
    pub const FNF_ERR: OsErr = -43;
    /// Duplicate file name on create
    pub const DUP_FN_ERR: OsErr = -48;
    /// Bad parameter (older File Manager rejecting the data-fork call)
    pub const PARAM_ERR: OsErr = -50;
    /// Heap exhausted
    pub const MEM_FULL_ERR: OsErr = -108;
    /// Directory not found
    pub const DIR_NF_ERR: OsErr = -120;
}

/// File Manager permission bytes
pub mod permission {
    pub const READ: i8 = 1;
    pub const WRITE: i8 = 2;
    pub const READ_WRITE: i8 = 3;
}

/// File Manager positioning modes
pub mod pos_mode {
    pub const FROM_START: i16 = 1;
    pub const FROM_EOF: i16 = 2;
    pub const FROM_MARK: i16 = 3;
}

/// Translate a failing native status to the POSIX error kind
///
/// Total over all inputs: anything unrecognized falls through to
/// [`Errno::Eio`]. Callers test for `NO_ERR` first (or go through
/// [`ok_or_errno`]); only failing statuses reach this table.
pub const fn errno_from_os_err(err: OsErr) -> Errno {
    match err {
        os_err::NSV_ERR => Errno::Enodev,
        os_err::FNF_ERR | os_err::DIR_NF_ERR => Errno::Enoent,
        os_err::BD_NAM_ERR | os_err::PARAM_ERR => Errno::Einval,
        _ => Errno::Eio,
    }
}

/// Turn a native status into a shim result
pub const fn ok_or_errno(err: OsErr) -> Result<(), Errno> {
    if err == os_err::NO_ERR {
        Ok(())
    } else {
        Err(errno_from_os_err(err))
    }
}

/// Native file handle (File Manager refnum)
///
/// Owned exclusively by the descriptor that wraps it; released on close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FileRef(i16);

impl FileRef {
    /// Wrap a raw refnum issued by the File Manager
    #[inline]
    pub const fn from_raw(raw: i16) -> Self {
        Self(raw)
    }

    /// Raw refnum value
    #[inline]
    pub const fn as_raw(self) -> i16 {
        self.0
    }
}

/// Native volume reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct VolumeRef(i16);

impl VolumeRef {
    /// Wrap a raw volume refnum
    #[inline]
    pub const fn from_raw(raw: i16) -> Self {
        Self(raw)
    }

    /// Raw volume refnum value
    #[inline]
    pub const fn as_raw(self) -> i16 {
        self.0
    }
}

/// Catalog entry shape: the two disjoint native metadata records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogNode {
    /// Regular file record
    File {
        /// Directory id of the containing directory
        parent_dir_id: u32,
        /// Logical length of the data fork
        logical_len: u32,
        /// Physical length of the data fork
        data_phys_len: u32,
        /// Physical length of the resource fork
        rsrc_phys_len: u32,
        /// Creation date, seconds since the Mac epoch
        created: u32,
        /// Modification date, seconds since the Mac epoch
        modified: u32,
    },
    /// Directory record
    Directory {
        /// Directory id of the entry itself
        dir_id: u32,
        /// Creation date, seconds since the Mac epoch
        created: u32,
        /// Modification date, seconds since the Mac epoch
        modified: u32,
    },
}

/// Catalog query result for an open file handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogInfo {
    /// Volume the entry lives on
    pub vol_ref: VolumeRef,
    /// File or directory record
    pub node: CatalogNode,
}

/// Volume query result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeInfo {
    /// Drive number the volume is mounted on
    pub drive_number: i16,
}

/// Host File Manager calls consumed by the shim
pub trait FileManager {
    /// Create a catalog entry for `name`; an already-existing entry is a
    /// native error the caller may choose to ignore.
    fn create(&mut self, name: &crate::PascalString) -> OsErr;

    /// Open the data fork of `name` with the given permission
    fn open_data_fork(&mut self, name: &crate::PascalString, perm: i8) -> Result<FileRef, OsErr>;

    /// Compatibility open primitive for hosts whose File Manager rejects
    /// the data-fork call with a bad-parameter status
    fn open(&mut self, name: &crate::PascalString, perm: i8) -> Result<FileRef, OsErr>;

    /// Release an open refnum
    fn close(&mut self, file: FileRef) -> OsErr;

    /// Block read at the current mark; returns the byte count actually
    /// transferred (the host may under-fill without that being an error)
    fn read(&mut self, file: FileRef, buf: &mut [u8]) -> usize;

    /// Block write at the current mark; returns the byte count actually
    /// transferred
    fn write(&mut self, file: FileRef, buf: &[u8]) -> usize;

    /// Move the file mark; `mode` is one of [`pos_mode`]
    fn set_position(&mut self, file: FileRef, mode: i16, offset: i64) -> OsErr;

    /// Absolute position of the file mark
    fn position(&self, file: FileRef) -> Result<i64, OsErr>;

    /// Set the logical end of file
    fn set_eof(&mut self, file: FileRef, len: i64) -> OsErr;

    /// Catalog record for an open refnum
    fn catalog_info(&self, file: FileRef) -> Result<CatalogInfo, OsErr>;

    /// Volume record for a mounted volume
    fn volume_info(&self, vol: VolumeRef) -> Result<VolumeInfo, OsErr>;
}

/// Console stream byte I/O, indexed by console descriptor (0-9)
pub trait ConsoleIo {
    /// Read bytes from a console stream; returns the count transferred
    fn console_read(&mut self, stream: i32, buf: &mut [u8]) -> usize;

    /// Write bytes to a console stream; returns the count transferred
    fn console_write(&mut self, stream: i32, buf: &[u8]) -> usize;
}

/// Host time sources
pub trait SystemClock {
    /// Coarse wall clock: whole seconds since the Mac epoch, advancing
    /// once per second and subject to wall-clock adjustments
    fn date_time_secs(&self) -> u32;

    /// Free-running tick counter at a nominal 60.15 Hz, independent of
    /// wall-clock adjustments
    fn tick_count(&self) -> u32;
}

/// Process and heap control primitives
pub trait HostControl {
    /// Terminate the process and return control to the host shell
    fn exit_to_shell(&mut self, status: i32) -> !;

    /// Diagnostic trap
    fn debugger(&mut self);

    /// Grow the heap by `increment` bytes of zeroed memory; `None` on
    /// exhaustion
    fn grow_heap(&mut self, increment: usize) -> Option<NonNull<u8>>;
}

/// Umbrella over every host service the dispatch needs
pub trait Toolbox: FileManager + ConsoleIo + SystemClock + HostControl {}

impl<T: FileManager + ConsoleIo + SystemClock + HostControl> Toolbox for T {}
