//! # posix_mac - POSIX syscall shim for classic Mac OS hosts
//!
//! Translation layer that lets a POSIX-style C runtime execute on a
//! classic Mac OS host by mapping newlib-style reentrant syscall entry
//! points onto the host Toolbox services (File Manager, console driver,
//! coarse wall clock, process control).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 C runtime (newlib _*_r)                 │
//! └───────────────────────────┬─────────────────────────────┘
//!                             │
//!                             ▼
//!              ┌─────────────────────────────┐
//!              │   SyscallShim (dispatch)    │
//!              │  fd space · path encoding   │
//!              │  stat synthesis · clock     │
//!              └──────────────┬──────────────┘
//!                             │
//!                             ▼
//!              ┌─────────────────────────────┐
//!              │      Toolbox traits         │
//!              │ FileManager · ConsoleIo     │
//!              │ SystemClock · HostControl   │
//!              └─────────────────────────────┘
//! ```
//!
//! Descriptors 0-9 address console streams; descriptors >= 10 wrap a
//! native File Manager refnum at a fixed offset, so the integer ABI of
//! the original shim is preserved while the crate internally works with
//! a tagged [`fd::Descriptor`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use posix_mac::{SyscallShim, compat::open_flags};
//!
//! let mut shim = SyscallShim::new(toolbox);
//! let fd = shim.open(b"out.txt", open_flags::O_CREAT | open_flags::O_WRONLY)?;
//! shim.write(fd, b"hello")?;
//! shim.close(fd)?;
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

#[cfg(test)]
extern crate alloc;

pub mod clock;
pub mod compat;
pub mod fd;
pub mod metadata;
pub mod path;
pub mod process;
pub mod toolbox;
pub mod translation;

// Re-exports for public API
pub use clock::{ClockEmulator, ClockState};
pub use compat::{Stat, Timeval};
pub use fd::{Descriptor, FILE_FD_OFFSET};
pub use path::PascalString;
pub use toolbox::{
    errno_from_os_err, ok_or_errno, CatalogInfo, CatalogNode, ConsoleIo, FileManager, FileRef,
    HostControl, SystemClock, Toolbox, VolumeInfo, VolumeRef,
};
pub use translation::SyscallShim;

/// Shim version
pub const VERSION: &str = "0.1.0";

/// POSIX-style error kinds surfaced to the runtime
///
/// Closed taxonomy: everything a native status can translate to, plus the
/// errnos the fixed-failure stubs report. `to_errno` yields the value the
/// runtime stores in `_reent::_errno`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Errno {
    /// Operation not permitted
    Eperm,
    /// No such file or directory
    Enoent,
    /// No such process
    Esrch,
    /// I/O error (catch-all for unrecognized native statuses)
    Eio,
    /// Bad file descriptor
    Ebadf,
    /// No child processes
    Echild,
    /// Out of memory
    Enomem,
    /// Permission denied
    Eacces,
    /// Bad address (null output buffer)
    Efault,
    /// No such device
    Enodev,
    /// Invalid argument
    Einval,
    /// Illegal seek (console streams are not seekable)
    Espipe,
    /// Function not implemented on this host
    Enosys,
}

impl Errno {
    /// Convert to the POSIX errno value
    pub const fn to_errno(self) -> i32 {
        match self {
            Errno::Eperm => 1,
            Errno::Enoent => 2,
            Errno::Esrch => 3,
            Errno::Eio => 5,
            Errno::Ebadf => 9,
            Errno::Echild => 10,
            Errno::Enomem => 12,
            Errno::Eacces => 13,
            Errno::Efault => 14,
            Errno::Enodev => 19,
            Errno::Einval => 22,
            Errno::Espipe => 29,
            Errno::Enosys => 38,
        }
    }

    /// Short name for logging
    pub const fn name(self) -> &'static str {
        match self {
            Errno::Eperm => "EPERM",
            Errno::Enoent => "ENOENT",
            Errno::Esrch => "ESRCH",
            Errno::Eio => "EIO",
            Errno::Ebadf => "EBADF",
            Errno::Echild => "ECHILD",
            Errno::Enomem => "ENOMEM",
            Errno::Eacces => "EACCES",
            Errno::Efault => "EFAULT",
            Errno::Enodev => "ENODEV",
            Errno::Einval => "EINVAL",
            Errno::Espipe => "ESPIPE",
            Errno::Enosys => "ENOSYS",
        }
    }
}
