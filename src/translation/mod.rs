//! # Syscall Translation - POSIX Entry Points over the Toolbox
//!
//! The entry-point surface the C runtime calls into, composed from the
//! descriptor space, path encoder, metadata synthesizer, clock emulator,
//! and process stubs. Every operation runs to completion against the
//! synchronous native services; there is no multiplexing, cancellation,
//! or timeout at this layer.

use core::ptr::NonNull;

use crate::clock::ClockEmulator;
use crate::compat::{open_flags, AccessMode, Fd, Off, Pid, SeekWhence, Stat, Timeval};
use crate::fd::Descriptor;
use crate::metadata;
use crate::path::PascalString;
use crate::process;
use crate::toolbox::{errno_from_os_err, os_err, permission, Toolbox};
use crate::Errno;

/// Syscall dispatch over a host Toolbox
///
/// Owns the host handle and the process-wide clock baseline. One
/// instance per process; the runtime threads every reentrant entry
/// point through it.
pub struct SyscallShim<T: Toolbox> {
    toolbox: T,
    clock: ClockEmulator,
}

impl<T: Toolbox> SyscallShim<T> {
    /// Create the dispatch for a host
    pub fn new(toolbox: T) -> Self {
        log::debug!("posix_mac v{} shim ready", crate::VERSION);
        Self {
            toolbox,
            clock: ClockEmulator::new(),
        }
    }

    /// Borrow the underlying host
    pub fn toolbox(&self) -> &T {
        &self.toolbox
    }

    /// Mutably borrow the underlying host
    pub fn toolbox_mut(&mut self) -> &mut T {
        &mut self.toolbox
    }

    /// `open(path, flags)` - open or create a file
    ///
    /// The path is encoded to the native representation, the access mode
    /// validated, and the data fork opened. A host whose File Manager
    /// rejects the data-fork call with a bad-parameter status gets
    /// exactly one fallback attempt through the compatibility primitive.
    pub fn open(&mut self, path: &[u8], flags: i32) -> Result<Fd, Errno> {
        let name = PascalString::from_bytes(path)?;
        AccessMode::from_flags(flags)?;

        if flags & open_flags::O_CREAT != 0 {
            // Best effort: an entry that already exists is not an error
            let err = self.toolbox.create(&name);
            if err != os_err::NO_ERR && err != os_err::DUP_FN_ERR {
                log::debug!("open: create reported status {}", err);
            }
        }

        // The data fork is opened read-write regardless of the requested
        // mode; the host enforces nothing finer.
        let file = match self.toolbox.open_data_fork(&name, permission::READ_WRITE) {
            Ok(file) => file,
            Err(os_err::PARAM_ERR) => {
                log::debug!("open: data-fork call rejected, falling back to compatibility open");
                self.toolbox
                    .open(&name, permission::READ_WRITE)
                    .map_err(errno_from_os_err)?
            }
            Err(err) => return Err(errno_from_os_err(err)),
        };

        if flags & open_flags::O_TRUNC != 0 {
            let err = self.toolbox.set_eof(file, 0);
            if err != os_err::NO_ERR {
                let _ = self.toolbox.close(file);
                return Err(errno_from_os_err(err));
            }
        }

        Ok(Descriptor::File(file).to_raw())
    }

    /// `close(fd)` - release a descriptor
    ///
    /// Console descriptors are permanent, so closing one is a no-op
    /// success. A file descriptor releases its refnum unconditionally
    /// and always reports success.
    pub fn close(&mut self, fd: Fd) -> Result<(), Errno> {
        match Descriptor::from_raw(fd)? {
            Descriptor::Console(_) => Ok(()),
            Descriptor::File(file) => {
                let err = self.toolbox.close(file);
                if err != os_err::NO_ERR {
                    log::debug!("close: refnum {} reported status {}", file.as_raw(), err);
                }
                Ok(())
            }
        }
    }

    /// `read(fd, buf)` - returns the byte count actually transferred
    ///
    /// The native block primitive may under-fill without that being an
    /// error (end of file, partial console line).
    pub fn read(&mut self, fd: Fd, buf: &mut [u8]) -> Result<usize, Errno> {
        match Descriptor::from_raw(fd)? {
            Descriptor::Console(stream) => Ok(self.toolbox.console_read(stream, buf)),
            Descriptor::File(file) => Ok(self.toolbox.read(file, buf)),
        }
    }

    /// `write(fd, buf)` - returns the byte count actually transferred
    pub fn write(&mut self, fd: Fd, buf: &[u8]) -> Result<usize, Errno> {
        match Descriptor::from_raw(fd)? {
            Descriptor::Console(stream) => Ok(self.toolbox.console_write(stream, buf)),
            Descriptor::File(file) => Ok(self.toolbox.write(file, buf)),
        }
    }

    /// `lseek(fd, offset, whence)` - returns the new absolute position
    ///
    /// The position-set status is not trusted; the mark is read back and
    /// that value is authoritative, so a silently pinned mark (seek past
    /// the end of file) is still reported accurately.
    pub fn lseek(&mut self, fd: Fd, offset: Off, whence: i32) -> Result<Off, Errno> {
        match Descriptor::from_raw(fd)? {
            Descriptor::Console(_) => Err(Errno::Espipe),
            Descriptor::File(file) => {
                let whence = SeekWhence::from_raw(whence)?;
                let _ = self.toolbox.set_position(file, whence.native_pos_mode(), offset);
                self.toolbox.position(file).map_err(errno_from_os_err)
            }
        }
    }

    /// `fstat(fd)` - synthesize a stat record for an open descriptor
    pub fn fstat(&self, fd: Fd) -> Result<Stat, Errno> {
        let desc = Descriptor::from_raw(fd)?;
        metadata::fstat(&self.toolbox, desc)
    }

    /// `stat(path)` - always fails; metadata needs an open handle
    pub fn stat(&self, path: &[u8]) -> Result<Stat, Errno> {
        metadata::stat_path(path)
    }

    /// `isatty(fd)` - console descriptors are terminals
    pub fn isatty(&self, fd: Fd) -> bool {
        matches!(Descriptor::from_raw(fd), Ok(d) if d.is_console())
    }

    /// `gettimeofday()` - drift-compensated wall-clock time
    pub fn gettimeofday(&self) -> Timeval {
        self.clock.now(&self.toolbox)
    }

    /// `getpid()` - the single logical process
    pub fn getpid(&self) -> Pid {
        process::getpid()
    }

    /// `kill(pid, sig)` - terminate the single process, or fail
    pub fn kill(&mut self, pid: Pid, sig: i32) -> Result<(), Errno> {
        process::kill(&mut self.toolbox, pid, sig)
    }

    /// `fork()` - always fails on this host
    pub fn fork(&mut self) -> Result<Pid, Errno> {
        process::fork()
    }

    /// `execve(path)` - always fails on this host
    pub fn execve(&mut self, path: &[u8]) -> Result<(), Errno> {
        process::execve(path)
    }

    /// `fcntl(fd, cmd, arg)` - always fails on this host
    pub fn fcntl(&mut self, fd: Fd, cmd: i32, arg: i32) -> Result<i32, Errno> {
        process::fcntl(fd, cmd, arg)
    }

    /// `wait()` - there are never any children
    pub fn wait(&mut self) -> Result<Pid, Errno> {
        process::wait()
    }

    /// `times()` - no CPU-time accounting on this host
    pub fn times(&mut self) -> Result<i64, Errno> {
        process::times()
    }

    /// `link(from, to)` - hard links are not supported
    pub fn link(&mut self, from: &[u8], to: &[u8]) -> Result<(), Errno> {
        process::link(from, to)
    }

    /// `mkdir(path, mode)` - directory mutation is not wired up
    pub fn mkdir(&mut self, path: &[u8], mode: u32) -> Result<(), Errno> {
        process::mkdir(path, mode)
    }

    /// `rename(from, to)` - catalog mutation is not wired up
    pub fn rename(&mut self, from: &[u8], to: &[u8]) -> Result<(), Errno> {
        process::rename(from, to)
    }

    /// `unlink(path)` - catalog mutation is not wired up
    pub fn unlink(&mut self, path: &[u8]) -> Result<(), Errno> {
        process::unlink(path)
    }

    /// `sbrk(increment)` - low-level heap growth
    ///
    /// Exhaustion at this layer is not recoverable: the diagnostic trap
    /// fires first, then the fallback allocation is attempted anyway.
    pub fn sbrk(&mut self, increment: usize) -> Result<NonNull<u8>, Errno> {
        self.toolbox.debugger();
        self.toolbox.grow_heap(increment).ok_or(Errno::Enomem)
    }

    /// `_exit(status)` - hand control back to the host shell
    pub fn exit(&mut self, status: i32) -> ! {
        self.toolbox.exit_to_shell(status)
    }
}
