//! # Process Stubs
//!
//! There is exactly one logical process on this host. Its identity is
//! the fixed [`SHIM_PID`]; every process-control call either operates on
//! that single process or fails with the errno the runtime expects for
//! a capability the host does not have.

use crate::compat::Pid;
use crate::toolbox::HostControl;
use crate::Errno;

/// The single logical process identity
pub const SHIM_PID: Pid = 42;

/// Signal numbers the kill gate understands (POSIX subset)
pub mod signal {
    /// Kill (cannot be caught)
    pub const SIGKILL: i32 = 9;
    /// Termination request
    pub const SIGTERM: i32 = 15;
}

/// Process identity
#[inline]
pub const fn getpid() -> Pid {
    SHIM_PID
}

/// Send a signal
///
/// Only the single shim process exists, so any other target is
/// `Esrch`. Signal 0 is the POSIX existence probe and delivers nothing;
/// every real signal terminates the process via the host.
pub fn kill<T: HostControl>(toolbox: &mut T, pid: Pid, sig: i32) -> Result<(), Errno> {
    if pid != SHIM_PID {
        return Err(Errno::Esrch);
    }
    if sig == 0 {
        return Ok(());
    }
    toolbox.exit_to_shell(SHIM_PID as i32)
}

/// `fork` - process creation is not available on this host
pub fn fork() -> Result<Pid, Errno> {
    log::warn!("fork() called - host has no process creation");
    Err(Errno::Enosys)
}

/// `execve` - program replacement is not available on this host
pub fn execve(_path: &[u8]) -> Result<(), Errno> {
    Err(Errno::Enosys)
}

/// `fcntl` - descriptor control is not available on this host
pub fn fcntl(_fd: i32, _cmd: i32, _arg: i32) -> Result<i32, Errno> {
    Err(Errno::Enosys)
}

/// `wait` - there are never any children
pub fn wait() -> Result<Pid, Errno> {
    Err(Errno::Echild)
}

/// `times` - the host exposes no CPU-time accounting
pub fn times() -> Result<i64, Errno> {
    Err(Errno::Eacces)
}

/// `link` - hard links do not exist on the native file system
pub fn link(_from: &[u8], _to: &[u8]) -> Result<(), Errno> {
    Err(Errno::Eperm)
}

/// `mkdir` - directory mutation is not wired up
pub fn mkdir(_path: &[u8], _mode: u32) -> Result<(), Errno> {
    Err(Errno::Eio)
}

/// `rename` - catalog mutation is not wired up
pub fn rename(_from: &[u8], _to: &[u8]) -> Result<(), Errno> {
    Err(Errno::Eio)
}

/// `unlink` - catalog mutation is not wired up
pub fn unlink(_path: &[u8]) -> Result<(), Errno> {
    Err(Errno::Eio)
}
