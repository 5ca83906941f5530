//! # Metadata Synthesis
//!
//! Builds the POSIX stat record from the two disjoint native metadata
//! APIs: the catalog query for the file or directory record and the
//! volume query for the device identity. Console descriptors synthesize
//! a character-device record stamped with the current wall-clock time.
//!
//! The record is derived fresh on every query and never cached; any
//! native failure aborts the whole operation, so no partial metadata is
//! ever returned.

use crate::compat::{FileMode, Stat, MAC_UNIX_EPOCH_DELTA_SECS};
use crate::fd::Descriptor;
use crate::toolbox::{errno_from_os_err, CatalogNode, FileManager, SystemClock};
use crate::Errno;

/// Sentinel owner/group reported for every record
const OWNER_SENTINEL: u32 = 42;

/// Native allocation block granularity
const BLOCK_SIZE: u32 = 512;

/// Synthesize a stat record for an open descriptor
pub fn fstat<T>(toolbox: &T, desc: Descriptor) -> Result<Stat, Errno>
where
    T: FileManager + SystemClock,
{
    let mut stat = Stat {
        st_nlink: 1,
        st_uid: OWNER_SENTINEL,
        st_gid: OWNER_SENTINEL,
        st_blksize: BLOCK_SIZE as i32,
        ..Stat::default()
    };

    match desc {
        Descriptor::Console(_) => {
            let now = toolbox.date_time_secs() as i64 - MAC_UNIX_EPOCH_DELTA_SECS;
            stat.st_mode =
                (FileMode::IFCHR | FileMode::IRUSR | FileMode::IWUSR | FileMode::IWGRP).bits();
            stat.st_atime = now;
            stat.st_mtime = now;
            stat.st_ctime = now;
            Ok(stat)
        }
        Descriptor::File(file) => {
            let info = toolbox.catalog_info(file).map_err(errno_from_os_err)?;

            let phys_len;
            match info.node {
                CatalogNode::Directory {
                    dir_id,
                    created,
                    modified,
                } => {
                    stat.st_ino = dir_id as u64;
                    stat.st_mode = (FileMode::IFDIR | FileMode::IRUSR | FileMode::IXUSR).bits();
                    stat.st_mtime = modified as i64 - MAC_UNIX_EPOCH_DELTA_SECS;
                    stat.st_ctime = created as i64 - MAC_UNIX_EPOCH_DELTA_SECS;
                    phys_len = 0u64;
                }
                CatalogNode::File {
                    parent_dir_id,
                    logical_len,
                    data_phys_len,
                    rsrc_phys_len,
                    created,
                    modified,
                } => {
                    stat.st_ino = parent_dir_id as u64;
                    stat.st_mode = (FileMode::IFREG | FileMode::IRUSR).bits();
                    stat.st_size = logical_len as i64;
                    stat.st_mtime = modified as i64 - MAC_UNIX_EPOCH_DELTA_SECS;
                    stat.st_ctime = created as i64 - MAC_UNIX_EPOCH_DELTA_SECS;
                    phys_len = data_phys_len as u64 + rsrc_phys_len as u64;
                }
            }

            let vol = toolbox.volume_info(info.vol_ref).map_err(errno_from_os_err)?;
            stat.st_dev = vol.drive_number as i32;
            // Physical blocks, rounded up to the allocation granularity
            stat.st_blocks =
                (phys_len / BLOCK_SIZE as u64 + u64::from(phys_len % BLOCK_SIZE as u64 > 0)) as i64;

            Ok(stat)
        }
    }
}

/// Path-based metadata query
///
/// Not wired up on this host: there is no catalog-by-path call in the
/// shim, so callers needing metadata must open the target first.
pub fn stat_path(_path: &[u8]) -> Result<Stat, Errno> {
    Err(Errno::Enosys)
}
