//! In-memory Toolbox used by the unit tests
//!
//! Simulates one mounted volume with a flat catalog, an open-refnum
//! table, controllable clock sources, console capture buffers, and
//! per-call native failure injection so every translation branch can be
//! exercised.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec;
use alloc::vec::Vec;
use core::ptr::NonNull;

use super::{
    os_err, pos_mode, CatalogInfo, CatalogNode, ConsoleIo, FileManager, FileRef, HostControl,
    OsErr, SystemClock, VolumeInfo, VolumeRef,
};
use crate::PascalString;

const MOCK_VOL_REF: i16 = -2;

#[derive(Debug, Clone)]
enum Node {
    File {
        data: Vec<u8>,
        rsrc_phys: u32,
        created: u32,
        modified: u32,
    },
    Directory {
        dir_id: u32,
        created: u32,
        modified: u32,
    },
}

#[derive(Debug, Clone)]
struct OpenEntry {
    name: Vec<u8>,
    pos: i64,
}

/// Scriptable fake of the whole Toolbox surface
pub struct MockToolbox {
    catalog: BTreeMap<Vec<u8>, Node>,
    open_refs: BTreeMap<i16, OpenEntry>,
    next_ref: i16,

    /// Coarse wall clock, seconds since the Mac epoch
    pub secs: u32,
    /// Free-running tick counter
    pub ticks: u32,
    /// Drive number reported by the volume query
    pub drive_number: i16,
    /// Directory id reported as the parent of every file
    pub parent_dir_id: u32,

    /// Force `open_data_fork` to fail with this status
    pub fail_open_df: Option<OsErr>,
    /// Force the compatibility `open` to fail with this status
    pub fail_open: Option<OsErr>,
    /// Force the catalog query to fail with this status
    pub fail_catalog: Option<OsErr>,
    /// Force the volume query to fail with this status
    pub fail_volume: Option<OsErr>,
    /// Force `set_eof` to fail with this status
    pub fail_set_eof: Option<OsErr>,
    /// Make `grow_heap` report exhaustion
    pub fail_grow_heap: bool,

    /// Calls seen by `open_data_fork`
    pub open_data_fork_calls: u32,
    /// Calls seen by the compatibility `open`
    pub open_calls: u32,
    /// Diagnostic traps taken
    pub debugger_hits: u32,

    console_out: BTreeMap<i32, Vec<u8>>,
    console_in: BTreeMap<i32, VecDeque<u8>>,
}

impl MockToolbox {
    pub fn new() -> Self {
        Self {
            catalog: BTreeMap::new(),
            open_refs: BTreeMap::new(),
            next_ref: 1,
            secs: 3_000_000_000,
            ticks: 0,
            drive_number: 1,
            parent_dir_id: 2,
            fail_open_df: None,
            fail_open: None,
            fail_catalog: None,
            fail_volume: None,
            fail_set_eof: None,
            fail_grow_heap: false,
            open_data_fork_calls: 0,
            open_calls: 0,
            debugger_hits: 0,
            console_out: BTreeMap::new(),
            console_in: BTreeMap::new(),
        }
    }

    /// Seed a file on the volume
    pub fn insert_file(&mut self, name: &[u8], data: &[u8]) {
        self.catalog.insert(
            name.to_vec(),
            Node::File {
                data: data.to_vec(),
                rsrc_phys: 0,
                created: self.secs,
                modified: self.secs,
            },
        );
    }

    /// Seed a directory and hand back an open ref for it
    pub fn insert_directory(&mut self, name: &[u8], dir_id: u32) -> FileRef {
        self.catalog.insert(
            name.to_vec(),
            Node::Directory {
                dir_id,
                created: self.secs,
                modified: self.secs,
            },
        );
        self.issue_ref(name)
    }

    /// Set the physical resource fork length of a seeded file
    pub fn set_resource_fork(&mut self, name: &[u8], phys_len: u32) {
        if let Some(Node::File { rsrc_phys, .. }) = self.catalog.get_mut(name) {
            *rsrc_phys = phys_len;
        }
    }

    /// Bytes a seeded file currently holds
    pub fn file_data(&self, name: &[u8]) -> Option<&[u8]> {
        match self.catalog.get(name) {
            Some(Node::File { data, .. }) => Some(data),
            _ => None,
        }
    }

    /// Whether a refnum is still open
    pub fn is_open(&self, file: FileRef) -> bool {
        self.open_refs.contains_key(&file.as_raw())
    }

    /// Queue bytes for a console stream to deliver on read
    pub fn push_console_input(&mut self, stream: i32, bytes: &[u8]) {
        self.console_in.entry(stream).or_default().extend(bytes);
    }

    /// Bytes written so far to a console stream
    pub fn console_output(&self, stream: i32) -> &[u8] {
        self.console_out.get(&stream).map(Vec::as_slice).unwrap_or(&[])
    }

    fn issue_ref(&mut self, name: &[u8]) -> FileRef {
        let raw = self.next_ref;
        self.next_ref += 1;
        self.open_refs.insert(
            raw,
            OpenEntry {
                name: name.to_vec(),
                pos: 0,
            },
        );
        FileRef::from_raw(raw)
    }

    fn open_common(&mut self, name: &PascalString) -> Result<FileRef, OsErr> {
        match self.catalog.get(name.as_bytes()) {
            Some(Node::File { .. }) => Ok(self.issue_ref(name.as_bytes())),
            Some(Node::Directory { .. }) | None => Err(os_err::FNF_ERR),
        }
    }

    fn file_len(&self, name: &[u8]) -> i64 {
        match self.catalog.get(name) {
            Some(Node::File { data, .. }) => data.len() as i64,
            _ => 0,
        }
    }
}

impl Default for MockToolbox {
    fn default() -> Self {
        Self::new()
    }
}

impl FileManager for MockToolbox {
    fn create(&mut self, name: &PascalString) -> OsErr {
        if self.catalog.contains_key(name.as_bytes()) {
            return os_err::DUP_FN_ERR;
        }
        self.insert_file(name.as_bytes(), &[]);
        os_err::NO_ERR
    }

    fn open_data_fork(&mut self, name: &PascalString, _perm: i8) -> Result<FileRef, OsErr> {
        self.open_data_fork_calls += 1;
        if let Some(err) = self.fail_open_df {
            return Err(err);
        }
        self.open_common(name)
    }

    fn open(&mut self, name: &PascalString, _perm: i8) -> Result<FileRef, OsErr> {
        self.open_calls += 1;
        if let Some(err) = self.fail_open {
            return Err(err);
        }
        self.open_common(name)
    }

    fn close(&mut self, file: FileRef) -> OsErr {
        match self.open_refs.remove(&file.as_raw()) {
            Some(_) => os_err::NO_ERR,
            None => os_err::PARAM_ERR,
        }
    }

    fn read(&mut self, file: FileRef, buf: &mut [u8]) -> usize {
        let entry = match self.open_refs.get(&file.as_raw()) {
            Some(e) => e.clone(),
            None => return 0,
        };
        let data = match self.catalog.get(&entry.name) {
            Some(Node::File { data, .. }) => data,
            _ => return 0,
        };
        let start = (entry.pos as usize).min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        if let Some(e) = self.open_refs.get_mut(&file.as_raw()) {
            e.pos += n as i64;
        }
        n
    }

    fn write(&mut self, file: FileRef, buf: &[u8]) -> usize {
        let (name, pos) = match self.open_refs.get(&file.as_raw()) {
            Some(e) => (e.name.clone(), e.pos as usize),
            None => return 0,
        };
        if let Some(Node::File { data, modified, .. }) = self.catalog.get_mut(&name) {
            if data.len() < pos + buf.len() {
                data.resize(pos + buf.len(), 0);
            }
            data[pos..pos + buf.len()].copy_from_slice(buf);
            *modified = self.secs;
            if let Some(e) = self.open_refs.get_mut(&file.as_raw()) {
                e.pos += buf.len() as i64;
            }
            buf.len()
        } else {
            0
        }
    }

    fn set_position(&mut self, file: FileRef, mode: i16, offset: i64) -> OsErr {
        let (name, pos) = match self.open_refs.get(&file.as_raw()) {
            Some(e) => (e.name.clone(), e.pos),
            None => return os_err::PARAM_ERR,
        };
        let len = self.file_len(&name);
        let target = match mode {
            pos_mode::FROM_START => offset,
            pos_mode::FROM_MARK => pos + offset,
            pos_mode::FROM_EOF => len + offset,
            _ => return os_err::PARAM_ERR,
        };
        if target < 0 {
            return os_err::PARAM_ERR;
        }
        let entry = self.open_refs.get_mut(&file.as_raw()).expect("checked above");
        if target > len {
            // The host pins the mark to EOF and reports the overrun
            entry.pos = len;
            return os_err::EOF_ERR;
        }
        entry.pos = target;
        os_err::NO_ERR
    }

    fn position(&self, file: FileRef) -> Result<i64, OsErr> {
        self.open_refs
            .get(&file.as_raw())
            .map(|e| e.pos)
            .ok_or(os_err::PARAM_ERR)
    }

    fn set_eof(&mut self, file: FileRef, len: i64) -> OsErr {
        if let Some(err) = self.fail_set_eof {
            return err;
        }
        let name = match self.open_refs.get(&file.as_raw()) {
            Some(e) => e.name.clone(),
            None => return os_err::PARAM_ERR,
        };
        match self.catalog.get_mut(&name) {
            Some(Node::File { data, modified, .. }) => {
                data.resize(len as usize, 0);
                *modified = self.secs;
                os_err::NO_ERR
            }
            _ => os_err::IO_ERR,
        }
    }

    fn catalog_info(&self, file: FileRef) -> Result<CatalogInfo, OsErr> {
        if let Some(err) = self.fail_catalog {
            return Err(err);
        }
        let entry = self.open_refs.get(&file.as_raw()).ok_or(os_err::PARAM_ERR)?;
        let node = match self.catalog.get(&entry.name).ok_or(os_err::FNF_ERR)? {
            Node::File {
                data,
                rsrc_phys,
                created,
                modified,
            } => CatalogNode::File {
                parent_dir_id: self.parent_dir_id,
                logical_len: data.len() as u32,
                // Allocation happens in whole 512-byte blocks
                data_phys_len: (data.len() as u32 + 511) & !511,
                rsrc_phys_len: *rsrc_phys,
                created: *created,
                modified: *modified,
            },
            Node::Directory {
                dir_id,
                created,
                modified,
            } => CatalogNode::Directory {
                dir_id: *dir_id,
                created: *created,
                modified: *modified,
            },
        };
        Ok(CatalogInfo {
            vol_ref: VolumeRef::from_raw(MOCK_VOL_REF),
            node,
        })
    }

    fn volume_info(&self, vol: VolumeRef) -> Result<VolumeInfo, OsErr> {
        if let Some(err) = self.fail_volume {
            return Err(err);
        }
        if vol.as_raw() != MOCK_VOL_REF {
            return Err(os_err::NSV_ERR);
        }
        Ok(VolumeInfo {
            drive_number: self.drive_number,
        })
    }
}

impl ConsoleIo for MockToolbox {
    fn console_read(&mut self, stream: i32, buf: &mut [u8]) -> usize {
        let queue = match self.console_in.get_mut(&stream) {
            Some(q) => q,
            None => return 0,
        };
        let mut n = 0;
        while n < buf.len() {
            match queue.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    fn console_write(&mut self, stream: i32, buf: &[u8]) -> usize {
        self.console_out.entry(stream).or_default().extend_from_slice(buf);
        buf.len()
    }
}

impl SystemClock for MockToolbox {
    fn date_time_secs(&self) -> u32 {
        self.secs
    }

    fn tick_count(&self) -> u32 {
        self.ticks
    }
}

impl HostControl for MockToolbox {
    fn exit_to_shell(&mut self, status: i32) -> ! {
        panic!("ExitToShell({})", status);
    }

    fn debugger(&mut self) {
        self.debugger_hits += 1;
    }

    fn grow_heap(&mut self, increment: usize) -> Option<NonNull<u8>> {
        if self.fail_grow_heap {
            return None;
        }
        if increment == 0 {
            return Some(NonNull::dangling());
        }
        let block = vec![0u8; increment].leak();
        NonNull::new(block.as_mut_ptr())
    }
}
