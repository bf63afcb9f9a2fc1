use std::fs::OpenOptions;
use std::path::Path;

use memmap2::MmapRaw;

use crate::error::{OpenError, PageFull};
use crate::header::{self, PageHeader};
use crate::read::{self, PopOutcome};
use crate::write;

/// A single file-backed shared-memory page, mapped read/write.
///
/// Cloning the handle is not supported; instead open the same path again
/// from another `Page::open` call (in this process or another) to obtain an
/// independent handle over the same bytes.
pub struct Page {
    map: MmapRaw,
    capacity: usize,
}

impl Page {
    /// Opens or creates the backing file at `path` and maps it shared,
    /// sized to hold `capacity` bytes of message data plus the header.
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Result<Self, OpenError> {
        if capacity >= header::UNIT {
            return Err(OpenError::CapacityTooLarge { capacity });
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path.as_ref())?;
        file.set_len((header::HEADER_SIZE + capacity) as u64)?;

        let map = MmapRaw::map_raw(&file)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.as_ref().display(), capacity, "opened page");

        Ok(Page { map, capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn header(&self) -> &PageHeader {
        // SAFETY: the mapping is at least HEADER_SIZE bytes, and PageHeader's
        // layout is repr(C) atomics matching the header words exactly.
        unsafe { &*(self.map.as_ptr() as *const PageHeader) }
    }

    fn buf_ptr(&self) -> *mut u8 {
        // SAFETY: the mapping reserves HEADER_SIZE + capacity bytes.
        unsafe { self.map.as_mut_ptr().add(header::HEADER_SIZE) }
    }

    fn buf(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.buf_ptr(), self.capacity) }
    }

    /// Appends `payload` to the page. Never blocks; its only failure mode is
    /// the page running out of room, which is terminal for this page.
    pub fn push(&self, payload: &[u8]) -> Result<usize, PageFull> {
        write::push(self.header(), self.buf_ptr(), self.capacity, payload)
    }

    /// Reads the message at `start_byte`, if any. Callers track their own
    /// cursor and advance it by the returned `frame_size`.
    pub fn pop(&self, start_byte: usize) -> PopOutcome<'_> {
        read::pop(self.header(), self.buf(), self.capacity, start_byte)
    }
}

// The mapping is backed by shared memory; every byte access is either
// confined to a disjoint reservation (writes) or gated by an acquire load
// establishing a happens-before edge (reads). Safe to hand the handle
// across threads, including to threads in other processes via re-opening
// the same path.
unsafe impl Send for Page {}
unsafe impl Sync for Page {}
