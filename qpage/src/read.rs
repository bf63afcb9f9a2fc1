use std::sync::atomic::Ordering;

use crate::frame::{self, DecodeOutcome, END_OF_PAGE};
use crate::header::{self, PageHeader};

/// Stable status codes for [`pop`], numbered to match the external interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ReadStatus {
    Success = 0,
    Finished = 1,
    Empty = 2,
    Error = -1,
}

/// One popped message, or the reason none was available.
pub struct PopOutcome<'a> {
    pub status: ReadStatus,
    pub data: &'a [u8],
    /// Bytes the caller must add to its cursor to reach the next message.
    /// Zero when `status` is not [`ReadStatus::Success`].
    pub frame_size: usize,
}

impl<'a> PopOutcome<'a> {
    fn empty(status: ReadStatus) -> Self {
        PopOutcome {
            status,
            data: &[],
            frame_size: 0,
        }
    }
}

/// Determines the largest byte offset known to be fully committed by every
/// writer that had reserved space before this call, spinning if the cached
/// hint is stale.
fn acquire_horizon(header: &PageHeader, start_byte: usize, capacity: usize) -> usize {
    let mut end = header.last_safe_write_idx.load(Ordering::Relaxed);

    if end <= start_byte {
        loop {
            let word = header.write_idx_lock.load(Ordering::Acquire);
            if header::writers_of(word) == 0 {
                end = header::offset_of(word);
                break;
            }
            std::thread::yield_now();
        }

        header.last_safe_write_idx.store(end, Ordering::Relaxed);
    }

    end.min(capacity)
}

pub(crate) fn pop<'a>(
    header: &PageHeader,
    buf: &'a [u8],
    capacity: usize,
    start_byte: usize,
) -> PopOutcome<'a> {
    let horizon = acquire_horizon(header, start_byte, capacity);

    if horizon <= start_byte {
        return PopOutcome::empty(ReadStatus::Empty);
    }

    if buf[start_byte] == END_OF_PAGE {
        return PopOutcome::empty(ReadStatus::Finished);
    }

    let outcome = unsafe { frame::decode(buf.as_ptr(), start_byte, horizon) };

    match outcome {
        DecodeOutcome::Success {
            payload_start,
            payload_len,
            frame_size,
        } => PopOutcome {
            status: ReadStatus::Success,
            data: &buf[payload_start..payload_start + payload_len],
            frame_size,
        },
        DecodeOutcome::NotReady => PopOutcome::empty(ReadStatus::Empty),
        DecodeOutcome::Error => {
            #[cfg(feature = "tracing")]
            tracing::warn!(start_byte, horizon, "terminator not found within horizon");

            PopOutcome::empty(ReadStatus::Error)
        }
    }
}
