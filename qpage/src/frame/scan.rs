use super::{DecodeOutcome, END_OF_PAGE, TERMINATOR};

pub fn frame_size(len: usize) -> usize {
    len + 1
}

/// Whether a reservation of `len` bytes starting at `start` fits, leaving
/// room for the terminator and, if it doesn't fit, the end-of-page sentinel.
pub fn fits(start: usize, len: usize, capacity: usize) -> bool {
    start + len < capacity.saturating_sub(1)
}

/// # Safety
/// `start .. start + payload.len() + 1` must be a reserved range exclusively
/// owned by the caller, within `buf`'s allocation.
pub unsafe fn write_frame(buf: *mut u8, start: usize, payload: &[u8]) {
    unsafe {
        std::ptr::copy_nonoverlapping(payload.as_ptr(), buf.add(start), payload.len());
        *buf.add(start + payload.len()) = TERMINATOR;
    }
}

/// # Safety
/// `start` must be within `buf`'s allocation and exclusively owned by the caller.
pub unsafe fn write_abort_sentinel(buf: *mut u8, start: usize, capacity: usize) {
    if start < capacity.saturating_sub(1) {
        unsafe {
            *buf.add(start) = END_OF_PAGE;
        }
    }
}

/// # Safety
/// `start` and `horizon` must be within `buf`'s allocation, with `horizon <= capacity`.
pub unsafe fn decode(buf: *const u8, start: usize, horizon: usize) -> DecodeOutcome {
    let mut i = start;
    while i < horizon {
        if unsafe { *buf.add(i) } == TERMINATOR {
            return DecodeOutcome::Success {
                payload_start: start,
                payload_len: i - start,
                frame_size: i - start + 1,
            };
        }
        i += 1;
    }
    DecodeOutcome::Error
}
