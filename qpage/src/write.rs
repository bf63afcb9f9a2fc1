use std::sync::atomic::Ordering;

use crate::frame;
use crate::header::{self, PageHeader};
use crate::error::PageFull;

/// Reserves space for `payload`, copies it in, and publishes it.
///
/// Never blocks and never retries; its only failure is the page having no
/// room left for a frame of this size, which is terminal for the page.
pub(crate) fn push(header: &PageHeader, buf: *mut u8, capacity: usize, payload: &[u8]) -> Result<usize, PageFull> {
    let need = frame::frame_size(payload.len());

    let prior = header
        .write_idx_lock
        .fetch_add(header::UNIT + need, Ordering::Relaxed);
    let start = header::offset_of(prior);

    if !frame::fits(start, payload.len(), capacity) {
        unsafe { frame::write_abort_sentinel(buf, start, capacity) };

        header.write_idx_lock.fetch_sub(header::UNIT, Ordering::Release);

        #[cfg(feature = "tracing")]
        tracing::debug!(start, len = payload.len(), capacity, "page full");

        return Err(PageFull { _inner: () });
    }

    unsafe { frame::write_frame(buf, start, payload) };

    header.write_idx_lock.fetch_sub(header::UNIT, Ordering::Release);

    Ok(need)
}
