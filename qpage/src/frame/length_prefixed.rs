use super::{DecodeOutcome, TERMINATOR, WORD};

pub fn frame_size(len: usize) -> usize {
    WORD + len + 1
}

pub fn fits(start: usize, len: usize, capacity: usize) -> bool {
    start + len < capacity
}

/// # Safety
/// `start .. start + WORD + payload.len() + 1` must be a reserved range
/// exclusively owned by the caller, within `buf`'s allocation.
pub unsafe fn write_frame(buf: *mut u8, start: usize, payload: &[u8]) {
    unsafe {
        let len = payload.len();
        std::ptr::copy_nonoverlapping(len.to_ne_bytes().as_ptr(), buf.add(start), WORD);
        std::ptr::copy_nonoverlapping(payload.as_ptr(), buf.add(start + WORD), len);
        *buf.add(start + WORD + len) = TERMINATOR;
    }
}

/// This variant never writes a sentinel on abort: a reader recomputes the
/// frame length from the length prefix, so there is nothing to skip past.
pub unsafe fn write_abort_sentinel(_buf: *mut u8, _start: usize, _capacity: usize) {}

/// # Safety
/// `start` must be within `buf`'s allocation, with at least `WORD` bytes
/// readable at `start` and `horizon <= capacity`.
pub unsafe fn decode(buf: *const u8, start: usize, horizon: usize) -> DecodeOutcome {
    let len = unsafe {
        let mut raw = [0u8; WORD];
        std::ptr::copy_nonoverlapping(buf.add(start), raw.as_mut_ptr(), WORD);
        usize::from_ne_bytes(raw)
    };

    let terminator_idx = start + WORD + len;
    if terminator_idx >= horizon || unsafe { *buf.add(terminator_idx) } != TERMINATOR {
        return DecodeOutcome::NotReady;
    }

    DecodeOutcome::Success {
        payload_start: start + WORD,
        payload_len: len,
        frame_size: WORD + len + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_size_accounts_for_length_word_and_terminator() {
        assert_eq!(frame_size(0), WORD + 1);
        assert_eq!(frame_size(4), WORD + 5);
    }

    #[test]
    fn write_then_decode_round_trips() {
        let mut buf = [0u8; 32];
        unsafe { write_frame(buf.as_mut_ptr(), 0, b"abcd") };

        match unsafe { decode(buf.as_ptr(), 0, buf.len()) } {
            DecodeOutcome::Success {
                payload_start,
                payload_len,
                frame_size,
            } => {
                assert_eq!(payload_len, 4);
                assert_eq!(frame_size, WORD + 5);
                assert_eq!(&buf[payload_start..payload_start + payload_len], b"abcd");
            }
            _ => panic!("expected a successful decode"),
        }
    }

    #[test]
    fn terminator_outside_horizon_is_not_ready() {
        let mut buf = [0u8; 32];
        unsafe { write_frame(buf.as_mut_ptr(), 0, b"abcd") };

        // Horizon hasn't advanced past the terminator byte yet.
        assert!(matches!(
            unsafe { decode(buf.as_ptr(), 0, WORD + 4) },
            DecodeOutcome::NotReady
        ));
    }
}
