use std::sync::atomic::AtomicUsize;

/// Number of machine words at the front of a page, before the message buffer.
///
/// The protocol only uses the first three; the fourth is carried purely for
/// layout symmetry with the historical wire format this design descends from.
pub const HEADER_WORDS: usize = 4;
pub const HEADER_SIZE: usize = HEADER_WORDS * std::mem::size_of::<usize>();

/// High 8 bits of the composite word: in-flight writer count.
/// Low bits: next free byte offset.
pub const UNIT: usize = 1 << (usize::BITS as usize - 8);
pub const OFFSET_MASK: usize = UNIT - 1;

#[repr(C)]
pub struct PageHeader {
    pub is_ready: AtomicUsize,
    pub write_idx_lock: AtomicUsize,
    pub last_safe_write_idx: AtomicUsize,
    pub last_idx: AtomicUsize,
}

const _: () = assert!(std::mem::size_of::<PageHeader>() == HEADER_SIZE);

/// Extracts the byte offset from a composite `write_idx_lock` value.
#[inline]
pub fn offset_of(word: usize) -> usize {
    word & OFFSET_MASK
}

/// Extracts the in-flight writer count from a composite `write_idx_lock` value.
///
/// Uses the bitwise complement of the offset mask, not logical negation: a
/// logical negation of a nonzero mask collapses to a single bit and would
/// misreport almost every nonzero writer count as zero.
#[inline]
pub fn writers_of(word: usize) -> usize {
    (word & !OFFSET_MASK) >> (usize::BITS as usize - 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_word_has_no_writers_and_zero_offset() {
        assert_eq!(offset_of(0), 0);
        assert_eq!(writers_of(0), 0);
    }

    #[test]
    fn reservation_increments_offset_and_writer_count() {
        let word = UNIT + 128;
        assert_eq!(offset_of(word), 128);
        assert_eq!(writers_of(word), 1);
    }

    #[test]
    fn many_in_flight_writers_are_not_mistaken_for_zero() {
        let word = 3 * UNIT + 40;
        assert_eq!(offset_of(word), 40);
        assert_eq!(writers_of(word), 3);
    }

    #[test]
    fn offset_alone_reports_zero_writers() {
        // A regression guard for the historical `!mask` vs `~mask` confusion:
        // with any nonzero offset and zero writers, `writers_of` must be 0.
        assert_eq!(writers_of(OFFSET_MASK), 0);
    }
}
