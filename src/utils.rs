//! Alignment arithmetic helpers for the allocator. These are functions that
//! don't particularly belong to any concrete module of the crate.

/// Rounds `value` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two. This is used to promote requested
/// sizes to the heap's block granularity and to round buffer addresses
/// forward to their first usable position.
pub(crate) fn align_up(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) & !(alignment - 1)
}

/// Rounds `value` down to a multiple of `alignment`.
///
/// Bytes past the rounding point at the end of a buffer cannot hold a whole
/// block and stay permanently unused.
pub(crate) fn align_down(value: usize, alignment: usize) -> usize {
    value & !(alignment - 1)
}

/// Checked version of [`align_up`]. Returns `None` when rounding would wrap
/// around the integer range, which happens for values within one alignment
/// unit of `usize::MAX`.
pub(crate) fn align_up_checked(value: usize, alignment: usize) -> Option<usize> {
    let padded = value.checked_add(alignment - 1)?;
    Some(padded & !(alignment - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_pointer_size() {
        let alignments = vec![(1..=8, 8), (9..=16, 16), (17..=24, 24), (25..=32, 32)];

        for (values, expected) in alignments {
            for value in values {
                assert_eq!(expected, align_up(value, 8));
            }
        }
    }

    #[test]
    fn align_up_keeps_multiples() {
        for value in [0, 16, 32, 4096] {
            assert_eq!(value, align_up(value, 16));
        }
    }

    #[test]
    fn align_down_page_size() {
        assert_eq!(0, align_down(4095, 4096));
        assert_eq!(4096, align_down(4096, 4096));
        assert_eq!(4096, align_down(8191, 4096));
    }

    #[test]
    fn align_up_checked_detects_wraparound() {
        assert_eq!(Some(32), align_up_checked(17, 16));
        assert_eq!(None, align_up_checked(usize::MAX, 16));
        assert_eq!(None, align_up_checked(usize::MAX - 7, 16));
    }
}
