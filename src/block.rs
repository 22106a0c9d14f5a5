use std::{mem, ptr::NonNull};

use static_assertions::const_assert;

/// Nullable pointer to the next free block.
pub(crate) type Link = Option<NonNull<BlockHeader>>;

/// Size of the boundary tag in bytes. Block addresses and block sizes are
/// always multiples of at least this value, so every free block can hold
/// its own header.
pub(crate) const BLOCK_HEADER_SIZE: usize = mem::size_of::<BlockHeader>();

// The header must itself be a valid block granularity.
const_assert!(BLOCK_HEADER_SIZE.is_power_of_two());
const_assert!(BLOCK_HEADER_SIZE >= mem::align_of::<BlockHeader>());

/// Boundary tag written in place at the start of every free block.
///
/// Only free blocks carry a header; a block handed out by the allocator is
/// opaque until the caller frees it again, reporting the size it remembers
/// requesting. The header lives inside the capacity it describes:
///
/// ```text
/// +------------------------+ <--------+
/// |         next           |          |
/// +------------------------+          | -> BlockHeader
/// |         size           |          |
/// +------------------------+ <--------+
/// |                        |
/// |      Free capacity     |
/// |        (unused)        |
/// |          ...           |
/// +------------------------+
/// ```
///
/// `size` counts the whole block including the header, so two blocks are
/// byte-adjacent exactly when `addr + size` of the first equals the address
/// of the second.
pub(crate) struct BlockHeader {
    /// Next free block in ascending address order, `None` for the last.
    pub next: Link,
    /// Size of this free block in bytes, header included.
    pub size: usize,
}

impl BlockHeader {
    /// Address of the block this header starts.
    pub fn addr(node: NonNull<BlockHeader>) -> usize {
        node.as_ptr() as usize
    }
}
