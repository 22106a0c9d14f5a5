//! Platform support for obtaining backing buffers from the operating
//! system.
//!
//! The allocator itself never talks to the OS; it manages whatever buffer
//! it is handed and nothing else. This module is the convenient way to get
//! a page-aligned buffer on a hosted platform, when there is no statically
//! reserved region to manage. Embedded users ignore it and pass their
//! reserved RAM directly to [`crate::Heap::new`].

use std::{
    ptr::NonNull,
    sync::atomic::{AtomicUsize, Ordering},
};

use thiserror::Error;

use crate::utils::align_up;

/// Cached OS page size. Zero until first queried.
static PAGE_SIZE: AtomicUsize = AtomicUsize::new(0);

/// Marker type the platform-specific syscall implementations hang off.
struct Kernel;

/// This trait provides an abstraction to handle low level memory
/// operations and syscalls, as the rest of the crate has nothing to do
/// with the concrete APIs offered by each kernel.
trait PlatformMemory {
    /// Requests a memory region of size `len`. Returns a pointer to the
    /// mapped location or `None` if the underlying syscall fails.
    unsafe fn request_memory(len: usize) -> Option<NonNull<u8>>;

    /// Returns the memory of size `len` starting from `addr` back to the
    /// kernel.
    unsafe fn return_memory(addr: *mut u8, len: usize);

    /// Returns the virtual memory page size of the computer in bytes.
    unsafe fn page_size() -> usize;
}

/// Failure to obtain memory from the operating system.
#[derive(Debug, Error)]
pub enum MapError {
    /// The kernel refused the mapping, usually because the system is out
    /// of address space or commit budget.
    #[error("the system refused to map {0} bytes")]
    Map(usize),
}

/// Page-aligned memory region owned by this process, returned to the
/// kernel on drop.
///
/// The region makes a natural backing buffer for [`crate::Heap`]: page
/// alignment satisfies any reasonable block alignment, so none of the
/// buffer is lost to the heap's start adjustment.
pub struct MappedBuffer {
    ptr: NonNull<u8>,
    len: usize,
}

impl MappedBuffer {
    /// Maps at least `len` bytes of zeroed, read-write memory, rounded up
    /// to whole pages.
    pub fn new(len: usize) -> Result<Self, MapError> {
        let len = align_up(len, page_size());
        let ptr = unsafe { Kernel::request_memory(len) }.ok_or(MapError::Map(len))?;

        log::debug!("mapped {len} bytes at {ptr:p}");

        Ok(Self { ptr, len })
    }

    /// Start of the mapped region.
    pub fn ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    /// Length of the mapped region in bytes, a whole number of pages.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for MappedBuffer {
    fn drop(&mut self) {
        log::trace!("unmapping {} bytes at {:p}", self.len, self.ptr);

        unsafe { Kernel::return_memory(self.ptr.as_ptr(), self.len) };
    }
}

/// Cached wrapper around the page size syscall.
pub fn page_size() -> usize {
    match PAGE_SIZE.load(Ordering::Relaxed) {
        0 => {
            let size = unsafe { Kernel::page_size() };
            PAGE_SIZE.store(size, Ordering::Relaxed);
            size
        }
        size => size,
    }
}

#[cfg(unix)]
mod unix {
    use std::{os::raw::c_void, ptr, ptr::NonNull};

    use super::{Kernel, PlatformMemory};

    impl PlatformMemory for Kernel {
        unsafe fn request_memory(len: usize) -> Option<NonNull<u8>> {
            // Private anonymous read-write pages with no backing file.
            let prot = libc::PROT_READ | libc::PROT_WRITE;
            let flags = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS;

            unsafe {
                let addr = libc::mmap(ptr::null_mut::<c_void>(), len, prot, flags, -1, 0);

                if addr == libc::MAP_FAILED {
                    None
                } else {
                    Some(NonNull::new_unchecked(addr).cast::<u8>())
                }
            }
        }

        unsafe fn return_memory(addr: *mut u8, len: usize) {
            unsafe {
                libc::munmap(addr.cast::<c_void>(), len);
            }
        }

        unsafe fn page_size() -> usize {
            unsafe { libc::sysconf(libc::_SC_PAGE_SIZE) as usize }
        }
    }
}

#[cfg(windows)]
mod windows {
    use std::{mem::MaybeUninit, os::raw::c_void, ptr::NonNull};

    use windows::Win32::System::{Memory, SystemInformation};

    use super::{Kernel, PlatformMemory};

    impl PlatformMemory for Kernel {
        unsafe fn request_memory(len: usize) -> Option<NonNull<u8>> {
            let flags = Memory::MEM_RESERVE | Memory::MEM_COMMIT;

            unsafe {
                let addr = Memory::VirtualAlloc(None, len, flags, Memory::PAGE_READWRITE);

                NonNull::new(addr.cast())
            }
        }

        unsafe fn return_memory(addr: *mut u8, _len: usize) {
            unsafe {
                let _ = Memory::VirtualFree(addr as *mut c_void, 0, Memory::MEM_RELEASE);
            }
        }

        unsafe fn page_size() -> usize {
            unsafe {
                let mut system_info = MaybeUninit::uninit();
                SystemInformation::GetSystemInfo(system_info.as_mut_ptr());

                system_info.assume_init().dwPageSize as usize
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_a_power_of_two() {
        assert!(page_size().is_power_of_two());
        // The cached value must be stable.
        assert_eq!(page_size(), page_size());
    }

    #[test]
    fn mapped_buffer_is_page_aligned() {
        let buffer = MappedBuffer::new(10_000).unwrap();

        assert!(buffer.len() >= 10_000);
        assert_eq!(0, buffer.len() % page_size());
        assert_eq!(0, buffer.ptr().as_ptr() as usize % page_size());
    }

    #[test]
    fn mapped_buffer_is_writable() {
        let buffer = MappedBuffer::new(4096).unwrap();

        unsafe {
            buffer.ptr().as_ptr().write_bytes(0xAB, buffer.len());
            assert_eq!(0xAB, *buffer.ptr().as_ptr().add(buffer.len() - 1));
        }
    }
}
