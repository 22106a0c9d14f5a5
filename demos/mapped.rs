//! Drives the unlocked [`Heap`] engine directly over an OS-mapped buffer,
//! printing the free-space accounting as blocks are carved out, freed,
//! and coalesced.

use blockalloc::Heap;
use blockalloc::kernel::MappedBuffer;

fn main() {
    pretty_env_logger::init();

    let buffer = MappedBuffer::new(16 * 1024).expect("cannot map a backing buffer");
    let mut heap = unsafe { Heap::new(buffer.ptr(), buffer.len(), 64) };

    println!("managing {} bytes at {:p}", heap.stats().total_size, buffer.ptr());

    let a = heap.alloc(500, 64).expect("out of memory");
    let b = heap.alloc(1000, 128).expect("out of memory");
    let c = heap.alloc(200, 64).expect("out of memory");

    for (name, ptr) in [("a", a), ("b", b), ("c", c)] {
        println!("{name} at {ptr:p}");
    }

    let stats = heap.stats();
    println!(
        "{} bytes free, largest block {}",
        stats.total_free_size, stats.largest_free_size
    );

    // Freeing the middle block leaves a gap; freeing its neighbors merges
    // everything back into one span.
    unsafe { heap.free(b, 1000) };
    println!("after freeing b: largest {}", heap.stats().largest_free_size);

    unsafe {
        heap.free(a, 500);
        heap.free(c, 200);
    }

    let stats = heap.stats();
    println!(
        "after teardown: {} of {} bytes free in one block of {}",
        stats.total_free_size, stats.total_size, stats.largest_free_size
    );
}
