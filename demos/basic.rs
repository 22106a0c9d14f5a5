use std::alloc::Layout;
use std::ptr::NonNull;

use blockalloc::BlockAlloc;
use blockalloc::kernel::MappedBuffer;

fn log_alloc(addr: Option<NonNull<u8>>, layout: Layout) {
    println!("Requested {} bytes of memory", layout.size());
    println!("Received this address: {addr:?}");
}

fn main() {
    pretty_env_logger::init();

    let buffer = MappedBuffer::new(64 * 1024).expect("cannot map a backing buffer");
    let allocator = BlockAlloc::new();
    unsafe {
        allocator.init(buffer.ptr(), buffer.len(), 0);
    }

    let l1 = Layout::new::<u64>();
    let addr1 = allocator.allocate(l1);
    log_alloc(addr1, l1);

    let l2 = Layout::array::<u8>(8).unwrap();
    let addr2 = allocator.allocate(l2);
    log_alloc(addr2, l2);

    let l3 = Layout::array::<u8>(16).unwrap();
    let addr3 = allocator.allocate(l3);
    log_alloc(addr3, l3);

    let stats = allocator.stats().unwrap();
    println!(
        "{} of {} bytes free, largest block {}",
        stats.total_free_size, stats.total_size, stats.largest_free_size
    );

    unsafe {
        allocator.deallocate(addr1.unwrap(), l1);
        allocator.deallocate(addr2.unwrap(), l2);
        allocator.deallocate(addr3.unwrap(), l3);
    }

    let stats = allocator.stats().unwrap();
    println!("{} of {} bytes free after teardown", stats.total_free_size, stats.total_size);
}
