//! This example exercises the `GlobalAlloc` implementation by installing
//! the allocator as the process-wide `#[global_allocator]`, backed by a
//! statically reserved region. `init` must run before the first heap
//! allocation; until then every request reports exhaustion.

use std::ptr::NonNull;
use std::thread;

use blockalloc::BlockAlloc;

#[global_allocator]
static ALLOCATOR: BlockAlloc = BlockAlloc::new();

#[repr(align(4096))]
struct Backing([u8; 1 << 20]);

static mut HEAP: Backing = Backing([0; 1 << 20]);

fn main() {
    unsafe {
        let buffer = NonNull::new(&raw mut HEAP).unwrap().cast::<u8>();
        ALLOCATOR.init(buffer, size_of::<Backing>(), 0);
    }

    // Box example
    let val_box = Box::new(22);
    println!("Box Value: {}, At: {:p}", val_box, val_box);

    // Vec example
    let mut v = Vec::new();
    for i in 0..5 {
        v.push(i * 10);
        println!("Added {}; Capacity: {}; At: {:p}", v[i], v.capacity(), v.as_ptr());
    }

    // String example
    let msg = String::from("Heap Testing");
    println!("\nString '{}' - At: {:p}", msg, msg.as_ptr());

    // Merge example: two adjacent blocks coalesce and get reused.
    let a = Box::new([0u8; 64]);
    let b = Box::new([0u8; 64]);
    let ptr_a = a.as_ptr();

    drop(a);
    drop(b);

    let c = Box::new([0u8; 128]);
    let ptr_c = c.as_ptr();

    if ptr_a == ptr_c {
        println!("Correctly reused at {:p}", ptr_c);
    } else {
        println!("Not correctly reused. A was at {:p} and C is at {:p}", ptr_a, ptr_c);
    }

    // Thread example test
    let t1 = thread::spawn(|| {
        let _ = Box::new(222);
    });

    let t2 = thread::spawn(|| {
        let _ = Box::new(222);
    });

    t1.join().unwrap();
    t2.join().unwrap();

    let stats = ALLOCATOR.stats().unwrap();
    println!("{} of {} bytes free", stats.total_free_size, stats.total_size);
}
