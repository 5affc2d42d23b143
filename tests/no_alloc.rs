//! Verifies the allocation-free guarantee with a counting global allocator:
//! constructing, calling, taking, swapping, and dropping containers within
//! capacity must never touch the heap.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

use berth::InplaceFn;

struct CountingAlloc;

static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

// Single test in this binary so no concurrent test can disturb the count.
#[test]
fn test_lifecycle_performs_no_heap_allocation() {
    let baseline = ALLOCATIONS.load(Ordering::SeqCst);

    let payload = [1u8; 32];
    let mut a: InplaceFn<fn() -> u8, 64> = InplaceFn::new(move || payload[0]);
    let mut b: InplaceFn<fn() -> u8, 64> = InplaceFn::new(|| 2);

    assert_eq!(a.call(()), Ok(1));
    a.swap(&mut b);
    assert_eq!(a.call(()), Ok(2));
    assert_eq!(b.call(()), Ok(1));

    let c = a.take();
    assert!(a.is_empty());
    drop(b);
    drop(c);

    let mut d: InplaceFn<fn() -> u8, 64> = InplaceFn::default();
    assert!(d.call(()).is_err());
    drop(d);

    assert_eq!(ALLOCATIONS.load(Ordering::SeqCst), baseline);
}
