//! Heap allocations made by [`funcbox::Function`].
//!
//! Allocations are counted per thread, so tests running in parallel do not
//! disturb each other.

use std::{
    alloc::{GlobalAlloc, Layout, System},
    cell::Cell,
};

use funcbox::Function;

struct CountingAllocator;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

// SAFETY: Every call is forwarded to `System` unchanged.
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let _ = ALLOCATIONS.try_with(|count| count.set(count.get() + 1));
        // SAFETY: Guaranteed by the caller
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: Guaranteed by the caller
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

fn allocations_during<R>(f: impl FnOnce() -> R) -> (R, usize) {
    let before = ALLOCATIONS.with(Cell::get);
    let result = f();
    let after = ALLOCATIONS.with(Cell::get);
    (result, after - before)
}

fn add(a: i32, b: i32) -> i32 {
    a + b
}

type Binary = fn(i32, i32) -> i32;

#[test]
fn test_function_item_does_not_allocate() {
    // Lazily initialized runtime state must not be counted
    let _ = Function::<Binary>::new(add).call((0, 0));

    let (mut function, allocations) = allocations_during(|| Function::<Binary>::new(add));
    assert_eq!(allocations, 0);
    assert!(!function.holds_fn_ptr());

    let (mut copy, allocations) = allocations_during(|| function.clone());
    assert_eq!(allocations, 0);

    let (results, allocations) = allocations_during(|| [function.call((2, 3)), copy.call((4, 5))]);
    assert_eq!(allocations, 0);
    assert_eq!(results, [Ok(5), Ok(9)]);
}

#[test]
fn test_captureless_closure_and_pointer_do_not_allocate() {
    let sub = |a: i32, b: i32| a - b;
    let _ = Function::<Binary>::new(sub).call((0, 0));

    let (mut closure, allocations) = allocations_during(|| Function::<Binary>::new(sub));
    assert_eq!(allocations, 0);
    assert_eq!(closure.call((5, 3)), Ok(2));

    let (pointer, allocations) = allocations_during(|| Function::<Binary>::new(add as Binary));
    assert_eq!(allocations, 0);
    assert!(pointer.holds_fn_ptr());

    let (mut copy, allocations) = allocations_during(|| pointer.clone());
    assert_eq!(allocations, 0);
    assert_eq!(copy.call((1, 1)), Ok(2));
}

#[test]
fn test_capturing_closure_allocates_once() {
    let offset = 10;
    let add_offset = move |a: i32, b: i32| a + b + offset;
    let _ = Function::<Binary>::new(add_offset).call((0, 0));

    let (function, allocations) = allocations_during(|| Function::<Binary>::new(add_offset));
    assert_eq!(allocations, 1);

    let (mut copy, allocations) = allocations_during(|| function.clone());
    assert_eq!(allocations, 1);
    assert_eq!(copy.call((1, 2)), Ok(13));
}
