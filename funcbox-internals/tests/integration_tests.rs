//! Integration tests for the funcbox-internals crate.
//!
//! ## Dispatch Tests
//! - `test_closure_dispatch`: Closures with captured state are invoked through
//!   the vtable
//! - `test_functor_dispatch`: Hand-written [`Callable`] implementations
//! - `test_unit_and_owned_arguments`: Unit results and moved arguments
//!
//! ## Clone Tests
//! - `test_clone_independence`: Clones diverge when invoked separately
//! - `test_clone_of_clone`: Clone chains keep the type identity
//!
//! ## Memory Management Tests
//! - `test_clone_and_drop_behavior`: Every captured value is dropped exactly
//!   once, regardless of clone count and drop order

use std::{
    any::TypeId,
    cell::{Cell, RefCell},
    rc::Rc,
};

use funcbox_internals::{Callable, RawCallable};

#[derive(Clone, Debug, PartialEq)]
struct Scaler {
    factor: i64,
}

impl Callable<fn(i64) -> i64> for Scaler {
    fn invoke(&mut self, (x,): (i64,)) -> i64 {
        self.factor * x
    }
}

struct DropCounter {
    drops: Rc<Cell<usize>>,
}

impl Clone for DropCounter {
    fn clone(&self) -> Self {
        DropCounter {
            drops: Rc::clone(&self.drops),
        }
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

impl Callable<fn() -> usize> for DropCounter {
    fn invoke(&mut self, (): ()) -> usize {
        self.drops.get()
    }
}

#[test]
fn test_closure_dispatch() {
    let prefix = String::from("hello, ");
    let mut raw = RawCallable::<fn(&'static str) -> String>::new(move |name: &'static str| {
        format!("{prefix}{name}")
    });

    assert_eq!(raw.as_mut().invoke(("world",)), "hello, world");
    assert_eq!(raw.as_mut().invoke(("there",)), "hello, there");
}

#[test]
fn test_functor_dispatch() {
    let mut raw = RawCallable::<fn(i64) -> i64>::new(Scaler { factor: 3 });
    assert_eq!(raw.as_mut().invoke((7,)), 21);
    assert_eq!(raw.as_ref().type_id(), TypeId::of::<Scaler>());
    assert!(raw.as_ref().type_name().ends_with("Scaler"));

    // SAFETY: The callable stored in `raw` is a `Scaler`
    let scaler = unsafe { raw.as_mut().downcast_mut_unchecked::<Scaler>() };
    scaler.factor = -1;
    assert_eq!(raw.as_mut().invoke((7,)), -7);
}

#[test]
fn test_unit_and_owned_arguments() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let mut raw = RawCallable::<fn(String, Vec<u8>)>::new(move |s: String, bytes: Vec<u8>| {
        sink.borrow_mut().push(format!("{s}:{}", bytes.len()));
    });

    raw.as_mut().invoke((String::from("a"), vec![1, 2, 3]));
    raw.as_mut().invoke((String::from("b"), Vec::new()));
    assert_eq!(*log.borrow(), ["a:3", "b:0"]);
}

#[test]
fn test_clone_independence() {
    let mut total = 100;
    let mut first = RawCallable::<fn(i32) -> i32>::new(move |x: i32| {
        total += x;
        total
    });
    assert_eq!(first.as_mut().invoke((1,)), 101);

    let mut second = first.clone();
    assert_eq!(first.as_mut().invoke((10,)), 111);
    assert_eq!(second.as_mut().invoke((-1,)), 100);
    assert_eq!(first.as_mut().invoke((0,)), 111);
    assert_eq!(second.as_mut().invoke((0,)), 100);
}

#[test]
fn test_clone_of_clone() {
    let original = RawCallable::<fn(i64) -> i64>::new(Scaler { factor: 2 });
    let copy = original.clone();
    let mut copy_of_copy = copy.clone();
    drop(original);
    drop(copy);

    assert_eq!(copy_of_copy.as_ref().type_id(), TypeId::of::<Scaler>());
    // SAFETY: The callable stored in `copy_of_copy` is a `Scaler`
    let scaler = unsafe { copy_of_copy.as_ref().downcast_unchecked::<Scaler>() };
    assert_eq!(*scaler, Scaler { factor: 2 });
    assert_eq!(copy_of_copy.as_mut().invoke((21,)), 42);
}

#[test]
fn test_clone_and_drop_behavior() {
    let drops = Rc::new(Cell::new(0));
    let raw = RawCallable::<fn() -> usize>::new(DropCounter {
        drops: Rc::clone(&drops),
    });
    let clones: Vec<_> = (0..4).map(|_| raw.clone()).collect();
    assert_eq!(Rc::strong_count(&drops), 6);
    assert_eq!(drops.get(), 0);

    drop(raw);
    assert_eq!(drops.get(), 1);

    let mut clones = clones.into_iter().rev();
    let mut last = clones.next().expect("four clones were made");
    drop(clones);
    assert_eq!(drops.get(), 4);
    assert_eq!(last.as_mut().invoke(()), 4);

    drop(last);
    assert_eq!(drops.get(), 5);
    assert_eq!(Rc::strong_count(&drops), 1);
}
