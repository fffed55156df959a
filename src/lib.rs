#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A cloneable, type-erased container for any callable matching a fixed
//! signature.
//!
//! ## Overview
//!
//! [`Function<S>`] holds one callable (a function, a function pointer, a
//! closure or a functor type) that can be called with the arguments of the
//! signature `S`. Heterogeneous callables of the same signature can then be
//! stored, cloned and invoked uniformly, without generic parameters leaking
//! into the code that stores them.
//!
//! The signature is written as a function pointer type:
//!
//! ```
//! use funcbox::Function;
//!
//! fn add(a: i32, b: i32) -> i32 {
//!     a + b
//! }
//!
//! struct Calculator {
//!     operations: Vec<Function<fn(i32, i32) -> i32>>,
//! }
//!
//! let bias = 100;
//! let mut calculator = Calculator {
//!     operations: vec![
//!         Function::new(add),
//!         Function::new(|a: i32, b: i32| a * b),
//!         Function::new(move |a: i32, b: i32| a - b + bias),
//!     ],
//! };
//!
//! let results: Vec<i32> = calculator
//!     .operations
//!     .iter_mut()
//!     .map(|op| op.call((6, 3)))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(results, [9, 18, 103]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Signatures** are function pointer types such as `fn(&'static str) ->
//!   usize`, implementing [`Signature`]. Arguments are passed to
//!   [`Function::call`] as a tuple: `f.call((a, b))`, `f.call((a,))`,
//!   `f.call(())`.
//! - **Callables** implement [`Callable<S>`]. Every [`FnMut`] of the right
//!   shape does so automatically; functor types can implement it by hand.
//! - **Empty wrappers** are created with [`Function::empty`],
//!   [`Function::default`] or `Function::from(None)`. Calling one returns
//!   [`BadFunctionCall`].
//! - **Copies are deep**: [`Clone`] clones the held callable, so copies never
//!   share state.
//! - **Function pointers are stored inline**: a callable whose type is exactly
//!   `S` is neither boxed nor called through a vtable. Zero-sized callables
//!   (function items, closures without captures) are boxed without
//!   allocating.
//! - **Signature types are `'static`**: every argument and result type of `S`
//!   must be `'static`, so reference parameters are written `&'static T`.
//!   Callbacks that receive a short-lived borrow, such as
//!   `fn(&mut Vec<u8>)` applied to a local buffer, are not supported.
//!
//! ## Thread Safety
//!
//! By default a [`Function`] only accepts `Send + Sync` callables and is
//! itself `Send + Sync`. Use [`markers::Local`] to store callables that are
//! not. See the [`markers`] module for details.
//!
//! ## Error Handling
//!
//! [`BadFunctionCall`] implements [`core::error::Error`], so it works with `?`
//! and any error reporting library:
//!
//! ```
//! use funcbox::{BadFunctionCall, Function};
//!
//! fn notify(listener: &mut Function<fn(u32)>, event: u32) -> Result<(), BadFunctionCall> {
//!     listener.call((event,))?;
//!     Ok(())
//! }
//!
//! let mut nobody: Function<fn(u32)> = Function::empty();
//! assert_eq!(notify(&mut nobody, 1), Err(BadFunctionCall));
//! ```
//!
//! ## Features
//!
//! - `tracing`: Emit [`tracing`](https://docs.rs/tracing) events under the
//!   `funcbox` target when callables are wrapped and cloned (`TRACE`), and
//!   when an empty wrapper is called (`DEBUG`).

extern crate alloc;

mod macros;

mod error;
mod function;
pub mod markers;
pub mod prelude;

pub use funcbox_internals::{Callable, Signature};

pub use self::{
    error::BadFunctionCall,
    function::{Function, swap},
};
