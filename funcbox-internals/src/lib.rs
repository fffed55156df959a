#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`funcbox`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased data structures and unsafe
//! operations that power the [`funcbox`] callable wrapper. It erases the
//! concrete type of a stored callable behind a hand-written vtable, in the
//! same way for every signature.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`funcbox`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`signature`]**: The call signature vocabulary
//!   - [`Signature`]: Implemented for function pointer types `fn(A, ..) -> R`
//!   - [`Callable`]: Implemented for everything that can be called with a
//!     given [`Signature`]
//!
//! - **[`callable`]**: Type-erased callable storage
//!   - [`RawCallable`]: Owned callable with [`Box`]-based allocation, paired
//!     with its vtable. Zero-sized callables are never allocated.
//!   - [`RawCallableRef`]/[`RawCallableMut`]: Borrowed references
//!     (shared/mutable)
//!   - [`CallableVtable`]: Function pointers for type-erased dispatch
//!
//! # Safety Strategy
//!
//! When we erase a pointer like `NonNull<MyFunctor>` to `NonNull<Erased>`, we
//! must ensure that the vtable function pointers stored next to it still match
//! the actual concrete type stored in memory.
//!
//! This crate maintains safety through:
//!
//! - **Module-based encapsulation**: Safety-critical types keep fields
//!   module-private, making invariants locally verifiable within a single file
//! - **Paired handles**: The erased pointer and its vtable are created together
//!   in one place and always travel together
//! - **Documented vtable contracts**: Each vtable method specifies exactly when
//!   it can be safely called
//!
//! [`funcbox`]: https://docs.rs/funcbox/latest/funcbox/
//! [`CallableVtable`]: callable::vtable::CallableVtable
//! [`Box`]: alloc::boxed::Box

extern crate alloc;

mod callable;
pub mod signature;
mod util;

pub use callable::{RawCallable, RawCallableMut, RawCallableRef};
pub use signature::{Callable, Signature};
