//! Marker types and traits for defining thread-safety semantics.
//!
//! The second type parameter of [`Function<S, T>`](crate::Function) is a
//! thread-safety marker:
//!
//! - [`SendSync`]: The wrapper only accepts callables that are `Send + Sync`,
//!   and is therefore itself `Send + Sync`. This is the default.
//! - [`Local`]: The wrapper accepts any callable (for example closures that
//!   capture an `Rc`), and is neither `Send` nor `Sync`.
//!
//! # Design Philosophy
//!
//! The constraints encoded by these markers are enforced at construction time.
//! It is impossible to construct a `Function<_, SendSync>` that holds a
//! callable which is not `Send + Sync`, so you can trust that such a wrapper
//! truly is `Send + Sync`.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//!
//! use funcbox::{Function, markers};
//!
//! // Thread-safe wrapper around a closure capturing a `String`
//! let greeting = String::from("hello");
//! let mut thread_safe: Function<fn() -> usize, markers::SendSync> =
//!     Function::new(move || greeting.len());
//!
//! // Can be sent to another thread
//! std::thread::spawn(move || {
//!     assert_eq!(thread_safe.call(()), Ok(5));
//! })
//! .join()
//! .unwrap();
//!
//! // Local wrapper around a closure capturing an `Rc`
//! let shared = Rc::new(5);
//! let mut local: Function<fn() -> i32, markers::Local> = Function::new(move || *shared);
//! assert_eq!(local.call(()), Ok(5));
//! // `local` cannot be sent to another thread - won't compile
//! ```

/// Marker type indicating that a [`Function`](crate::Function) and its
/// callable are `Send + Sync`.
///
/// This is the default thread-safety marker.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct SendSync;

/// Marker type indicating that a [`Function`](crate::Function) may hold a
/// callable that is not `Send` or `Sync`.
///
/// A `Function<S, SendSync>` can always be turned into a `Function<S, Local>`
/// with [`Function::into_local`](crate::Function::into_local).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Local;

mod sealed_object_marker {
    use super::*;

    pub trait Sealed<T>: 'static {}

    impl<O: Sized + 'static> Sealed<Local> for O {}
    impl<O: Sized + 'static> Sealed<SendSync> for O where O: Send + Sync {}
}

/// Marker trait combining an object type with a thread-safety marker.
///
/// `O: ObjectMarkerFor<Local>` holds for every `'static` type, while
/// `O: ObjectMarkerFor<SendSync>` additionally requires `O: Send + Sync`.
/// [`Function::new`](crate::Function::new) requires the callable to
/// implement `ObjectMarkerFor<T>` for the wrapper's marker `T`.
///
/// This trait is sealed and cannot be implemented outside this crate.
pub trait ObjectMarkerFor<T>: sealed_object_marker::Sealed<T> + Sized + 'static {}

impl<O: Sized + 'static> ObjectMarkerFor<Local> for O {}
impl<O: Sized + 'static> ObjectMarkerFor<SendSync> for O where O: Send + Sync {}
