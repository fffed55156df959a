//! Call signatures and the callables that satisfy them.
//!
//! A call signature is spelled as a function pointer type, for example
//! `fn(i32, i32) -> i32`. The [`Signature`] trait is implemented for such
//! types for up to twelve arguments, and exposes the argument list as a
//! tuple so that the rest of the crate can be generic over arity.
//!
//! [`Callable<S>`] is the capability "can be invoked with the arguments of
//! `S`, returning the output of `S`". It is blanket-implemented for every
//! [`FnMut`] with the right shape, which covers function items, function
//! pointers, and closures. Functor types implement it by hand:
//!
//! ```
//! use funcbox_internals::Callable;
//!
//! #[derive(Clone)]
//! struct Offset(i32);
//!
//! impl Callable<fn(i32) -> i32> for Offset {
//!     fn invoke(&mut self, (x,): (i32,)) -> i32 {
//!         self.0 + x
//!     }
//! }
//! ```

/// Seals [`Signature`] so that only function pointer types implement it.
mod sealed {
    /// Supertrait of [`Signature`](super::Signature) that cannot be named
    /// outside this crate.
    pub trait Sealed {}
}

/// A call signature, spelled as a function pointer type.
///
/// The implementing type doubles as the type of the raw function pointer that
/// matches the signature exactly.
pub trait Signature: sealed::Sealed + Copy + Send + Sync + 'static {
    /// The argument list, as a tuple. `fn(A, B) -> R` has `Args = (A, B)` and
    /// `fn(A) -> R` has `Args = (A,)`.
    type Args: 'static;
    /// The result type.
    type Output: 'static;

    /// Calls the function pointer, spreading `args` over its parameters.
    fn apply(self, args: Self::Args) -> Self::Output;
}

/// A value that can be invoked with the arguments of the signature `S`.
pub trait Callable<S: Signature> {
    /// Invokes the callable, spreading `args` over its parameters.
    fn invoke(&mut self, args: S::Args) -> S::Output;
}

/// Implements [`Signature`] and the blanket [`Callable`] for one arity.
macro_rules! impl_signature {
    ($($arg:ident),*) => {
        impl<Ret: 'static, $($arg: 'static),*> sealed::Sealed for fn($($arg),*) -> Ret {}

        impl<Ret: 'static, $($arg: 'static),*> Signature for fn($($arg),*) -> Ret {
            type Args = ($($arg,)*);
            type Output = Ret;

            #[inline]
            #[allow(non_snake_case)]
            fn apply(self, ($($arg,)*): Self::Args) -> Ret {
                self($($arg),*)
            }
        }

        impl<Func, Ret: 'static, $($arg: 'static),*> Callable<fn($($arg),*) -> Ret> for Func
        where
            Func: FnMut($($arg),*) -> Ret,
        {
            #[inline]
            #[allow(non_snake_case)]
            fn invoke(&mut self, ($($arg,)*): ($($arg,)*)) -> Ret {
                self($($arg),*)
            }
        }
    };
}

impl_signature!();
impl_signature!(A1);
impl_signature!(A1, A2);
impl_signature!(A1, A2, A3);
impl_signature!(A1, A2, A3, A4);
impl_signature!(A1, A2, A3, A4, A5);
impl_signature!(A1, A2, A3, A4, A5, A6);
impl_signature!(A1, A2, A3, A4, A5, A6, A7);
impl_signature!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_signature!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_signature!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_signature!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_signature!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);
