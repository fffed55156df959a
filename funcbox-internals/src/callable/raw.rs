//! Type-erased callable pointer types.
//!
//! This module encapsulates the `ptr` and `vtable` fields of
//! [`RawCallable`], [`RawCallableRef`] and [`RawCallableMut`], ensuring they
//! are only visible within this module. This visibility restriction guarantees
//! the safety invariant: **the pointer always comes from `Box<F>`, and the
//! vtable was created for that same `F`**.
//!
//! # Safety Invariant
//!
//! Since the fields can only be set via [`RawCallable::new`] (which creates
//! the pointer from `Box::into_raw` and the vtable from
//! [`CallableVtable::new`] with the same `F`), and cannot be modified
//! afterward (no `pub` or `pub(crate)` fields), the pointer provenance and the
//! vtable remain valid throughout the value's lifetime.
//!
//! The [`RawCallable::drop`] implementation relies on this invariant to
//! safely reconstruct the `Box` and deallocate the memory.
//!
//! # Type Erasure
//!
//! The concrete callable type `F` is erased by casting the pointer to
//! `NonNull<Erased>`. The signature `S` is never erased, so invoking the
//! callable stays fully typed.
//!
//! The vtable is kept next to the pointer rather than inside the allocation.
//! The heap block therefore only holds the callable itself, and a zero-sized
//! callable such as a function item or a non-capturing closure is never
//! allocated.

use alloc::boxed::Box;
use core::{any::TypeId, marker::PhantomData, ptr::NonNull};

use crate::{
    callable::vtable::CallableVtable,
    signature::{Callable, Signature},
    util::Erased,
};

/// A pointer to an initialized callable of some specific type `F`, though we
/// do not know which actual `F` it is, together with the vtable for `F`.
///
/// However, the pointee is allowed to transition into a non-initialized state
/// inside the [`RawCallable::drop`] method.
///
/// The pointer is guaranteed to have been created using [`Box::into_raw`].
///
/// Cloning a [`RawCallable`] clones the captured callable into a fresh
/// allocation; two [`RawCallable`]s never share a callable.
pub struct RawCallable<S: Signature> {
    /// Pointer to the captured callable
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<F>` using
    ///    `Box::into_raw`, where `F` is the type `vtable` was created for.
    /// 2. The pointer will point to the same `F` for the entire lifetime of
    ///    this object.
    /// 3. The pointee is properly initialized for the entire lifetime of this
    ///    object, except during the execution of the `Drop` implementation.
    /// 4. This object is the unique owner of the pointee.
    ptr: NonNull<Erased>,
    /// The vtable of the captured callable
    vtable: &'static CallableVtable<S>,
}

impl<S: Signature> RawCallable<S> {
    /// Creates a new [`RawCallable`] that captures the specified callable.
    ///
    /// This allocates unless `F` is zero-sized.
    #[inline]
    pub fn new<F>(callable: F) -> Self
    where
        F: Callable<S> + Clone + 'static,
    {
        let ptr: *mut F = Box::into_raw(Box::new(callable));
        let ptr: *mut Erased = ptr.cast::<Erased>();

        // SAFETY: `Box::into_raw` returns a non-null pointer
        let ptr: NonNull<Erased> = unsafe { NonNull::new_unchecked(ptr) };

        Self {
            ptr,
            vtable: CallableVtable::new::<F>(),
        }
    }

    /// Returns a reference to the captured callable.
    #[inline]
    pub fn as_ref(&self) -> RawCallableRef<'_, S> {
        RawCallableRef {
            ptr: self.ptr,
            vtable: self.vtable,
            _marker: PhantomData,
        }
    }

    /// Returns a mutable reference to the captured callable.
    #[inline]
    pub fn as_mut(&mut self) -> RawCallableMut<'_, S> {
        RawCallableMut {
            ptr: self.ptr,
            vtable: self.vtable,
            _marker: PhantomData,
        }
    }
}

impl<S: Signature> Clone for RawCallable<S> {
    #[inline]
    fn clone(&self) -> Self {
        self.as_ref().clone_callable()
    }
}

impl<S: Signature> core::ops::Drop for RawCallable<S> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY:
        // 1. The pointer comes from `Box::into_raw` (guaranteed by
        //    `RawCallable::new`)
        // 2. `self.vtable` was created for the type stored behind the pointer.
        // 3. The pointer is initialized and has not been previously freed as guaranteed
        //    by the invariants on this type. We are correctly transferring ownership
        //    here and the pointer is not used afterwards, as we are in the drop
        //    function.
        unsafe {
            self.vtable.drop(self.ptr);
        }
    }
}

/// A lifetime-bound pointer to an initialized callable of some specific type
/// `F`, though we do not know which actual `F` it is.
///
/// We cannot use a `&'a F` directly, because that would require us to know
/// the actual type of the callable, which we do not.
#[derive(Clone, Copy)]
pub struct RawCallableRef<'a, S: Signature> {
    /// Pointer to the captured callable
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<F>` using
    ///    `Box::into_raw`, where `F` is the type `vtable` was created for.
    /// 2. The pointer will point to the same `F` for the entire lifetime of
    ///    this object.
    ptr: NonNull<Erased>,
    /// The vtable of the captured callable
    vtable: &'static CallableVtable<S>,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a Erased`
    _marker: PhantomData<&'a Erased>,
}

impl<'a, S: Signature> RawCallableRef<'a, S> {
    /// Returns the [`CallableVtable`] of the callable.
    #[inline]
    pub(super) fn vtable(self) -> &'static CallableVtable<S> {
        self.vtable
    }

    /// Returns a raw pointer to the callable.
    #[cfg(test)]
    pub(super) fn as_ptr(self) -> *const Erased {
        self.ptr.as_ptr()
    }

    /// Accesses the callable as a reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `F` matches the actual callable
    /// type.
    #[inline]
    pub unsafe fn downcast_unchecked<F: 'static>(self) -> &'a F {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.vtable.type_id(), TypeId::of::<F>());

        let this = self.ptr.cast::<F>();
        // SAFETY: Converting the NonNull pointer to a reference is sound because:
        // - The pointer is non-null, properly aligned, and dereferenceable (guaranteed
        //   by RawCallableRef's type invariants)
        // - The pointee is properly initialized and of type `F` (guaranteed by the
        //   type invariants and by the caller)
        // - Shared access is allowed
        // - The reference lifetime 'a is valid (tied to RawCallableRef<'a>'s
        //   lifetime)
        unsafe { this.as_ref() }
    }

    /// Returns the [`TypeId`] of the callable.
    #[inline]
    pub fn type_id(self) -> TypeId {
        self.vtable().type_id()
    }

    /// Returns the [`core::any::type_name`] of the callable.
    #[inline]
    pub fn type_name(self) -> &'static str {
        self.vtable().type_name()
    }

    /// Clones the callable into a new, independently owned [`RawCallable`]
    /// using the [`Clone`] implementation of the concrete callable type.
    #[inline]
    pub fn clone_callable(self) -> RawCallable<S> {
        let vtable = self.vtable();

        // SAFETY:
        // 1. `self.vtable` was created for the type stored behind the pointer.
        unsafe { vtable.clone(self) }
    }
}

/// A mutable lifetime-bound pointer to an initialized callable of some
/// specific type `F`, though we do not know which actual `F` it is.
///
/// We cannot use a `&'a mut F` directly, because that would require us to
/// know the actual type of the callable, which we do not.
pub struct RawCallableMut<'a, S: Signature> {
    /// Pointer to the captured callable
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<F>` using
    ///    `Box::into_raw`, where `F` is the type `vtable` was created for.
    /// 2. The pointer will point to the same `F` for the entire lifetime of
    ///    this object.
    /// 3. This pointer has exclusive access to the pointee for the lifetime
    ///    `'a`.
    ptr: NonNull<Erased>,
    /// The vtable of the captured callable
    vtable: &'static CallableVtable<S>,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a mut Erased`
    _marker: PhantomData<&'a mut Erased>,
}

impl<'a, S: Signature> RawCallableMut<'a, S> {
    /// Accesses the callable as a mutable reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `F` matches the actual callable
    /// type.
    #[inline]
    pub unsafe fn downcast_mut_unchecked<F: 'static>(self) -> &'a mut F {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.vtable.type_id(), TypeId::of::<F>());

        let mut this = self.ptr.cast::<F>();
        // SAFETY: Converting the NonNull pointer to a mutable reference is sound
        // because:
        // - The pointer is non-null, properly aligned, and dereferenceable (guaranteed
        //   by RawCallableMut's type invariants)
        // - The pointee is properly initialized and of type `F` (guaranteed by the
        //   type invariants and by the caller)
        // - Exclusive access is guaranteed by RawCallableMut's type invariants, and
        //   `self` is consumed so it cannot be used to alias the result
        unsafe { this.as_mut() }
    }

    /// Returns a shared reference to the callable.
    #[inline]
    pub fn as_ref(&self) -> RawCallableRef<'_, S> {
        RawCallableRef {
            ptr: self.ptr,
            vtable: self.vtable,
            _marker: PhantomData,
        }
    }

    /// Invokes the callable with the given arguments, using the
    /// [`Callable::invoke`] implementation of the concrete callable type.
    #[inline]
    pub fn invoke(self, args: S::Args) -> S::Output {
        let vtable = self.vtable;

        // SAFETY:
        // 1. `self.vtable` was created for the type stored behind the pointer.
        unsafe { vtable.call(self, args) }
    }
}
