//! Vtable for type-erased callable operations.
//!
//! This module contains the [`CallableVtable`] which enables cloning, calling
//! and dropping callables when their concrete type `F` has been erased. The
//! vtable stores function pointers that dispatch to the correct typed
//! implementations.
//!
//! This module encapsulates the fields of [`CallableVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameters must match the actual callable
//! type stored behind the [`RawCallable`] pointer**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`CallableVtable::new`], which pairs the function pointers
//! with a specific type `F` at compile time.

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::{
    callable::raw::{RawCallable, RawCallableMut, RawCallableRef},
    signature::{Callable, Signature},
    util::Erased,
};

/// Vtable for type-erased callable operations.
///
/// Contains function pointers for performing operations on callables without
/// knowing their concrete type at compile time.
///
/// # Safety Invariant
///
/// The fields `drop`, `clone` and `call` are guaranteed to point to the
/// functions defined below instantiated with the callable type `F` that was
/// used to create this [`CallableVtable`].
pub(crate) struct CallableVtable<S: Signature> {
    /// Gets the [`TypeId`] of the callable type that was used to create this
    /// [`CallableVtable`].
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the callable type that was used to
    /// create this [`CallableVtable`].
    type_name: fn() -> &'static str,
    /// Drops the [`Box<F>`] instance pointed to by this pointer.
    drop: unsafe fn(NonNull<Erased>),
    /// Clones the callable into a new allocation.
    clone: unsafe fn(RawCallableRef<'_, S>) -> RawCallable<S>,
    /// Invokes the callable.
    call: unsafe fn(RawCallableMut<'_, S>, S::Args) -> S::Output,
}

impl<S: Signature> CallableVtable<S> {
    /// Creates a new [`CallableVtable`] for the callable type `F`.
    pub(super) const fn new<F: Callable<S> + Clone + 'static>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<F>,
                type_name: core::any::type_name::<F>,
                drop: drop::<F>,
                clone: clone::<F, S>,
                call: call::<F, S>,
            }
        }
    }

    /// Gets the [`TypeId`] of the callable type that was used to create this
    /// [`CallableVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the callable type that was used to
    /// create this [`CallableVtable`].
    #[inline]
    pub(super) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Drops the `Box<F>` instance pointed to by this pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`Box<F>`] via [`Box::into_raw`]
    /// 2. This [`CallableVtable`] must be a vtable for the callable type
    ///    stored behind the pointer.
    /// 3. This method drops the [`Box<F>`], so the caller must ensure that the
    ///    pointer has not previously been dropped, that it is able to transfer
    ///    ownership of the pointer, and that it will not use the pointer after
    ///    calling this method.
    #[inline]
    pub(super) unsafe fn drop(&self, ptr: NonNull<Erased>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<F>`
        // below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.drop)(ptr);
        }
    }

    /// Clones the callable using the [`Clone`] implementation of the type `F`
    /// used when creating this [`CallableVtable`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`CallableVtable`] must be a vtable for the callable type
    ///    behind the [`RawCallableRef`].
    #[inline]
    pub(super) unsafe fn clone(&self, ptr: RawCallableRef<'_, S>) -> RawCallable<S> {
        // SAFETY: We know that the `self.clone` field points to the function
        // `clone::<F, S>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.clone)(ptr) }
    }

    /// Invokes the callable using the [`Callable::invoke`] implementation of
    /// the type `F` used when creating this [`CallableVtable`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`CallableVtable`] must be a vtable for the callable type
    ///    behind the [`RawCallableMut`].
    #[inline]
    pub(super) unsafe fn call(&self, ptr: RawCallableMut<'_, S>, args: S::Args) -> S::Output {
        // SAFETY: We know that the `self.call` field points to the function
        // `call::<F, S>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.call)(ptr, args) }
    }
}

/// Drops the [`Box<F>`] instance pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`Box<F>`] via [`Box::into_raw`]
/// 2. The callable type `F` matches the actual callable type stored behind the
///    pointer
/// 3. This method drops the [`Box<F>`], so the caller must ensure that the
///    pointer has not previously been dropped, that it is able to transfer
///    ownership of the pointer, and that it will not use the pointer after
///    calling this method.
unsafe fn drop<F: 'static>(ptr: NonNull<Erased>) {
    let ptr: NonNull<F> = ptr.cast::<F>();
    let ptr = ptr.as_ptr();
    // SAFETY: Our pointer has the correct type as guaranteed by the caller, and it
    // came from a call to `Box::into_raw` as also guaranteed by our caller.
    let boxed = unsafe { Box::from_raw(ptr) };
    core::mem::drop(boxed);
}

/// Clones a callable into a new [`RawCallable`].
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `F` matches the actual callable type behind the pointer
unsafe fn clone<F: Callable<S> + Clone + 'static, S: Signature>(
    ptr: RawCallableRef<'_, S>,
) -> RawCallable<S> {
    // SAFETY:
    // 1. Guaranteed by the caller
    let callable: &F = unsafe { ptr.downcast_unchecked::<F>() };
    RawCallable::new::<F>(callable.clone())
}

/// Invokes a callable with the given arguments.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `F` matches the actual callable type behind the pointer
unsafe fn call<F: Callable<S> + 'static, S: Signature>(
    ptr: RawCallableMut<'_, S>,
    args: S::Args,
) -> S::Output {
    // SAFETY:
    // 1. Guaranteed by the caller
    let callable: &mut F = unsafe { ptr.downcast_mut_unchecked::<F>() };
    callable.invoke(args)
}
