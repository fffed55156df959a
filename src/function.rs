use core::{
    any::{Any, TypeId},
    marker::PhantomData,
};

use funcbox_internals::{Callable, RawCallable, Signature};

use crate::{
    BadFunctionCall,
    macros::{debug_event, trace_event},
    markers::{self, Local, SendSync},
};

/// The content of a [`Function`].
///
/// A raw function pointer and an owned callable are never held at the same
/// time.
enum Target<S: Signature> {
    /// No callable is held.
    Empty,
    /// A function pointer whose type is exactly `S`.
    Pointer(S),
    /// Any other callable, type-erased behind a vtable.
    Boxed(RawCallable<S>),
}

impl<S: Signature> Clone for Target<S> {
    fn clone(&self) -> Self {
        match self {
            Target::Empty => Target::Empty,
            Target::Pointer(ptr) => Target::Pointer(*ptr),
            Target::Boxed(raw) => {
                trace_event!(target_type = raw.as_ref().type_name(), "cloning callable");
                Target::Boxed(raw.clone())
            }
        }
    }
}

/// A container for any callable matching the signature `S`.
///
/// The signature is spelled as a function pointer type, so
/// `Function<fn(i32, i32) -> i32>` holds anything that can be called with two
/// `i32`s and returns an `i32`: function items, function pointers, closures,
/// or functor types implementing [`Callable`]. Arguments are passed to
/// [`call`](Function::call) as a tuple.
///
/// A [`Function`] is either empty or holds exactly one callable. Calling an
/// empty [`Function`] returns [`BadFunctionCall`].
///
/// # Storage
///
/// A function pointer whose type is exactly `S` is stored inline, without
/// allocating. Every other callable is moved into a heap allocation and
/// dispatched through a vtable. Zero-sized callables, such as function items
/// and closures that capture nothing, skip the allocation.
///
/// # Borrowed Arguments
///
/// Every argument and result type of `S` must be `'static`. A reference
/// parameter is therefore spelled `&'static T`, as in
/// `fn(&'static str) -> usize`, and a callback taking a short-lived borrow
/// such as `fn(&mut Vec<u8>)` with a local `Vec` cannot be expressed. Pass
/// owned values, or `'static` data, instead.
///
/// # Cloning
///
/// Cloning a [`Function`] clones the held callable itself. The clone and the
/// original never share state, so stateful closures evolve independently after
/// the clone.
///
/// # Type Parameters
/// - `S`: The call signature, e.g. `fn(&'static str) -> usize`.
/// - `T`: The thread safety marker for the wrapper. This can either be
///   [`SendSync`] or [`Local`].
///
/// # Examples
///
/// ```
/// use funcbox::Function;
///
/// fn add(a: i32, b: i32) -> i32 {
///     a + b
/// }
///
/// let mut adder: Function<fn(i32, i32) -> i32> = Function::new(add);
/// assert_eq!(adder.call((2, 3)), Ok(5));
///
/// let offset = 10;
/// adder = Function::new(move |a: i32, b: i32| a + b + offset);
/// assert_eq!(adder.call((2, 3)), Ok(15));
/// ```
pub struct Function<S: Signature, T: 'static = SendSync> {
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. `T` must either be `SendSync` or `Local`.
    /// 2. If `T = SendSync`: The callable embedded in a [`Target::Boxed`] must
    ///    be `Send + Sync`.
    target: Target<S>,
    _thread_safety: PhantomData<T>,
}

impl<S: Signature, T> Function<S, T> {
    /// Creates an empty [`Function`].
    ///
    /// This is the same as [`Function::default`] and
    /// `Function::from(None)`.
    ///
    /// # Examples
    /// ```
    /// use funcbox::Function;
    ///
    /// let empty: Function<fn()> = Function::empty();
    /// assert!(empty.is_empty());
    /// ```
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            target: Target::Empty,
            _thread_safety: PhantomData,
        }
    }

    /// Creates a [`Function`] holding the given callable.
    ///
    /// If the type of `callable` is exactly the function pointer type `S`, it
    /// is stored inline. Otherwise the callable is moved into a new heap
    /// allocation, unless it is zero-sized.
    ///
    /// Note that naming a function directly (`Function::new(add)`) passes a
    /// zero-sized function item, not a function pointer. Neither wrapping nor
    /// cloning it allocates, but it is called through a vtable. Cast it
    /// (`add as fn(..) -> _`) or use [`Function::from_fn_ptr`] to store a
    /// pointer.
    ///
    /// # Examples
    /// ```
    /// use funcbox::Function;
    ///
    /// fn square(x: u64) -> u64 {
    ///     x * x
    /// }
    ///
    /// let mut by_item: Function<fn(u64) -> u64> = Function::new(square);
    /// let mut by_ptr: Function<fn(u64) -> u64> = Function::new(square as fn(u64) -> u64);
    /// assert!(!by_item.holds_fn_ptr());
    /// assert!(by_ptr.holds_fn_ptr());
    /// assert_eq!(by_item.call((7,)), by_ptr.call((7,)));
    /// ```
    #[must_use]
    pub fn new<F>(callable: F) -> Self
    where
        F: Callable<S> + Clone + markers::ObjectMarkerFor<T>,
    {
        if let Some(&ptr) = (&callable as &dyn Any).downcast_ref::<S>() {
            trace_event!(
                target_type = core::any::type_name::<S>(),
                fn_ptr = true,
                "wrapping callable"
            );
            return Self::from_fn_ptr(ptr);
        }

        trace_event!(
            target_type = core::any::type_name::<F>(),
            fn_ptr = false,
            "wrapping callable"
        );
        let raw = RawCallable::new::<F>(callable);

        // SAFETY:
        // 1. `F` is bounded by `markers::ObjectMarkerFor<T>`, which is only
        //    implemented for `T=Local` and `T=SendSync`.
        // 2. If `T=SendSync`, the bound `F: ObjectMarkerFor<SendSync>` guarantees that
        //    the callable is `Send+Sync`.
        Self {
            target: Target::Boxed(raw),
            _thread_safety: PhantomData,
        }
    }

    /// Creates a [`Function`] holding the given function pointer inline.
    ///
    /// # Examples
    /// ```
    /// use funcbox::Function;
    ///
    /// let mut len: Function<fn(&'static str) -> usize> = Function::from_fn_ptr(str::len);
    /// assert_eq!(len.call(("four",)), Ok(4));
    /// ```
    #[must_use]
    pub const fn from_fn_ptr(ptr: S) -> Self {
        // SAFETY:
        // 1. A function pointer carries no callable state. Only `Target::Boxed`
        //    requires `T` to be a marker.
        // 2. `S: Signature` requires `S: Send + Sync`.
        Self {
            target: Target::Pointer(ptr),
            _thread_safety: PhantomData,
        }
    }

    /// Calls the held callable with the given arguments.
    ///
    /// The arguments are passed as a tuple, matching the parameters of `S`.
    /// They are moved into the callable.
    ///
    /// # Errors
    ///
    /// Returns [`BadFunctionCall`] if this [`Function`] is empty. Nothing is
    /// called in that case.
    ///
    /// # Examples
    /// ```
    /// use funcbox::{BadFunctionCall, Function};
    ///
    /// let mut calls = 0_u32;
    /// let mut counter: Function<fn() -> u32> = Function::new(move || {
    ///     calls += 1;
    ///     calls
    /// });
    /// assert_eq!(counter.call(()), Ok(1));
    /// assert_eq!(counter.call(()), Ok(2));
    ///
    /// counter.clear();
    /// assert_eq!(counter.call(()), Err(BadFunctionCall));
    /// ```
    pub fn call(&mut self, args: S::Args) -> Result<S::Output, BadFunctionCall> {
        match &mut self.target {
            Target::Empty => {
                debug_event!(
                    signature = core::any::type_name::<S>(),
                    "called an empty function wrapper"
                );
                Err(BadFunctionCall)
            }
            Target::Pointer(ptr) => Ok(Signature::apply(*ptr, args)),
            Target::Boxed(raw) => Ok(raw.as_mut().invoke(args)),
        }
    }

    /// Returns `true` if this [`Function`] holds a callable.
    ///
    /// # Examples
    /// ```
    /// use funcbox::Function;
    ///
    /// let f: Function<fn() -> u8> = Function::new(|| 1_u8);
    /// assert!(f.is_callable());
    /// assert!(!Function::<fn() -> u8>::empty().is_callable());
    /// ```
    #[must_use]
    pub fn is_callable(&self) -> bool {
        !self.is_empty()
    }

    /// Returns `true` if this [`Function`] does not hold a callable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.target, Target::Empty)
    }

    /// Returns `true` if this [`Function`] holds a function pointer inline
    /// rather than a heap-allocated callable.
    #[must_use]
    pub fn holds_fn_ptr(&self) -> bool {
        matches!(self.target, Target::Pointer(_))
    }

    /// Drops the held callable, if any, and leaves this [`Function`] empty.
    pub fn clear(&mut self) {
        self.target = Target::Empty;
    }

    /// Moves the held callable out into a new [`Function`], leaving this one
    /// empty.
    ///
    /// The callable itself is not cloned.
    ///
    /// # Examples
    /// ```
    /// use funcbox::Function;
    ///
    /// let mut source: Function<fn(i32) -> i32> = Function::new(|x: i32| x + 1);
    /// let mut destination = source.take();
    /// assert!(source.is_empty());
    /// assert_eq!(destination.call((1,)), Ok(2));
    /// ```
    #[must_use]
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Exchanges the callables held by `self` and `other`.
    ///
    /// This never clones, allocates or panics.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.target, &mut other.target);
    }

    /// Returns the [`TypeId`] of the held callable, or `None` if this
    /// [`Function`] is empty.
    ///
    /// An inline function pointer reports `TypeId::of::<S>()`.
    #[must_use]
    pub fn target_type_id(&self) -> Option<TypeId> {
        match &self.target {
            Target::Empty => None,
            Target::Pointer(_) => Some(TypeId::of::<S>()),
            Target::Boxed(raw) => Some(raw.as_ref().type_id()),
        }
    }

    /// Returns the [`core::any::type_name`] of the held callable, or `None` if
    /// this [`Function`] is empty.
    #[must_use]
    pub fn target_type_name(&self) -> Option<&'static str> {
        match &self.target {
            Target::Empty => None,
            Target::Pointer(_) => Some(core::any::type_name::<S>()),
            Target::Boxed(raw) => Some(raw.as_ref().type_name()),
        }
    }

    /// Returns a reference to the held callable if it is of type `F`.
    ///
    /// # Examples
    /// ```
    /// use funcbox::{Callable, Function};
    ///
    /// #[derive(Clone)]
    /// struct Offset(i32);
    ///
    /// impl Callable<fn(i32) -> i32> for Offset {
    ///     fn invoke(&mut self, (x,): (i32,)) -> i32 {
    ///         self.0 + x
    ///     }
    /// }
    ///
    /// let f: Function<fn(i32) -> i32> = Function::new(Offset(3));
    /// assert_eq!(f.target::<Offset>().map(|o| o.0), Some(3));
    /// assert!(f.target::<fn(i32) -> i32>().is_none());
    /// ```
    #[must_use]
    pub fn target<F: 'static>(&self) -> Option<&F> {
        match &self.target {
            Target::Empty => None,
            Target::Pointer(ptr) => (ptr as &dyn Any).downcast_ref::<F>(),
            Target::Boxed(raw) => {
                let raw = raw.as_ref();
                if raw.type_id() == TypeId::of::<F>() {
                    // SAFETY: We just checked that the callable is of type `F`
                    let callable = unsafe { raw.downcast_unchecked::<F>() };
                    Some(callable)
                } else {
                    None
                }
            }
        }
    }

    /// Returns a mutable reference to the held callable if it is of type `F`.
    #[must_use]
    pub fn target_mut<F: 'static>(&mut self) -> Option<&mut F> {
        match &mut self.target {
            Target::Empty => None,
            Target::Pointer(ptr) => (ptr as &mut dyn Any).downcast_mut::<F>(),
            Target::Boxed(raw) => {
                let raw = raw.as_mut();
                if raw.as_ref().type_id() == TypeId::of::<F>() {
                    // SAFETY: We just checked that the callable is of type `F`
                    let callable = unsafe { raw.downcast_mut_unchecked::<F>() };
                    Some(callable)
                } else {
                    None
                }
            }
        }
    }
}

impl<S: Signature> Function<S, SendSync> {
    /// Changes the thread safety marker of the [`Function`] to [`Local`].
    ///
    /// This does not touch the held callable. It only forgets that it is
    /// `Send + Sync`.
    #[must_use]
    pub fn into_local(self) -> Function<S, Local> {
        // SAFETY:
        // 1. `T=Local`, so this is trivially true.
        // 2. `T=Local`, so this is trivially true.
        Function {
            target: self.target,
            _thread_safety: PhantomData,
        }
    }
}

impl<S: Signature, T> Clone for Function<S, T> {
    fn clone(&self) -> Self {
        // SAFETY:
        // 1. The thread safety marker does not change.
        // 2. The clone of a `Send + Sync` callable has the same type, so it is also
        //    `Send + Sync`.
        Self {
            target: self.target.clone(),
            _thread_safety: PhantomData,
        }
    }
}

impl<S: Signature, T> Default for Function<S, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Signature, T> core::fmt::Debug for Function<S, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Function")
            .field("signature", &core::any::type_name::<S>())
            .field("target", &self.target_type_name())
            .finish()
    }
}

impl<S: Signature, T> From<S> for Function<S, T> {
    fn from(ptr: S) -> Self {
        Self::from_fn_ptr(ptr)
    }
}

impl<S: Signature, T> From<Option<S>> for Function<S, T> {
    fn from(ptr: Option<S>) -> Self {
        match ptr {
            Some(ptr) => Self::from_fn_ptr(ptr),
            None => Self::empty(),
        }
    }
}

impl<S: Signature> From<Function<S, SendSync>> for Function<S, Local> {
    fn from(function: Function<S, SendSync>) -> Self {
        function.into_local()
    }
}

// SAFETY: The `SendSync` marker indicates that the held callable is
// `Send`+`Sync`. Therefore it is safe to implement `Send`+`Sync` for the
// function itself.
unsafe impl<S: Signature> Send for Function<S, SendSync> {}

// SAFETY: The `SendSync` marker indicates that the held callable is
// `Send`+`Sync`. Therefore it is safe to implement `Send`+`Sync` for the
// function itself.
unsafe impl<S: Signature> Sync for Function<S, SendSync> {}

/// Exchanges the callables held by `a` and `b`.
///
/// This is the free-function form of [`Function::swap`].
///
/// # Examples
/// ```
/// use funcbox::Function;
///
/// let mut a: Function<fn() -> char> = Function::new(|| 'a');
/// let mut b: Function<fn() -> char> = Function::empty();
/// funcbox::swap(&mut a, &mut b);
/// assert!(a.is_empty());
/// assert_eq!(b.call(()), Ok('a'));
/// ```
pub fn swap<S: Signature, T>(a: &mut Function<S, T>, b: &mut Function<S, T>) {
    a.swap(b);
}
