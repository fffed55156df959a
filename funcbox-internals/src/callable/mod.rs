//! Module containing the type-erased callable holder.

mod raw;
mod vtable;

pub use self::raw::{RawCallable, RawCallableMut, RawCallableRef};
