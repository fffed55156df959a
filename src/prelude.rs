//! Commonly used items for convenient importing.
//!
//! ```rust
//! use funcbox::prelude::*;
//!
//! let mut greet: Function<fn(&'static str) -> usize> = Function::new(str::len);
//! assert_eq!(greet.call(("hello",)), Ok(5));
//! ```

pub use crate::{BadFunctionCall, Callable, Function, markers};
