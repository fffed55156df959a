//! The error returned when calling an empty [`Function`](crate::Function).

/// Error returned by [`Function::call`](crate::Function::call) when the
/// wrapper does not hold a callable.
///
/// This is the only error a [`Function`](crate::Function) ever produces. It
/// carries no payload.
///
/// # Examples
///
/// ```
/// use funcbox::{BadFunctionCall, Function};
///
/// let mut empty: Function<fn(i32, i32) -> i32> = Function::empty();
/// let error: BadFunctionCall = empty.call((1, 2)).unwrap_err();
/// assert_eq!(error.to_string(), "bad function call: the function wrapper is empty");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, thiserror::Error)]
#[error("bad function call: the function wrapper is empty")]
pub struct BadFunctionCall;

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn test_bad_function_call_is_error() {
        fn assert_error<E: core::error::Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&BadFunctionCall);
        assert!(core::error::Error::source(&BadFunctionCall).is_none());
    }

    #[test]
    fn test_bad_function_call_display() {
        assert_eq!(
            BadFunctionCall.to_string(),
            "bad function call: the function wrapper is empty"
        );
        assert_eq!(alloc::format!("{BadFunctionCall:?}"), "BadFunctionCall");
    }
}
