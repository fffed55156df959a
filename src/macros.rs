//! Internal logging macros.
//!
//! These forward to [`tracing`](https://docs.rs/tracing) when the `tracing`
//! feature is enabled and expand to nothing otherwise.

macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!(target: "funcbox", $($arg)*);
    };
}

macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(target: "funcbox", $($arg)*);
    };
}

pub(crate) use {debug_event, trace_event};
