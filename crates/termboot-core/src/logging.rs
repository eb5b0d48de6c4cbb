#![forbid(unsafe_code)]

//! Logging support.
//!
//! With the `tracing` feature the macros below are the `tracing` ones,
//! re-exported at the crate root. Without it they expand to nothing, so the
//! scheduling core carries no logging cost in hosts that never install a
//! subscriber.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}
