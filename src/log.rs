//! Logging for the evaluator and the document builder.
//!
//! With the `tracing` feature, `debug!` forwards to `tracing`; without it the
//! macro expands to nothing. `step!` logs one rewrite step and is further
//! gated on the `EvalOptions::trace` flag of the evaluation.

#[cfg(feature = "tracing")]
pub(crate) use tracing::debug;

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use debug;

/// `step!(trace, fields..., "message")`
macro_rules! step {
    ($enabled:expr, $($arg:tt)*) => {
        if $enabled {
            $crate::log::debug!($($arg)*);
        }
    };
}

pub(crate) use step;
