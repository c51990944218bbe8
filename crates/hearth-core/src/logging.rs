#![forbid(unsafe_code)]

//! Optional tracing re-exports.
//!
//! When the `tracing` feature is enabled, the standard macros are available
//! through this module (and at the crate root). Call sites inside this crate
//! are gated on the feature, so disabling it compiles the instrumentation
//! away entirely.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, info, trace, warn};
