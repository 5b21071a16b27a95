#![forbid(unsafe_code)]

//! Core: the event vocabulary shared by the engine, the runtime, and any
//! presentation layer, plus the logging facade.

pub mod event;
pub mod logging;

pub use event::{Event, FieldId, Swatch, UnknownIdentifier};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
