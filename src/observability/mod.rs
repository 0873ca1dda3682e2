//! Observability for the gateway: structured diagnostics on stderr.

pub mod logging;

pub use logging::{init_default_logging, init_logging, parse_level, LogFormat};

// Span macros for structured logging
pub use logging::{line_span, mqtt_span};
