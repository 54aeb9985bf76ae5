//! Observability for the pixel storefront.
//!
//! This crate provides:
//! - `init` - Process-wide tracing subscriber (JSON or human output)
//! - `LogLevel` / `LogFormat` - Logging knobs shared by the CLI and config
//! - `OperationTimer` - Elapsed-time logging around provider calls

mod logging;
mod timer;

pub use logging::*;
pub use timer::*;
