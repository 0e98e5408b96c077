//! Structured logging for the inline menu runtime.
//!
//! Console output plus an optional daily-rotating JSON file, with the level
//! taken from the config and overridable through `RUST_LOG`.

pub mod logger;

pub use logger::{init_from_config, init_logger};
