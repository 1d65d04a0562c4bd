//! gotally library
//!
//! The pieces of the `gotally` binary, exported for integration tests: CLI
//! configuration, CI color detection, the read loop and report rendering.

pub mod ci;
pub mod config;
pub mod pipeline;
pub mod report;
