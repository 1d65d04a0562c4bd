// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotally-stream: streaming decoder for `go test -json` output
//!
//! This library crate reassembles the newline-delimited JSON events written
//! by `go test -json` from arbitrarily sized chunks, decodes them, and keeps
//! per-package pass/fail/skip counts and a colorized transcript.
//!
//! # Example
//!
//! ```no_run
//! use std::io::Write;
//! use gotally_stream::{Palette, StreamingDecoder, parse_run_output};
//!
//! // Decode a complete captured run
//! let output = "{\"Action\":\"start\",\"Package\":\"pkg\"}\n";
//! let report = parse_run_output(output).unwrap();
//!
//! // Or feed chunks as they arrive
//! let mut decoder = StreamingDecoder::new();
//! decoder.write_all(output.as_bytes()).unwrap();
//! let report = decoder.finish().unwrap();
//! for (package, state) in &report.groups {
//!     print!("{package}\n{}", state.render_transcript(&Palette::colorized()));
//! }
//! ```

pub mod aggregate;
pub mod buffer;
pub mod decoder;
pub mod error;
pub mod event;
pub mod sink;
pub mod style;

pub use aggregate::{Aggregator, Counts, Fragment, GroupState, Report};
pub use buffer::{DEFAULT_BUFFER_CAPACITY, LineBuffer};
pub use decoder::{DecoderOptions, StreamingDecoder, parse_run_output};
pub use error::StreamError;
pub use event::{Action, TestEvent, parse_event};
pub use sink::FanOut;
pub use style::{Palette, StyleClass};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::aggregate::{Counts, GroupState, Report};
    pub use crate::decoder::{DecoderOptions, StreamingDecoder, parse_run_output};
    pub use crate::error::StreamError;
    pub use crate::style::{Palette, StyleClass};
}
