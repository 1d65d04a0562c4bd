// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Streaming decoder for `go test -json` output
//!
//! [`StreamingDecoder`] is a byte sink: feed it whatever chunks arrive from
//! the test runner, in any sizes, then call [`StreamingDecoder::finish`] to
//! get the per-package [`Report`].
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//! use gotally_stream::StreamingDecoder;
//!
//! let mut decoder = StreamingDecoder::new();
//! decoder.write_all(b"{\"Action\":\"start\",\"Package\":\"pkg\"}\n{\"Action\":\"pa")?;
//! decoder.write_all(b"ss\",\"Package\":\"pkg\",\"Test\":\"TestA\"}\n")?;
//!
//! let report = decoder.finish()?;
//! assert_eq!(report.groups["pkg"].counts.pass, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;
use std::io;

use tracing::trace;

use crate::aggregate::{Aggregator, GroupState, Report};
use crate::buffer::{DEFAULT_BUFFER_CAPACITY, LineBuffer};
use crate::error::StreamError;
use crate::event::parse_event;

/// Tuning for a [`StreamingDecoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Initial reassembly buffer capacity in bytes
    pub buffer_capacity: usize,
    /// Longest accepted line in bytes; `None` means unbounded
    pub max_line_length: Option<usize>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_line_length: None,
        }
    }
}

/// Incremental decoder and aggregator for a test event stream
///
/// One instance per stream. Writes take `&mut self`; share an instance
/// across threads only behind a lock.
#[derive(Debug)]
pub struct StreamingDecoder {
    buffer: LineBuffer,
    aggregator: Aggregator,
    lines: u64,
}

impl StreamingDecoder {
    /// Create a decoder with default options
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(DecoderOptions::default())
    }

    /// Create a decoder with explicit options
    #[must_use]
    pub fn with_options(options: DecoderOptions) -> Self {
        let mut buffer = LineBuffer::with_capacity(options.buffer_capacity);
        if let Some(max) = options.max_line_length {
            buffer = buffer.with_max_line_length(max);
        }
        Self {
            buffer,
            aggregator: Aggregator::new(),
            lines: 0,
        }
    }

    /// Feed a chunk of raw output
    ///
    /// # Errors
    ///
    /// Fails on the first line that cannot be decoded or is too long. Lines
    /// before it in the chunk have already been applied; the rest of the
    /// chunk is dropped.
    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<usize, StreamError> {
        let Self {
            buffer,
            aggregator,
            lines,
        } = self;
        buffer.write(chunk, |line| dispatch(aggregator, lines, line))
    }

    /// Decode and apply one complete line, without its newline
    ///
    /// Empty lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::Encoding` or `StreamError::Decode` if the line
    /// is not a valid test event.
    pub fn process_line(&mut self, line: &[u8]) -> Result<(), StreamError> {
        if line.is_empty() {
            return Ok(());
        }
        dispatch(&mut self.aggregator, &mut self.lines, line)
    }

    /// Number of lines decoded so far
    #[must_use]
    pub fn lines_decoded(&self) -> u64 {
        self.lines
    }

    /// Per-package state so far
    #[must_use]
    pub fn groups(&self) -> &BTreeMap<String, GroupState> {
        self.aggregator.groups()
    }

    /// Bytes buffered but not yet part of a complete line
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        self.buffer.pending()
    }

    /// Flush an unterminated final line, if any, and return the report
    ///
    /// # Errors
    ///
    /// Returns an error if the final line cannot be decoded.
    pub fn finish(mut self) -> Result<Report, StreamError> {
        let Self {
            buffer,
            aggregator,
            lines,
        } = &mut self;
        buffer.finish(|line| dispatch(aggregator, lines, line))?;
        Ok(self.into_report())
    }

    /// Return the report, discarding any unterminated final line
    #[must_use]
    pub fn into_report(self) -> Report {
        self.aggregator.into_report()
    }
}

impl Default for StreamingDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl io::Write for StreamingDecoder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_chunk(buf)?)
    }

    /// Does nothing: a partial line is only complete once its newline
    /// arrives, or at [`StreamingDecoder::finish`].
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn dispatch(aggregator: &mut Aggregator, lines: &mut u64, line: &[u8]) -> Result<(), StreamError> {
    let event = parse_event(line)?;
    *lines += 1;
    trace!(line = *lines, action = ?event.action, "decoded event");
    aggregator.handle(event);
    Ok(())
}

/// Decode a complete captured `go test -json` output
///
/// # Errors
///
/// Returns the first decoding error.
pub fn parse_run_output(output: &str) -> Result<Report, StreamError> {
    let mut decoder = StreamingDecoder::new();
    decoder.write_chunk(output.as_bytes())?;
    decoder.finish()
}
