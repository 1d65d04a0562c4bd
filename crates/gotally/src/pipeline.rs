// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Reading a test run into a report
//!
//! Bytes are read in fixed-size chunks and written through a [`FanOut`]: the
//! raw sink first, then the decoder. The sink therefore holds every chunk the
//! decoder has seen, including the one that failed to decode.

use std::io::{self, Read, Write};

use gotally_stream::{DecoderOptions, FanOut, Report, StreamError, StreamingDecoder};
use tracing::{debug, info};

/// Bytes requested from the reader per read call
pub const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Errors from driving a stream through the decoder
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Reading the input failed
    #[error("failed to read test output: {0}")]
    Read(#[source] io::Error),

    /// Writing to the raw output sink failed
    #[error("failed to write raw test output: {0}")]
    Sink(#[source] io::Error),

    /// The stream could not be decoded
    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Read `reader` to the end, teeing raw bytes into `sink`
///
/// Returns the report and the sink, flushed.
///
/// # Errors
///
/// Stops at the first read, sink or decode error.
pub fn decode_stream<R, S>(
    mut reader: R,
    sink: S,
    options: DecoderOptions,
) -> Result<(Report, S), PipelineError>
where
    R: Read,
    S: Write,
{
    let mut fan_out = FanOut::new(sink, StreamingDecoder::with_options(options));
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(PipelineError::Read(err)),
        };
        total += read as u64;
        fan_out.write_all(&chunk[..read]).map_err(write_error)?;
    }
    fan_out.flush().map_err(write_error)?;

    let (sink, decoder) = fan_out.into_inner();
    let lines = decoder.lines_decoded();
    let report = decoder.finish()?;
    info!(
        bytes = total,
        lines,
        packages = report.groups.len(),
        "test output decoded"
    );
    Ok((report, sink))
}

/// Decode a stream with no raw output sink
///
/// # Errors
///
/// Stops at the first read or decode error.
pub fn decode_reader(reader: impl Read, options: DecoderOptions) -> Result<Report, PipelineError> {
    decode_stream(reader, io::sink(), options).map(|(report, _)| report)
}

fn write_error(err: io::Error) -> PipelineError {
    match StreamError::from_io(err) {
        Ok(stream) => PipelineError::Stream(stream),
        Err(other) => {
            debug!(error = %other, "raw output sink failed");
            PipelineError::Sink(other)
        }
    }
}
