// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gotally-stream

use std::io;

use thiserror::Error;

/// Errors that can occur while decoding a test event stream
#[derive(Debug, Error)]
pub enum StreamError {
    /// A line is not valid UTF-8
    #[error("Invalid UTF-8 in test event line: {source}")]
    Encoding {
        /// The offending line, without its trailing newline
        line: Vec<u8>,
        /// Underlying UTF-8 error
        source: std::str::Utf8Error,
    },

    /// A line is valid text but not a well-formed test event
    #[error("Malformed test event {}: {source}", truncate_for_display(line))]
    Decode {
        /// The offending line, without its trailing newline
        line: Vec<u8>,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// A single line grew past the configured maximum length
    #[error("Test event line of {length} bytes exceeds the maximum of {max} bytes")]
    LineTooLong {
        /// Bytes seen for the line when the limit was hit
        length: usize,
        /// Configured maximum
        max: usize,
    },
}

impl StreamError {
    /// The raw bytes of the line that failed, when the error concerns one line
    #[must_use]
    pub fn line(&self) -> Option<&[u8]> {
        match self {
            Self::Encoding { line, .. } | Self::Decode { line, .. } => Some(line),
            Self::LineTooLong { .. } => None,
        }
    }

    /// Recover a `StreamError` that was wrapped into an `io::Error` by the
    /// decoder's `io::Write` implementation.
    ///
    /// Returns the original `io::Error` unchanged if it does not wrap one.
    pub fn from_io(err: io::Error) -> Result<Self, io::Error> {
        if !err.get_ref().is_some_and(|inner| inner.is::<StreamError>()) {
            return Err(err);
        }
        match err.into_inner().map(|inner| inner.downcast::<StreamError>()) {
            Some(Ok(stream)) => Ok(*stream),
            Some(Err(other)) => Err(io::Error::new(io::ErrorKind::InvalidData, other)),
            None => Err(io::ErrorKind::InvalidData.into()),
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

fn truncate_for_display(line: &[u8]) -> String {
    const MAX: usize = 120;
    let text = String::from_utf8_lossy(line);
    if text.chars().count() <= MAX {
        format!("`{text}`")
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("`{head}...`")
    }
}
