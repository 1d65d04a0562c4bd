//! Test event records
//!
//! One record per line of `go test -json` output, as produced by `test2json`:
//!
//! ```text
//! {"Time":"2026-01-05T10:00:00.1Z","Action":"run","Package":"example.com/pkg","Test":"TestAdd"}
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StreamError;

/// What a test event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// The test binary is about to be executed
    Start,
    /// The test has started running
    Run,
    /// The test has been paused
    Pause,
    /// The test has continued running
    Cont,
    /// The test passed
    Pass,
    /// The benchmark printed log output but did not fail
    Bench,
    /// The test or benchmark failed
    Fail,
    /// The test printed output
    Output,
    /// The test was skipped or the package contained no tests
    Skip,
    /// Any action this decoder does not know about
    #[serde(other)]
    Unknown,
}

/// A single decoded line of test runner output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestEvent {
    /// When the runner recorded the event
    #[serde(rename = "Time", default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Event kind
    #[serde(rename = "Action")]
    pub action: Action,
    /// Package (group) the event belongs to
    #[serde(rename = "Package", default)]
    pub group: String,
    /// Test name; empty for package-level events
    #[serde(rename = "Test", default)]
    pub test: String,
    /// Elapsed time in seconds, on pass/fail/skip events
    #[serde(rename = "Elapsed", default)]
    pub elapsed: Option<f64>,
    /// Printed text, on output events
    #[serde(rename = "Output", default)]
    pub output: Option<String>,
}

impl TestEvent {
    /// Whether the event concerns the package as a whole rather than one test
    #[must_use]
    pub fn is_group_level(&self) -> bool {
        self.test.is_empty()
    }

    /// Elapsed time as a `Duration`, if present and representable
    #[must_use]
    pub fn elapsed_duration(&self) -> Option<Duration> {
        self.elapsed
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

/// Parse a single line of `go test -json` output
///
/// The line must not include its trailing newline.
///
/// # Errors
///
/// Returns `StreamError::Encoding` if the line is not valid UTF-8, and
/// `StreamError::Decode` if it is not a well-formed test event.
pub fn parse_event(line: &[u8]) -> Result<TestEvent, StreamError> {
    let text = std::str::from_utf8(line).map_err(|source| StreamError::Encoding {
        line: line.to_vec(),
        source,
    })?;

    serde_json::from_str(text).map_err(|source| StreamError::Decode {
        line: line.to_vec(),
        source,
    })
}
