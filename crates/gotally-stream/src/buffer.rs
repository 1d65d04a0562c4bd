// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Line reassembly
//!
//! [`LineBuffer`] accepts byte chunks that need not line up with line
//! boundaries and hands every complete, non-empty line to a callback exactly
//! once. After each write it holds at most one unterminated line.
//!
//! The buffer only grows when a single line does not fit: incoming bytes are
//! appended until the buffer is full, complete lines are dispatched to make
//! room, and the allocation is enlarged only if nothing could be dispatched.

use tracing::{debug, trace};

use crate::error::StreamError;

/// Initial capacity of a [`LineBuffer`], in bytes
pub const DEFAULT_BUFFER_CAPACITY: usize = 4 * 1024;

/// Below this size the buffer doubles; above it, it grows by this much.
const GROWTH_STEP: usize = 1024 * 1024;

/// Capacity after one growth step from `current`
///
/// Doubles while under 1 MiB, then grows linearly by 1 MiB.
#[must_use]
pub fn next_capacity(current: usize) -> usize {
    if current < GROWTH_STEP {
        current.saturating_mul(2).max(1)
    } else {
        current.saturating_add(GROWTH_STEP)
    }
}

/// Accumulates raw bytes and dispatches complete lines
#[derive(Debug)]
pub struct LineBuffer {
    pending: Vec<u8>,
    capacity: usize,
    max_line_length: Option<usize>,
    // Set after an over-long line; input is dropped up to the next newline.
    discarding: bool,
}

impl LineBuffer {
    /// Create a buffer with [`DEFAULT_BUFFER_CAPACITY`] and no line limit
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    /// Create a buffer with the given initial capacity (at least one byte)
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pending: Vec::with_capacity(capacity),
            capacity,
            max_line_length: None,
            discarding: false,
        }
    }

    /// Reject lines longer than `max` bytes instead of growing without bound
    #[must_use]
    pub fn with_max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = Some(max);
        self
    }

    /// Current capacity; never decreases
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Configured line limit, if any
    #[must_use]
    pub fn max_line_length(&self) -> Option<usize> {
        self.max_line_length
    }

    /// Bytes received but not yet dispatched
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Append `chunk` and dispatch every line it completes
    ///
    /// Returns the number of bytes accepted, which is `chunk.len()` on
    /// success.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `on_line`, or
    /// `StreamError::LineTooLong` when a line exceeds the configured maximum.
    /// No further lines are dispatched from `chunk`. Lines dispatched before
    /// the failure keep their effect and the failing line is consumed. The
    /// bytes after it stay pending and are dispatched by the next call.
    pub fn write<F>(&mut self, chunk: &[u8], mut on_line: F) -> Result<usize, StreamError>
    where
        F: FnMut(&[u8]) -> Result<(), StreamError>,
    {
        let mut written = 0;

        while written < chunk.len() {
            let room = self.capacity - self.pending.len();
            let take = room.min(chunk.len() - written);
            self.pending
                .extend_from_slice(&chunk[written..written + take]);
            written += take;

            if written < chunk.len() {
                if let Err(err) = self.drain_lines(&mut on_line) {
                    self.stash(&chunk[written..]);
                    return Err(err);
                }

                // Still full: a single line is larger than the buffer
                if self.pending.len() == self.capacity {
                    self.grow();
                }
            }
        }

        self.drain_lines(&mut on_line)?;
        Ok(written)
    }

    /// Dispatch whatever is left, including an unterminated final line
    ///
    /// # Errors
    ///
    /// Same as [`LineBuffer::write`].
    pub fn finish<F>(&mut self, mut on_line: F) -> Result<(), StreamError>
    where
        F: FnMut(&[u8]) -> Result<(), StreamError>,
    {
        self.drain_lines(&mut on_line)?;

        if self.discarding {
            self.discarding = false;
            self.pending.clear();
            return Ok(());
        }
        if self.pending.is_empty() {
            return Ok(());
        }

        debug!(
            bytes = self.pending.len(),
            "dispatching unterminated final line"
        );
        let tail = std::mem::take(&mut self.pending);
        on_line(&tail)
    }

    fn drain_lines<F>(&mut self, on_line: &mut F) -> Result<(), StreamError>
    where
        F: FnMut(&[u8]) -> Result<(), StreamError>,
    {
        let mut consumed = 0;
        let mut result = Ok(());

        while let Some(offset) = self.pending[consumed..].iter().position(|&b| b == b'\n') {
            let start = consumed;
            let end = consumed + offset;
            consumed = end + 1;

            if self.discarding {
                self.discarding = false;
                continue;
            }
            if start == end {
                continue;
            }

            let line = &self.pending[start..end];
            if let Some(max) = self.max_line_length.filter(|&max| line.len() > max) {
                result = Err(StreamError::LineTooLong {
                    length: line.len(),
                    max,
                });
                break;
            }

            trace!(bytes = line.len(), "dispatching line");
            if let Err(err) = on_line(line) {
                result = Err(err);
                break;
            }
        }

        self.pending.drain(..consumed);
        result?;

        if self.discarding {
            self.pending.clear();
        } else if let Some(max) = self.max_line_length.filter(|&max| self.pending.len() > max) {
            let length = self.pending.len();
            self.pending.clear();
            self.discarding = true;
            return Err(StreamError::LineTooLong { length, max });
        }

        Ok(())
    }

    // Keep unprocessed input after a failed dispatch, without scanning it.
    fn stash(&mut self, rest: &[u8]) {
        let rest = if self.discarding {
            match rest.iter().position(|&b| b == b'\n') {
                Some(newline) => {
                    self.discarding = false;
                    &rest[newline + 1..]
                }
                None => return,
            }
        } else {
            rest
        };

        while self.pending.len() + rest.len() > self.capacity {
            self.grow();
        }
        self.pending.extend_from_slice(rest);
    }

    fn grow(&mut self) {
        let new_capacity = next_capacity(self.capacity);
        debug!(
            from = self.capacity,
            to = new_capacity,
            "growing line buffer"
        );
        self.pending
            .reserve_exact(new_capacity - self.pending.len());
        self.capacity = new_capacity;
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn collect(buffer: &mut LineBuffer, chunks: &[&[u8]]) -> Vec<String> {
        let mut lines = Vec::new();
        for chunk in chunks {
            buffer
                .write(chunk, |line| {
                    lines.push(String::from_utf8_lossy(line).into_owned());
                    Ok(())
                })
                .expect("write should succeed");
        }
        lines
    }

    #[test]
    fn test_next_capacity() {
        assert_eq!(next_capacity(0), 1);
        assert_eq!(next_capacity(4096), 8192);
        assert_eq!(next_capacity(512 * 1024), 1024 * 1024);
        assert_eq!(next_capacity(1024 * 1024), 2 * 1024 * 1024);
        assert_eq!(next_capacity(3 * 1024 * 1024), 4 * 1024 * 1024);
        assert_eq!(next_capacity(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_single_chunk_many_lines() {
        let mut buffer = LineBuffer::new();
        let lines = collect(&mut buffer, &[b"a\nbb\nccc\n"]);
        assert_eq!(lines, vec!["a", "bb", "ccc"]);
        assert!(buffer.pending().is_empty());
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut buffer = LineBuffer::new();
        let lines = collect(&mut buffer, &[b"hel", b"lo\nwor", b"ld", b"\n"]);
        assert_eq!(lines, vec!["hello", "world"]);
    }

    #[test]
    fn test_partial_tail_is_retained() {
        let mut buffer = LineBuffer::new();
        let lines = collect(&mut buffer, &[b"done\npart"]);
        assert_eq!(lines, vec!["done"]);
        assert_eq!(buffer.pending(), b"part");
    }

    #[test]
    fn test_empty_lines_are_skipped() {
        let mut buffer = LineBuffer::new();
        let lines = collect(&mut buffer, &[b"\n\na\n\n\nb\n"]);
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_many_small_lines_do_not_grow_buffer() {
        let mut buffer = LineBuffer::with_capacity(8);
        let input = b"ab\ncd\nef\ngh\nij\nkl\nmn\nop\n".repeat(10);
        let lines = collect(&mut buffer, &[&input]);
        assert_eq!(lines.len(), 80);
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn test_long_line_grows_buffer() {
        let mut buffer = LineBuffer::with_capacity(4);
        let long = "x".repeat(100);
        let input = format!("{long}\nshort\n");
        let lines = collect(&mut buffer, &[input.as_bytes()]);
        assert_eq!(lines, vec![long.as_str(), "short"]);
        // 4 -> 8 -> 16 -> 32 -> 64 -> 128
        assert_eq!(buffer.capacity(), 128);
    }

    #[test]
    fn test_long_line_across_byte_sized_chunks() {
        let mut buffer = LineBuffer::with_capacity(2);
        let long = "y".repeat(33);
        let input = format!("{long}\n");
        let chunks: Vec<&[u8]> = input.as_bytes().chunks(1).collect();
        let lines = collect(&mut buffer, &chunks);
        assert_eq!(lines, vec![long]);
    }

    #[test]
    fn test_capacity_never_shrinks() {
        let mut buffer = LineBuffer::with_capacity(4);
        collect(&mut buffer, &[b"0123456789\n"]);
        let grown = buffer.capacity();
        collect(&mut buffer, &[b"a\n"]);
        assert_eq!(buffer.capacity(), grown);
    }

    #[test]
    fn test_write_reports_bytes_accepted() {
        let mut buffer = LineBuffer::new();
        let accepted = buffer.write(b"abc\nde", |_| Ok(())).expect("write");
        assert_eq!(accepted, 6);
    }

    #[test]
    fn test_error_stops_chunk_and_consumes_failing_line() {
        let mut buffer = LineBuffer::new();
        let mut seen = Vec::new();
        let result = buffer.write(b"one\nbad\nthree\n", |line| {
            if line == b"bad" {
                return Err(StreamError::LineTooLong { length: 0, max: 0 });
            }
            seen.push(line.to_vec());
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(seen, vec![b"one".to_vec()]);
        assert_eq!(buffer.pending(), b"three\n");

        // Continuing resumes after the failing line
        let lines = collect(&mut buffer, &[b"four\n"]);
        assert_eq!(lines, vec!["three", "four"]);
    }

    #[test]
    fn test_max_line_length_complete_line() {
        let mut buffer = LineBuffer::with_capacity(64).with_max_line_length(4);
        let mut lines = Vec::new();
        let err = buffer
            .write(b"ok\ntoolong\nfine\n", |line| {
                lines.push(line.to_vec());
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, StreamError::LineTooLong { length: 7, max: 4 }));
        assert_eq!(lines, vec![b"ok".to_vec()]);

        let rest = collect(&mut buffer, &[b""]);
        assert_eq!(rest, vec!["fine"]);
    }

    #[test]
    fn test_max_line_length_partial_line_discards_until_newline() {
        let mut buffer = LineBuffer::with_capacity(4).with_max_line_length(8);
        let err = buffer.write(b"0123456789abc", |_| Ok(())).unwrap_err();
        assert!(matches!(err, StreamError::LineTooLong { max: 8, .. }));
        assert!(buffer.pending().is_empty());

        // The remainder of the over-long line is dropped, the next line survives
        let lines = collect(&mut buffer, &[b"defgh", b"ijk\nnext\n"]);
        assert_eq!(lines, vec!["next"]);
        assert!(buffer.capacity() <= 16);
    }

    #[test]
    fn test_max_line_length_mid_chunk_keeps_following_lines() {
        let mut buffer = LineBuffer::with_capacity(4).with_max_line_length(8);
        let err = buffer
            .write(b"0123456789abc\nnext\n", |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, StreamError::LineTooLong { length: 13, max: 8 }));
        assert_eq!(buffer.pending(), b"next\n");

        let lines = collect(&mut buffer, &[b"more\n"]);
        assert_eq!(lines, vec!["next", "more"]);
    }

    #[test]
    fn test_error_before_chunk_end_keeps_rest_of_chunk() {
        let mut buffer = LineBuffer::with_capacity(8);
        let result = buffer.write(b"bad\nline-two\n", |line| {
            if line == b"bad" {
                return Err(StreamError::LineTooLong { length: 0, max: 0 });
            }
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(buffer.pending(), b"line-two\n");
    }

    #[test]
    fn test_finish_dispatches_unterminated_tail() {
        let mut buffer = LineBuffer::new();
        collect(&mut buffer, &[b"a\nlast"]);

        let mut tail = Vec::new();
        buffer
            .finish(|line| {
                tail.push(line.to_vec());
                Ok(())
            })
            .expect("finish");
        assert_eq!(tail, vec![b"last".to_vec()]);
        assert!(buffer.pending().is_empty());
    }

    #[test]
    fn test_finish_with_nothing_pending() {
        let mut buffer = LineBuffer::new();
        collect(&mut buffer, &[b"a\n"]);
        let mut calls = 0;
        buffer
            .finish(|_| {
                calls += 1;
                Ok(())
            })
            .expect("finish");
        assert_eq!(calls, 0);
    }
}
