//! Byte sink composition

use std::io::{self, Write};

/// Writes every byte to `first`, then to `second`
///
/// Used to persist the raw test output while decoding it. A write fails as
/// soon as either side fails; when `first` fails, `second` never sees the
/// buffer.
#[derive(Debug)]
pub struct FanOut<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> FanOut<A, B> {
    /// Combine two writers
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// The first writer
    pub fn first(&self) -> &A {
        &self.first
    }

    /// The second writer
    pub fn second(&self) -> &B {
        &self.second
    }

    /// Split back into the two writers
    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Write, B: Write> Write for FanOut<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}
