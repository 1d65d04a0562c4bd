// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the streaming decoder
//!
//! Feeds arbitrary bytes in arbitrary chunk sizes, with a small buffer and a
//! line limit so growth and discarding paths are exercised.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use gotally_stream::{DecoderOptions, StreamingDecoder};

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u8,
    max_line_length: Option<u16>,
    chunk_sizes: Vec<u8>,
    data: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let mut decoder = StreamingDecoder::with_options(DecoderOptions {
        buffer_capacity: usize::from(input.capacity),
        max_line_length: input.max_line_length.map(usize::from),
    });

    let mut rest = input.data.as_slice();
    let mut sizes = input.chunk_sizes.iter().cycle();
    while !rest.is_empty() {
        let size = sizes.next().map_or(rest.len(), |&s| usize::from(s).max(1));
        let (chunk, tail) = rest.split_at(size.min(rest.len()));
        // Errors are fine; panics are not
        let _ = decoder.write_chunk(chunk);
        rest = tail;
    }

    let _ = decoder.finish();
});
