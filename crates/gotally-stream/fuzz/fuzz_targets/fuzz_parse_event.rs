// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for single-line event parsing

#![no_main]

use libfuzzer_sys::fuzz_target;

use gotally_stream::{Aggregator, parse_event};

fuzz_target!(|data: &[u8]| {
    // parse_event should never panic, and neither should aggregating its result
    if let Ok(event) = parse_event(data) {
        let mut aggregator = Aggregator::new();
        aggregator.handle(event);
    }
});
