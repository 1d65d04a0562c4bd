// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! CLI tests for the --verbose / -v and --quiet / -q flags
//!
//! These tests verify the logging level configuration behavior,
//! including flag interactions and level determination.

use clap::Parser;
use gotally::config::Config;
use tracing::Level;

// ============================================================================
// --verbose flag tests
// ============================================================================

#[test]
fn test_verbose_short_flag_v() {
    let config = Config::try_parse_from(["gotally", "-v"]).expect("parse should succeed");
    assert!(config.verbose);
    assert!(!config.quiet);
}

#[test]
fn test_verbose_long_flag() {
    let config = Config::try_parse_from(["gotally", "--verbose"]).expect("parse should succeed");
    assert!(config.verbose);
}

#[test]
fn test_verbose_sets_debug_log_level() {
    let config = Config {
        verbose: true,
        quiet: false,
        ..Default::default()
    };
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_verbose_flag_value_syntax_not_supported() {
    // Boolean flags are toggled by presence only
    let result = Config::try_parse_from(["gotally", "--verbose=true"]);
    assert!(result.is_err(), "Boolean flags don't support =value syntax");
}

// ============================================================================
// --quiet flag tests
// ============================================================================

#[test]
fn test_quiet_short_flag_q() {
    let config = Config::try_parse_from(["gotally", "-q"]).expect("parse should succeed");
    assert!(config.quiet);
    assert!(!config.verbose);
}

#[test]
fn test_quiet_sets_warn_log_level() {
    let config = Config {
        verbose: false,
        quiet: true,
        ..Default::default()
    };
    assert_eq!(config.log_level(), Level::WARN);
}

#[test]
fn test_quiet_flag_value_false_not_supported() {
    let result = Config::try_parse_from(["gotally", "--quiet=false"]);
    assert!(result.is_err(), "Boolean flags don't support =value syntax");
}

// ============================================================================
// Flag interaction tests
// ============================================================================

#[test]
fn test_no_flags_means_info_level() {
    let config = Config::try_parse_from(["gotally"]).expect("parse should succeed");
    assert!(!config.verbose);
    assert!(!config.quiet);
    assert_eq!(config.log_level(), Level::INFO);
}

#[test]
fn test_verbose_and_quiet_flags_both_parse() {
    let config = Config::try_parse_from(["gotally", "-v", "-q"]).expect("parse should succeed");
    assert!(config.verbose);
    assert!(config.quiet);
    // Verbose wins
    assert_eq!(config.log_level(), Level::DEBUG);
}

#[test]
fn test_combined_short_flags() {
    let config = Config::try_parse_from(["gotally", "-vq"]).expect("parse should succeed");
    assert!(config.verbose);
    assert!(config.quiet);
}

#[test]
fn test_logging_flags_with_input() {
    let config = Config::try_parse_from(["gotally", "-q", "run.json"]).expect("parse should succeed");
    assert!(config.quiet);
    assert_eq!(
        config.input.as_deref(),
        Some(std::path::Path::new("run.json"))
    );
}
