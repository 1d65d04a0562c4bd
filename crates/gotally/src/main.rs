// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotally: per-package summaries of `go test -json` output
//!
//! Reads the event stream from stdin or a file, optionally tees it to a JSON
//! file, and prints each package's colorized output and counts.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use gotally::config::Config;
use gotally::pipeline::decode_stream;
use gotally::report::render_report;
use gotally_stream::Report;
use owo_colors::OwoColorize;
use tracing::{debug, warn};

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    match run(&config) {
        Ok(report) if report.all_passed() => ExitCode::SUCCESS,
        Ok(report) => {
            debug!(failing = ?report.failing_groups(), "tests failed");
            ExitCode::FAILURE
        }
        Err(err) => {
            warn!(error = %err, "gotally failed");
            let prefix = "[gotally]:";
            if supports_color::on_cached(supports_color::Stream::Stderr).is_some() {
                eprintln!("{} {err:#}", prefix.red().bold());
            } else {
                eprintln!("{prefix} {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<Report> {
    config.validate()?;
    let palette = config.palette();
    debug!(colorized = palette.is_colorized(), "resolved color choice");

    let reader: Box<dyn Read> = match config.input_path() {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    let sink: Box<dyn Write> = match config.json_out {
        Some(ref path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::sink()),
    };
    let (report, _) = decode_stream(reader, sink, config.decoder_options())
        .context("decoding test output")?;

    let mut stdout = io::stdout().lock();
    render_report(&report, &palette, &mut stdout).context("writing report")?;
    stdout.flush().context("writing report")?;
    Ok(report)
}
