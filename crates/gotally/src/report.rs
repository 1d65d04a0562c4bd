// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Human-readable report
//!
//! For each package, in name order: a heading, the package's transcript, then
//! its counts. A closing line names the failing packages, if any.

use std::io::{self, Write};

use gotally_stream::{GroupState, Palette, Report, StyleClass};
use owo_colors::OwoColorize;

/// Write the whole report
///
/// # Errors
///
/// Returns any error from `out`.
pub fn render_report(report: &Report, palette: &Palette, out: &mut impl Write) -> io::Result<()> {
    for (package, group) in &report.groups {
        render_group(package, group, palette, out)?;
    }
    render_summary(report, palette, out)
}

/// Write one package's heading, transcript and counts
///
/// # Errors
///
/// Returns any error from `out`.
pub fn render_group(
    package: &str,
    group: &GroupState,
    palette: &Palette,
    out: &mut impl Write,
) -> io::Result<()> {
    let heading = format!("Package: {package}");
    writeln!(out, "{}", heading.style(palette.bold(StyleClass::Info)))?;

    let transcript = group.render_transcript(palette);
    out.write_all(transcript.as_bytes())?;
    // An unterminated last fragment would run into the counts
    if !transcript.is_empty() && !transcript.ends_with('\n') {
        writeln!(out)?;
    }

    let counts = group.counts;
    let lines = [
        (StyleClass::Success, format!("Pass: {}", counts.pass)),
        (StyleClass::Error, format!("Fail: {}", counts.fail)),
        (StyleClass::Warning, format!("Skip: {}", counts.skip)),
    ];
    for (class, line) in lines {
        writeln!(out, "{}", line.style(palette.bold(class)))?;
    }
    Ok(())
}

fn render_summary(report: &Report, palette: &Palette, out: &mut impl Write) -> io::Result<()> {
    let totals = report.totals();
    if report.all_passed() {
        let line = format!(
            "All tests passed ({} passed, {} skipped across {} packages)",
            totals.pass,
            totals.skip,
            report.groups.len()
        );
        writeln!(out, "{}", line.style(palette.bold(StyleClass::Success)))
    } else {
        let line = format!(
            "{} failed in: {}",
            pluralize(totals.fail, "test", "tests"),
            report.failing_groups().join(", ")
        );
        writeln!(out, "{}", line.style(palette.bold(StyleClass::Error)))
    }
}

fn pluralize(count: u64, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}
