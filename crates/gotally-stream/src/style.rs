// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Color classes for transcript fragments
//!
//! Output fragments are classified once, when they are decoded, and styled
//! when they are rendered. That keeps the aggregated state independent of
//! whether the eventual terminal supports color.

use owo_colors::{OwoColorize, Style};
use serde::{Deserialize, Serialize};

/// The color class of a transcript fragment or report line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleClass {
    /// `=== RUN` lines and headings
    Info,
    /// `--- PASS` lines
    Success,
    /// `--- FAIL` lines
    Error,
    /// `--- SKIP` lines
    Warning,
    /// `coverage: ` lines
    Highlight,
    /// Everything else
    Muted,
}

/// Prefixes checked in order; the first match wins.
const PREFIX_CLASSES: &[(&str, StyleClass)] = &[
    ("=== RUN", StyleClass::Info),
    ("--- PASS", StyleClass::Success),
    ("--- FAIL", StyleClass::Error),
    ("--- SKIP", StyleClass::Warning),
    ("coverage: ", StyleClass::Highlight),
];

impl StyleClass {
    /// Classify a fragment of test output by its leading text
    #[must_use]
    pub fn classify(output: &str) -> Self {
        PREFIX_CLASSES
            .iter()
            .find(|(prefix, _)| output.starts_with(prefix))
            .map_or(Self::Muted, |&(_, class)| class)
    }
}

/// Terminal styles for each class
///
/// The default palette is plain: every style is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct Palette {
    is_colorized: bool,
    info: Style,
    success: Style,
    error: Style,
    warning: Style,
    highlight: Style,
    muted: Style,
}

impl Palette {
    /// A palette that applies no styling
    #[must_use]
    pub fn plain() -> Self {
        Self::default()
    }

    /// A palette with the standard colors
    #[must_use]
    pub fn colorized() -> Self {
        let mut palette = Self::default();
        palette.colorize();
        palette
    }

    /// Pick `colorized` or `plain`
    #[must_use]
    pub fn new(colorize: bool) -> Self {
        if colorize {
            Self::colorized()
        } else {
            Self::plain()
        }
    }

    fn colorize(&mut self) {
        self.is_colorized = true;
        self.info = Style::new().cyan();
        self.success = Style::new().green();
        self.error = Style::new().red();
        self.warning = Style::new().yellow();
        self.highlight = Style::new().magenta();
        self.muted = Style::new().dimmed();
    }

    /// Whether this palette emits ANSI escapes
    #[must_use]
    pub fn is_colorized(&self) -> bool {
        self.is_colorized
    }

    /// Style for a class
    #[must_use]
    pub fn style(&self, class: StyleClass) -> Style {
        match class {
            StyleClass::Info => self.info,
            StyleClass::Success => self.success,
            StyleClass::Error => self.error,
            StyleClass::Warning => self.warning,
            StyleClass::Highlight => self.highlight,
            StyleClass::Muted => self.muted,
        }
    }

    /// Bold variant of a class style, used for headings and summary lines
    #[must_use]
    pub fn bold(&self, class: StyleClass) -> Style {
        if self.is_colorized {
            self.style(class).bold()
        } else {
            Style::new()
        }
    }

    /// Render `text` in the style of `class`
    #[must_use]
    pub fn paint(&self, class: StyleClass, text: &str) -> String {
        text.style(self.style(class)).to_string()
    }
}
