//! Per-package aggregation of test events
//!
//! The [`Aggregator`] turns decoded [`TestEvent`]s into a [`GroupState`] per
//! package: pass/fail/skip counts for individual tests, plus the package's
//! output transcript with each fragment classified for coloring.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::event::{Action, TestEvent};
use crate::style::{Palette, StyleClass};

/// Per-test outcome counts for one package
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// Tests passed
    pub pass: u64,
    /// Tests failed
    pub fail: u64,
    /// Tests skipped
    pub skip: u64,
}

impl Counts {
    /// Total tests with an outcome
    #[must_use]
    pub fn total(&self) -> u64 {
        self.pass + self.fail + self.skip
    }
}

impl std::ops::AddAssign for Counts {
    fn add_assign(&mut self, other: Self) {
        self.pass += other.pass;
        self.fail += other.fail;
        self.skip += other.skip;
    }
}

/// One piece of package output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// How the fragment should be colored
    pub class: StyleClass,
    /// The text exactly as the test printed it
    pub text: String,
}

impl Fragment {
    /// Classify `text` and wrap it
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            class: StyleClass::classify(&text),
            text,
        }
    }
}

/// Aggregated state of one package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupState {
    /// Outcome counts
    pub counts: Counts,
    /// Output fragments, in the order they were received
    pub transcript: Vec<Fragment>,
}

impl GroupState {
    /// The transcript as a single string, styled with `palette`
    #[must_use]
    pub fn render_transcript(&self, palette: &Palette) -> String {
        self.transcript
            .iter()
            .map(|fragment| palette.paint(fragment.class, &fragment.text))
            .collect()
    }

    /// Whether any test in the package failed
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.counts.fail > 0
    }
}

/// Folds test events into per-package state
#[derive(Debug, Default)]
pub struct Aggregator {
    groups: BTreeMap<String, GroupState>,
}

impl Aggregator {
    /// Create an aggregator with no packages
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event
    ///
    /// `start` resets the package. Per-test `pass`, `fail` and `skip` bump the
    /// matching counter; package-level ones are summaries and are not counted.
    /// `output` appends to the transcript. Anything else is ignored.
    pub fn handle(&mut self, event: TestEvent) {
        match event.action {
            Action::Start => {
                debug!(package = %event.group, "package started");
                self.groups.insert(event.group, GroupState::default());
            }
            Action::Pass | Action::Fail | Action::Skip if !event.is_group_level() => {
                let counts = &mut self.groups.entry(event.group).or_default().counts;
                match event.action {
                    Action::Pass => counts.pass += 1,
                    Action::Fail => counts.fail += 1,
                    _ => counts.skip += 1,
                }
            }
            Action::Output => {
                let text = event.output.unwrap_or_default();
                self.groups
                    .entry(event.group)
                    .or_default()
                    .transcript
                    .push(Fragment::new(text));
            }
            action => {
                trace!(?action, package = %event.group, test = %event.test, "event ignored");
            }
        }
    }

    /// State for one package
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&GroupState> {
        self.groups.get(name)
    }

    /// All packages seen so far, ordered by name
    #[must_use]
    pub fn groups(&self) -> &BTreeMap<String, GroupState> {
        &self.groups
    }

    /// Finalize into a report
    #[must_use]
    pub fn into_report(self) -> Report {
        Report {
            groups: self.groups,
        }
    }
}

/// Final per-package results of a test run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// State per package, ordered by name
    pub groups: BTreeMap<String, GroupState>,
}

impl Report {
    /// Counts summed over all packages
    #[must_use]
    pub fn totals(&self) -> Counts {
        let mut totals = Counts::default();
        for group in self.groups.values() {
            totals += group.counts;
        }
        totals
    }

    /// Check if no test failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.groups.values().all(|group| !group.has_failures())
    }

    /// Names of packages with at least one failing test
    #[must_use]
    pub fn failing_groups(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|(_, group)| group.has_failures())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
