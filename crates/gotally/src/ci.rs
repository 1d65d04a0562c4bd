// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! CI environment detection
//!
//! Test output in CI is usually piped, so terminal detection alone would turn
//! colors off. Most hosted CI log viewers render ANSI colors anyway; for
//! those, colors are forced on unless `NO_COLOR` is set.

use std::ffi::OsString;

/// A recognized CI provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiProvider {
    /// GitHub Actions
    GitHubActions,
    /// Gitea Actions
    GiteaActions,
    /// Travis CI
    Travis,
    /// CircleCI
    CircleCi,
    /// AppVeyor
    AppVeyor,
    /// GitLab CI
    GitLabCi,
    /// Buildkite
    Buildkite,
    /// Drone
    Drone,
    /// Codeship
    Codeship,
    /// Azure Pipelines
    AzurePipelines,
}

/// Marker variables checked in order once `CI` is set
const MARKERS: &[(&str, CiProvider)] = &[
    ("GITHUB_ACTIONS", CiProvider::GitHubActions),
    ("GITEA_ACTIONS", CiProvider::GiteaActions),
    ("TRAVIS", CiProvider::Travis),
    ("CIRCLECI", CiProvider::CircleCi),
    ("APPVEYOR", CiProvider::AppVeyor),
    ("GITLAB_CI", CiProvider::GitLabCi),
    ("BUILDKITE", CiProvider::Buildkite),
    ("DRONE", CiProvider::Drone),
];

impl CiProvider {
    /// Detect the provider from the process environment
    #[must_use]
    pub fn detect() -> Option<Self> {
        Self::detect_with(|key| std::env::var_os(key))
    }

    /// Detect the provider using `lookup` to read environment variables
    ///
    /// Nothing is detected unless `CI` is set.
    pub fn detect_with(lookup: impl Fn(&str) -> Option<OsString>) -> Option<Self> {
        lookup("CI")?;

        if let Some(&(_, provider)) = MARKERS.iter().find(|(key, _)| lookup(key).is_some()) {
            return Some(provider);
        }
        if lookup("CI_NAME").is_some_and(|name| name == "codeship") {
            return Some(Self::Codeship);
        }
        if lookup("TF_BUILD").is_some() {
            return Some(Self::AzurePipelines);
        }
        None
    }

    /// Whether the provider's log viewer renders ANSI colors
    #[must_use]
    pub fn renders_color(self) -> bool {
        !matches!(self, Self::AzurePipelines)
    }
}

/// Whether `NO_COLOR` is set to a non-empty value
pub fn no_color_with(lookup: impl Fn(&str) -> Option<OsString>) -> bool {
    lookup("NO_COLOR").is_some_and(|value| !value.is_empty())
}

/// Whether colors should be forced on because of the CI environment
pub fn force_color_with(lookup: impl Fn(&str) -> Option<OsString>) -> bool {
    !no_color_with(&lookup) && CiProvider::detect_with(&lookup).is_some_and(CiProvider::renders_color)
}
