//! Build host capabilities.
//!
//! The host owns the build model. The graph engine only sees it through the
//! [`BuildHost`] trait: enumerate linked builds, and fetch per-project model
//! fragments in one batch. Fragments borrow from the host and must be copied
//! out before the host goes away.

pub mod raw;
pub mod snapshot;

pub use raw::{RawArtifact, RawModuleDependency, RawRunTask, RawSourceSet};
pub use snapshot::{Snapshot, SnapshotBuild, SnapshotError, SnapshotHost, SnapshotProject};

use std::fmt;

use thiserror::Error;

use crate::core::{BuildRoot, ProjectRef};

/// How one build can reference further builds.
///
/// Newer hosts expose editable builds; older ones only included builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildLink {
    /// All builds that are editable from this one (includes nested inclusions)
    Editable,
    /// Builds directly included by this one
    Included,
}

impl fmt::Display for BuildLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildLink::Editable => write!(f, "editable builds"),
            BuildLink::Included => write!(f, "included builds"),
        }
    }
}

/// The host cannot enumerate builds through the requested link kind.
#[derive(Debug, Clone, Error)]
#[error("{link} are not available for build `{build}`")]
pub struct CapabilityUnavailable {
    pub link: BuildLink,
    pub build: String,
}

/// One independent model-fetch unit: exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchUnit {
    pub project: ProjectRef,
}

impl FetchUnit {
    pub fn new(project: ProjectRef) -> Self {
        FetchUnit { project }
    }
}

/// The fragments fetched for one project, borrowed from the host.
#[derive(Debug, Clone)]
pub struct ProjectModels<'h> {
    pub project: ProjectRef,
    pub source_sets: Vec<&'h RawSourceSet>,
}

/// A single fetch unit that did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    pub project: String,
    pub message: String,
}

/// The whole batch failed. Lists every unit that did not resolve.
#[derive(Debug, Clone, Error)]
#[error("model fetch failed for {} project(s)", failures.len())]
pub struct BatchFailure {
    pub failures: Vec<UnitFailure>,
}

/// Capabilities the graph engine needs from a build host.
pub trait BuildHost {
    /// The build the resolve starts from.
    fn root_build(&self) -> BuildRoot;

    /// Builds reachable from `build` through `link`.
    fn linked_builds(
        &self,
        build: &BuildRoot,
        link: BuildLink,
    ) -> Result<Vec<BuildRoot>, CapabilityUnavailable>;

    /// Run all fetch units as one batch.
    ///
    /// Either every unit yields its fragments or the batch fails as a whole.
    /// The host may run units in parallel and return them in any order.
    fn fetch_models(&self, units: &[FetchUnit]) -> Result<Vec<ProjectModels<'_>>, BatchFailure>;
}
