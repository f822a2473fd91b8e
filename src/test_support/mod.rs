//! Test utilities and mocks for targetgraph unit tests.
//!
//! [`MockHost`] is an in-memory [`BuildHost`] whose builds, links and fetch
//! results are set up per test. Fixtures for owned source sets live in
//! [`fixtures`].
//!
//! # Example
//!
//! ```rust,ignore
//! use targetgraph::test_support::MockHost;
//!
//! let host = MockHost::new(BuildRoot::new("app", "/w/app"))
//!     .with_project("app", ":", "/w/app", vec![RawSourceSet::named("/w/app", "main")])
//!     .failing("app", ":", "script error");
//! ```

pub mod fixtures;

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

use crate::core::{BuildRoot, ProjectRef};
use crate::host::{
    BatchFailure, BuildHost, BuildLink, CapabilityUnavailable, FetchUnit, ProjectModels,
    RawSourceSet, UnitFailure,
};

// Re-export fixtures for convenience
pub use fixtures::*;

/// In-memory build host.
///
/// Link kinds that were never configured for a build report
/// [`CapabilityUnavailable`].
#[derive(Debug, Default)]
pub struct MockHost {
    root: String,
    builds: BTreeMap<String, BuildRoot>,
    links: HashMap<(String, BuildLink), Vec<String>>,
    models: HashMap<(String, String), Vec<RawSourceSet>>,
    failures: HashMap<(String, String), String>,
    dropped: HashSet<(String, String)>,
    reverse: bool,
    batch_calls: Cell<usize>,
}

impl MockHost {
    /// Create a host whose root build is `root`.
    pub fn new(root: BuildRoot) -> Self {
        let name = root.name().to_string();
        let mut builds = BTreeMap::new();
        builds.insert(name.clone(), root);
        MockHost {
            root: name,
            builds,
            ..Default::default()
        }
    }

    /// Add another build the host knows about.
    pub fn with_build(mut self, build: BuildRoot) -> Self {
        self.builds.insert(build.name().to_string(), build);
        self
    }

    /// Let `build` enumerate `targets` through `link`.
    pub fn with_link(mut self, build: &str, link: BuildLink, targets: &[&str]) -> Self {
        self.links.insert(
            (build.to_string(), link),
            targets.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    /// Add a project to `build` together with the fragments it fetches to.
    pub fn with_project(
        mut self,
        build: &str,
        path: &str,
        dir: impl Into<PathBuf>,
        source_sets: Vec<RawSourceSet>,
    ) -> Self {
        if let Some(root) = self.builds.remove(build) {
            self.builds
                .insert(build.to_string(), root.with_project(path, dir));
        }
        self.models
            .insert((build.to_string(), path.to_string()), source_sets);
        self
    }

    /// Make fetching the given project fail.
    pub fn failing(mut self, build: &str, path: &str, message: &str) -> Self {
        self.failures
            .insert((build.to_string(), path.to_string()), message.to_string());
        self
    }

    /// Silently leave the given project out of the batch result.
    pub fn dropping(mut self, build: &str, path: &str) -> Self {
        self.dropped.insert((build.to_string(), path.to_string()));
        self
    }

    /// Answer fetch batches in reverse unit order.
    pub fn answer_in_reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Number of fetch batches issued so far.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.get()
    }

    fn key(project: &ProjectRef) -> (String, String) {
        (project.build.clone(), project.path.clone())
    }
}

impl BuildHost for MockHost {
    fn root_build(&self) -> BuildRoot {
        self.builds[&self.root].clone()
    }

    fn linked_builds(
        &self,
        build: &BuildRoot,
        link: BuildLink,
    ) -> Result<Vec<BuildRoot>, CapabilityUnavailable> {
        let targets = self
            .links
            .get(&(build.name().to_string(), link))
            .ok_or_else(|| CapabilityUnavailable {
                link,
                build: build.name().to_string(),
            })?;

        Ok(targets
            .iter()
            .filter_map(|name| self.builds.get(name).cloned())
            .collect())
    }

    fn fetch_models(&self, units: &[FetchUnit]) -> Result<Vec<ProjectModels<'_>>, BatchFailure> {
        self.batch_calls.set(self.batch_calls.get() + 1);

        let mut models = Vec::new();
        let mut failures = Vec::new();

        for unit in units {
            let key = Self::key(&unit.project);
            if let Some(message) = self.failures.get(&key) {
                failures.push(UnitFailure {
                    project: unit.project.to_string(),
                    message: message.clone(),
                });
                continue;
            }
            if self.dropped.contains(&key) {
                continue;
            }

            models.push(ProjectModels {
                project: unit.project.clone(),
                source_sets: self
                    .models
                    .get(&key)
                    .map(|sets| sets.iter().collect())
                    .unwrap_or_default(),
            });
        }

        if !failures.is_empty() {
            return Err(BatchFailure { failures });
        }
        if self.reverse {
            models.reverse();
        }
        Ok(models)
    }
}
