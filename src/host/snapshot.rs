//! File-backed build host.
//!
//! Serves a JSON description of a multi-build tree. Each build lists its
//! projects with their raw source-set fragments, and optionally the builds it
//! links to. A missing link list means the host cannot enumerate that kind of
//! link for the build, the same way an older host lacks the capability.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{BuildRoot, ProjectRef};
use crate::host::{
    BatchFailure, BuildHost, BuildLink, CapabilityUnavailable, FetchUnit, ProjectModels,
    RawSourceSet, UnitFailure,
};

/// Errors loading a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("root build `{0}` is not described in the snapshot")]
    MissingRoot(String),
}

/// The serialized build tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Name of the build the resolve starts from
    pub root: String,

    /// All builds, keyed by root project name
    #[serde(default)]
    pub builds: BTreeMap<String, SnapshotBuild>,
}

impl Snapshot {
    pub fn new(root: impl Into<String>) -> Self {
        Snapshot {
            root: root.into(),
            builds: BTreeMap::new(),
        }
    }

    pub fn with_build(mut self, name: impl Into<String>, build: SnapshotBuild) -> Self {
        self.builds.insert(name.into(), build);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotBuild {
    pub root_dir: Option<PathBuf>,
    pub projects: Vec<SnapshotProject>,
    pub editable_builds: Option<Vec<String>>,
    pub included_builds: Option<Vec<String>>,
}

impl SnapshotBuild {
    pub fn with_project(mut self, project: SnapshotProject) -> Self {
        self.projects.push(project);
        self
    }

    pub fn with_editable_builds<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.editable_builds = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_included_builds<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.included_builds = Some(names.into_iter().map(Into::into).collect());
        self
    }

    fn links(&self, link: BuildLink) -> Option<&[String]> {
        match link {
            BuildLink::Editable => self.editable_builds.as_deref(),
            BuildLink::Included => self.included_builds.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotProject {
    pub path: String,
    pub dir: PathBuf,
    #[serde(default)]
    pub source_sets: Vec<RawSourceSet>,
    /// When set, fetching this project fails with this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SnapshotProject {
    pub fn new(path: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        SnapshotProject {
            path: path.into(),
            dir: dir.into(),
            source_sets: Vec::new(),
            error: None,
        }
    }

    pub fn with_source_set(mut self, source_set: RawSourceSet) -> Self {
        self.source_sets.push(source_set);
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

/// A [`BuildHost`] serving a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotHost {
    snapshot: Snapshot,
    jobs: Option<usize>,
}

impl SnapshotHost {
    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        if !snapshot.builds.contains_key(&snapshot.root) {
            return Err(SnapshotError::MissingRoot(snapshot.root));
        }
        Ok(SnapshotHost {
            snapshot,
            jobs: None,
        })
    }

    /// Limit the parallelism of the fetch batch.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn build_root(&self, name: &str) -> Option<BuildRoot> {
        let build = self.snapshot.builds.get(name)?;
        let root_dir = build
            .root_dir
            .clone()
            .or_else(|| build.projects.first().map(|p| p.dir.clone()))
            .unwrap_or_default();

        let root = build
            .projects
            .iter()
            .fold(BuildRoot::new(name, root_dir), |root, project| {
                root.with_project(project.path.clone(), project.dir.clone())
            });
        Some(root)
    }

    fn fetch_one(&self, project: &ProjectRef) -> Result<ProjectModels<'_>, UnitFailure> {
        let failure = |message: String| UnitFailure {
            project: project.to_string(),
            message,
        };

        let build = self
            .snapshot
            .builds
            .get(&project.build)
            .ok_or_else(|| failure(format!("unknown build `{}`", project.build)))?;

        let found = build
            .projects
            .iter()
            .find(|p| p.path == project.path)
            .ok_or_else(|| failure("project is not part of its build".to_string()))?;

        if let Some(message) = &found.error {
            return Err(failure(message.clone()));
        }

        Ok(ProjectModels {
            project: project.clone(),
            source_sets: found.source_sets.iter().collect(),
        })
    }
}

impl BuildHost for SnapshotHost {
    fn root_build(&self) -> BuildRoot {
        // from_snapshot guarantees the root build is present
        self.build_root(&self.snapshot.root)
            .unwrap_or_else(|| BuildRoot::new(self.snapshot.root.clone(), PathBuf::new()))
    }

    fn linked_builds(
        &self,
        build: &BuildRoot,
        link: BuildLink,
    ) -> Result<Vec<BuildRoot>, CapabilityUnavailable> {
        let unavailable = || CapabilityUnavailable {
            link,
            build: build.name().to_string(),
        };

        let names = self
            .snapshot
            .builds
            .get(build.name())
            .and_then(|b| b.links(link))
            .ok_or_else(unavailable)?;

        let mut roots = Vec::with_capacity(names.len());
        for name in names {
            match self.build_root(name) {
                Some(root) => roots.push(root),
                None => tracing::warn!(
                    "build `{}` links to `{}`, which is not described in the snapshot",
                    build.name(),
                    name
                ),
            }
        }
        Ok(roots)
    }

    fn fetch_models(&self, units: &[FetchUnit]) -> Result<Vec<ProjectModels<'_>>, BatchFailure> {
        if let Some(j) = self.jobs {
            rayon::ThreadPoolBuilder::new()
                .num_threads(j)
                .build_global()
                .ok(); // Ignore if already set
        }

        let results: Vec<Result<ProjectModels<'_>, UnitFailure>> = units
            .par_iter()
            .map(|unit| self.fetch_one(&unit.project))
            .collect();

        let mut models = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(m) => models.push(m),
                Err(f) => failures.push(f),
            }
        }

        if failures.is_empty() {
            Ok(models)
        } else {
            Err(BatchFailure { failures })
        }
    }
}
