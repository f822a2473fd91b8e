//! Build roots - one build tree (the main build or a linked/composite build).

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A project inside a build root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Root project name of the owning build
    pub build: String,

    /// Project path within the build (`:` for the root project)
    pub path: String,

    /// Project directory
    pub dir: PathBuf,
}

impl ProjectRef {
    pub fn new(build: impl Into<String>, path: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        ProjectRef {
            build: build.into(),
            path: path.into(),
            dir: dir.into(),
        }
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in build `{}`)", self.path, self.build)
    }
}

/// A root project name plus the projects it contains.
///
/// Used only while collecting; two roots with the same name are the same build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRoot {
    name: String,
    root_dir: PathBuf,
    projects: Vec<ProjectRef>,
}

impl BuildRoot {
    pub fn new(name: impl Into<String>, root_dir: impl Into<PathBuf>) -> Self {
        BuildRoot {
            name: name.into(),
            root_dir: root_dir.into(),
            projects: Vec::new(),
        }
    }

    /// Add a project to this build. Its `build` field is set to this root's name.
    pub fn with_project(mut self, path: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        let project = ProjectRef::new(self.name.clone(), path, dir);
        self.projects.push(project);
        self
    }

    /// The resolved root project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_dir(&self) -> &PathBuf {
        &self.root_dir
    }

    pub fn projects(&self) -> &[ProjectRef] {
        &self.projects
    }
}
