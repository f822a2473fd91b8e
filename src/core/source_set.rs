//! Source sets - the independently compilable units of a project.
//!
//! A SourceSet is an owned snapshot: it is copied out of the host model as
//! soon as it is fetched and never refers back into host-managed objects.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::extension::{Language, LanguageExtension};
use crate::core::target_id::BuildTargetId;

/// Identity of a source set: (project directory, source-set name).
///
/// Unique within a merged graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSetId {
    project_dir: PathBuf,
    source_set_name: String,
}

impl SourceSetId {
    /// Create a new source-set identity.
    pub fn new(project_dir: impl Into<PathBuf>, source_set_name: impl Into<String>) -> Self {
        SourceSetId {
            project_dir: project_dir.into(),
            source_set_name: source_set_name.into(),
        }
    }

    /// The owning project's directory.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// The source-set name (e.g. `main`, `test`).
    pub fn source_set_name(&self) -> &str {
        &self.source_set_name
    }
}

impl fmt::Display for SourceSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.project_dir.display(), self.source_set_name)
    }
}

/// A single resolved file backing a module dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Artifact {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
}

impl Artifact {
    pub fn new(uri: impl Into<String>) -> Self {
        Artifact {
            uri: uri.into(),
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }
}

/// A reference to an external (non-project) library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleDependency {
    pub group: String,
    pub module: String,
    pub version: String,
    pub artifacts: Vec<Artifact>,
}

impl ModuleDependency {
    pub fn new(
        group: impl Into<String>,
        module: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        ModuleDependency {
            group: group.into(),
            module: module.into(),
            version: version.into(),
            artifacts: Vec::new(),
        }
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// `group:module:version` coordinates.
    pub fn coordinates(&self) -> String {
        format!("{}:{}:{}", self.group, self.module, self.version)
    }
}

/// A task that launches an application from this source set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTask {
    pub task_path: String,
    pub classpath: Vec<PathBuf>,
    pub jvm_options: Vec<String>,
    pub working_directory: Option<PathBuf>,
    pub environment_variables: BTreeMap<String, String>,
    pub main_class: Option<String>,
    pub arguments: Vec<String>,
}

/// An independently compilable group of sources within a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSet {
    pub gradle_version: Option<String>,
    pub project_name: String,
    pub project_path: String,
    pub project_dir: PathBuf,
    pub root_dir: PathBuf,
    pub source_set_name: String,
    pub classes_task_name: Option<String>,
    pub clean_task_name: Option<String>,
    pub task_names: BTreeSet<String>,

    pub source_dirs: BTreeSet<PathBuf>,
    pub generated_source_dirs: BTreeSet<PathBuf>,
    pub resource_dirs: BTreeSet<PathBuf>,
    pub source_output_dirs: BTreeSet<PathBuf>,
    pub resource_output_dirs: BTreeSet<PathBuf>,

    /// Archive file -> ordered directories it packages
    pub archive_output_files: BTreeMap<PathBuf, Vec<PathBuf>>,

    /// Order and duplicates are significant
    pub compile_classpath: Vec<PathBuf>,
    pub runtime_classpath: Vec<PathBuf>,

    pub module_dependencies: Vec<ModuleDependency>,

    /// Populated by the linker
    pub build_target_dependencies: BTreeSet<SourceSetId>,

    pub has_tests: bool,
    pub run_tasks: Vec<RunTask>,
    pub extensions: BTreeMap<Language, LanguageExtension>,
}

impl SourceSet {
    /// Create an empty source set with the given identity.
    pub fn new(project_dir: impl Into<PathBuf>, source_set_name: impl Into<String>) -> Self {
        let project_dir = project_dir.into();
        SourceSet {
            root_dir: project_dir.clone(),
            project_dir,
            source_set_name: source_set_name.into(),
            project_path: ":".to_string(),
            ..Default::default()
        }
    }

    /// The identity of this source set.
    pub fn id(&self) -> SourceSetId {
        SourceSetId::new(self.project_dir.clone(), self.source_set_name.clone())
    }

    /// Check whether this source set has the given identity.
    pub fn is(&self, id: &SourceSetId) -> bool {
        self.project_dir == id.project_dir() && self.source_set_name == id.source_set_name()
    }

    /// The externally visible build target identifier.
    pub fn target_id(&self) -> BuildTargetId {
        BuildTargetId::for_source_set(&self.project_dir, &self.source_set_name)
    }

    /// Human-readable name, e.g. `app [test]`.
    pub fn display_name(&self) -> String {
        let project = if self.project_name.is_empty() {
            self.project_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.project_dir.display().to_string())
        } else {
            self.project_name.clone()
        };
        format!("{} [{}]", project, self.source_set_name)
    }

    /// Build target tags (`test` for source sets with test tasks).
    pub fn tags(&self) -> Vec<&'static str> {
        if self.has_tests {
            vec!["test"]
        } else {
            Vec::new()
        }
    }

    /// Source- and resource-output directories, source outputs first.
    pub fn output_dirs(&self) -> impl Iterator<Item = &PathBuf> {
        self.source_output_dirs
            .iter()
            .chain(self.resource_output_dirs.iter())
    }

    /// Languages with an extension attached, in canonical order.
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.extensions.keys().copied()
    }

    /// Get the extension for a language.
    pub fn extension(&self, language: Language) -> Option<&LanguageExtension> {
        self.extensions.get(&language)
    }

    /// Check whether `path` lies under one of this source set's source directories.
    pub fn contains_source(&self, path: &Path) -> bool {
        self.source_dirs
            .iter()
            .chain(self.generated_source_dirs.iter())
            .any(|dir| path.starts_with(dir))
    }
}
