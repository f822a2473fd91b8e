//! Raw per-project model fragments as the host reports them.
//!
//! Every field is optional: hosts of different versions omit what they do not
//! know. Extension payloads stay opaque JSON until the merger materializes them.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSourceSet {
    pub gradle_version: Option<String>,
    pub project_name: Option<String>,
    pub project_path: Option<String>,
    pub project_dir: Option<PathBuf>,
    pub root_dir: Option<PathBuf>,
    pub source_set_name: Option<String>,
    pub classes_task_name: Option<String>,
    pub clean_task_name: Option<String>,
    pub task_names: Option<Vec<String>>,
    pub source_dirs: Option<Vec<PathBuf>>,
    pub generated_source_dirs: Option<Vec<PathBuf>>,
    pub resource_dirs: Option<Vec<PathBuf>>,
    pub source_output_dirs: Option<Vec<PathBuf>>,
    pub resource_output_dirs: Option<Vec<PathBuf>>,
    pub archive_output_files: Option<BTreeMap<PathBuf, Vec<PathBuf>>>,
    pub compile_classpath: Option<Vec<PathBuf>>,
    pub runtime_classpath: Option<Vec<PathBuf>>,
    pub module_dependencies: Option<Vec<RawModuleDependency>>,
    pub has_tests: Option<bool>,
    pub run_tasks: Option<Vec<RawRunTask>>,
    pub extensions: Option<BTreeMap<String, serde_json::Value>>,
}

impl RawSourceSet {
    /// A fragment with only its identity filled in.
    pub fn named(project_dir: impl Into<PathBuf>, source_set_name: impl Into<String>) -> Self {
        RawSourceSet {
            project_dir: Some(project_dir.into()),
            source_set_name: Some(source_set_name.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawModuleDependency {
    pub group: Option<String>,
    pub module: Option<String>,
    pub version: Option<String>,
    pub artifacts: Option<Vec<RawArtifact>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArtifact {
    pub uri: String,
    #[serde(default)]
    pub classifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawRunTask {
    pub task_path: Option<String>,
    pub classpath: Option<Vec<PathBuf>>,
    pub jvm_options: Option<Vec<String>>,
    pub working_directory: Option<PathBuf>,
    pub environment_variables: Option<BTreeMap<String, String>>,
    pub main_class: Option<String>,
    pub arguments: Option<Vec<String>>,
}
