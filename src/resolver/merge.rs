//! Source-set merging.
//!
//! Flattens fetched fragments into one owned sequence of [`SourceSet`]s,
//! sorted by identity. Nothing in the result borrows from the host.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::{
    Artifact, Language, LanguageExtension, LanguageFilter, ModuleDependency, ProjectRef, RunTask,
    SourceSet, SourceSetId,
};
use crate::host::{ProjectModels, RawModuleDependency, RawRunTask, RawSourceSet};
use crate::resolver::errors::ResolveError;

/// What to do when two fragments share a source-set identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail the resolve with [`ResolveError::IdentityCollision`]
    #[default]
    Error,
    /// Keep the first fragment in fetch order and log a warning
    FirstWins,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(DuplicatePolicy::Error),
            "first-wins" => Ok(DuplicatePolicy::FirstWins),
            other => Err(format!(
                "unknown duplicate policy `{}` (expected `error` or `first-wins`)",
                other
            )),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Error => write!(f, "error"),
            DuplicatePolicy::FirstWins => write!(f, "first-wins"),
        }
    }
}

/// Merge fetched fragments into owned source sets, sorted by identity.
pub fn merge_source_sets(
    models: &[ProjectModels<'_>],
    policy: DuplicatePolicy,
    languages: &LanguageFilter,
) -> Result<Vec<SourceSet>, ResolveError> {
    let mut seen: HashMap<SourceSetId, String> = HashMap::new();
    let mut merged = Vec::new();

    for fragment in models {
        for raw in &fragment.source_sets {
            let source_set = materialize(raw, &fragment.project, languages)?;
            let id = source_set.id();

            if let Some(first) = seen.get(&id) {
                match policy {
                    DuplicatePolicy::Error => {
                        return Err(ResolveError::IdentityCollision {
                            id,
                            first: first.clone(),
                            second: fragment.project.to_string(),
                        });
                    }
                    DuplicatePolicy::FirstWins => {
                        tracing::warn!(
                            "source set `{}` from {} is already defined by {}; keeping the first",
                            id,
                            fragment.project,
                            first
                        );
                        continue;
                    }
                }
            }

            seen.insert(id, fragment.project.to_string());
            merged.push(source_set);
        }
    }

    merged.sort_by(|a, b| {
        (&a.project_dir, &a.source_set_name).cmp(&(&b.project_dir, &b.source_set_name))
    });

    tracing::debug!("Merged {} source set(s)", merged.len());
    Ok(merged)
}

/// Copy a raw fragment into an owned [`SourceSet`].
pub fn materialize(
    raw: &RawSourceSet,
    project: &ProjectRef,
    languages: &LanguageFilter,
) -> Result<SourceSet, ResolveError> {
    let source_set_name = raw
        .source_set_name
        .clone()
        .ok_or_else(|| ResolveError::InvalidModel {
            project: project.to_string(),
            message: "source set has no name".to_string(),
        })?;
    let project_dir = raw.project_dir.clone().unwrap_or_else(|| project.dir.clone());

    let mut module_dependencies: Vec<ModuleDependency> = raw
        .module_dependencies
        .iter()
        .flatten()
        .map(module_dependency)
        .collect();
    module_dependencies.sort();
    module_dependencies.dedup();

    let mut source_set = SourceSet {
        gradle_version: raw.gradle_version.clone(),
        project_name: raw.project_name.clone().unwrap_or_default(),
        project_path: raw
            .project_path
            .clone()
            .unwrap_or_else(|| project.path.clone()),
        root_dir: raw.root_dir.clone().unwrap_or_else(|| project_dir.clone()),
        project_dir,
        source_set_name,
        classes_task_name: raw.classes_task_name.clone(),
        clean_task_name: raw.clean_task_name.clone(),
        task_names: raw.task_names.iter().flatten().cloned().collect(),
        source_dirs: paths(&raw.source_dirs),
        generated_source_dirs: paths(&raw.generated_source_dirs),
        resource_dirs: paths(&raw.resource_dirs),
        source_output_dirs: paths(&raw.source_output_dirs),
        resource_output_dirs: paths(&raw.resource_output_dirs),
        archive_output_files: raw.archive_output_files.clone().unwrap_or_default(),
        compile_classpath: raw.compile_classpath.clone().unwrap_or_default(),
        runtime_classpath: raw.runtime_classpath.clone().unwrap_or_default(),
        module_dependencies,
        build_target_dependencies: Default::default(),
        has_tests: raw.has_tests.unwrap_or(false),
        run_tasks: raw.run_tasks.iter().flatten().map(run_task).collect(),
        extensions: Default::default(),
    };

    for (name, payload) in raw.extensions.iter().flatten() {
        let language = match name.parse::<Language>() {
            Ok(language) => language,
            Err(e) => {
                tracing::debug!("Skipping extension on `{}`: {}", source_set.id(), e);
                continue;
            }
        };
        if !languages.allows(language) {
            tracing::debug!("Skipping disabled {} extension on `{}`", language, source_set.id());
            continue;
        }

        match LanguageExtension::from_payload(language, payload) {
            Ok(extension) => {
                source_set.extensions.insert(language, extension);
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring malformed {} extension on `{}`: {}",
                    language,
                    source_set.id(),
                    e
                );
            }
        }
    }

    Ok(source_set)
}

fn paths(raw: &Option<Vec<PathBuf>>) -> BTreeSet<PathBuf> {
    raw.iter().flatten().cloned().collect()
}

fn module_dependency(raw: &RawModuleDependency) -> ModuleDependency {
    ModuleDependency {
        group: raw.group.clone().unwrap_or_default(),
        module: raw.module.clone().unwrap_or_default(),
        version: raw.version.clone().unwrap_or_default(),
        artifacts: raw
            .artifacts
            .iter()
            .flatten()
            .map(|a| Artifact {
                uri: a.uri.clone(),
                classifier: a.classifier.clone(),
            })
            .collect(),
    }
}

fn run_task(raw: &RawRunTask) -> RunTask {
    RunTask {
        task_path: raw.task_path.clone().unwrap_or_default(),
        classpath: raw.classpath.clone().unwrap_or_default(),
        jvm_options: raw.jvm_options.clone().unwrap_or_default(),
        working_directory: raw.working_directory.clone(),
        environment_variables: raw.environment_variables.clone().unwrap_or_default(),
        main_class: raw.main_class.clone(),
        arguments: raw.arguments.clone().unwrap_or_default(),
    }
}
