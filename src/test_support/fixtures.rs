//! Fixtures for owned source sets.

use std::path::PathBuf;

use crate::core::{LanguageExtension, ModuleDependency, SourceSet, SourceSetId};

/// Turn string literals into paths.
pub fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

/// Builder for [`SourceSet`] test values.
#[derive(Debug, Clone)]
pub struct SourceSetBuilder {
    source_set: SourceSet,
}

impl SourceSetBuilder {
    pub fn new(project_dir: &str, source_set_name: &str) -> Self {
        SourceSetBuilder {
            source_set: SourceSet::new(project_dir, source_set_name),
        }
    }

    pub fn project_name(mut self, name: &str) -> Self {
        self.source_set.project_name = name.to_string();
        self
    }

    pub fn source_dir(mut self, dir: &str) -> Self {
        self.source_set.source_dirs.insert(PathBuf::from(dir));
        self
    }

    pub fn source_output(mut self, dir: &str) -> Self {
        self.source_set.source_output_dirs.insert(PathBuf::from(dir));
        self
    }

    pub fn resource_output(mut self, dir: &str) -> Self {
        self.source_set.resource_output_dirs.insert(PathBuf::from(dir));
        self
    }

    /// Record an archive packaging `dirs`.
    pub fn archive(mut self, archive: &str, dirs: &[&str]) -> Self {
        self.source_set
            .archive_output_files
            .insert(PathBuf::from(archive), paths(dirs));
        self
    }

    pub fn compile_classpath(mut self, entries: &[&str]) -> Self {
        self.source_set.compile_classpath = paths(entries);
        self
    }

    pub fn runtime_classpath(mut self, entries: &[&str]) -> Self {
        self.source_set.runtime_classpath = paths(entries);
        self
    }

    pub fn module_dependency(mut self, dependency: ModuleDependency) -> Self {
        self.source_set.module_dependencies.push(dependency);
        self
    }

    pub fn depends_on(mut self, project_dir: &str, source_set_name: &str) -> Self {
        self.source_set
            .build_target_dependencies
            .insert(SourceSetId::new(project_dir, source_set_name));
        self
    }

    pub fn has_tests(mut self) -> Self {
        self.source_set.has_tests = true;
        self
    }

    pub fn extension(mut self, extension: impl Into<LanguageExtension>) -> Self {
        let extension = extension.into();
        self.source_set
            .extensions
            .insert(extension.language(), extension);
        self
    }

    pub fn build(self) -> SourceSet {
        self.source_set
    }
}
