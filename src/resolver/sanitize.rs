//! Artifact sanitizing.
//!
//! A project can depend directly on another project's output directory or
//! archive. The host then reports that file as an artifact of a module
//! dependency. Such artifacts are removed here so they do not pose as external
//! libraries.

use std::collections::HashSet;

use crate::core::SourceSet;
use crate::util::uri;

/// URIs of every output directory and archive, with and without a trailing
/// slash.
pub fn exclusion_set(source_sets: &[SourceSet]) -> HashSet<String> {
    let mut excluded = HashSet::new();

    for source_set in source_sets {
        let outputs = source_set
            .output_dirs()
            .chain(source_set.archive_output_files.keys())
            .chain(source_set.archive_output_files.values().flatten());

        for path in outputs {
            match uri::uri_forms(path) {
                Some(forms) => excluded.extend(forms),
                None => tracing::debug!("Cannot render {} as a file URI", path.display()),
            }
        }
    }

    excluded
}

/// Remove artifacts that point at project outputs, then module dependencies
/// left without artifacts. Returns the number of artifacts removed.
pub fn sanitize(source_sets: &mut [SourceSet]) -> usize {
    let excluded = exclusion_set(source_sets);
    let mut removed = 0;

    for source_set in source_sets.iter_mut() {
        for module in &mut source_set.module_dependencies {
            let before = module.artifacts.len();
            module.artifacts.retain(|a| !excluded.contains(&a.uri));
            removed += before - module.artifacts.len();
        }
        source_set
            .module_dependencies
            .retain(|m| !m.artifacts.is_empty());
    }

    tracing::debug!("Removed {} project-output artifact(s)", removed);
    removed
}
