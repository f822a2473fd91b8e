//! Per-project model fetching.
//!
//! One fetch unit per project across every collected build root, submitted to
//! the host as a single batch.

use std::collections::HashMap;

use crate::core::{BuildRoot, ProjectRef};
use crate::host::{BuildHost, FetchUnit, ProjectModels};
use crate::resolver::errors::ResolveError;

/// Build one fetch unit per project, in root then project order.
pub fn fetch_units(roots: &[BuildRoot]) -> Vec<FetchUnit> {
    roots
        .iter()
        .flat_map(|root| root.projects().iter().cloned())
        .map(FetchUnit::new)
        .collect()
}

/// Fetch the models of every project in `roots` as one batch.
///
/// The result has exactly one entry per unit, in unit order, regardless of
/// the order the host answered in. Any failed or unanswered unit fails the
/// whole fetch.
pub fn fetch_project_models<'h>(
    host: &'h dyn BuildHost,
    roots: &[BuildRoot],
) -> Result<Vec<ProjectModels<'h>>, ResolveError> {
    let units = fetch_units(roots);
    tracing::debug!("Fetching models for {} project(s)", units.len());

    let fetched = host.fetch_models(&units).map_err(|e| {
        let message = e
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.project, f.message))
            .collect::<Vec<_>>()
            .join("; ");
        ResolveError::FetchFailure {
            projects: e.failures.into_iter().map(|f| f.project).collect(),
            message,
        }
    })?;

    let mut by_project: HashMap<ProjectRef, ProjectModels<'h>> = fetched
        .into_iter()
        .map(|models| (models.project.clone(), models))
        .collect();

    let mut ordered = Vec::with_capacity(units.len());
    let mut missing = Vec::new();
    for unit in &units {
        match by_project.remove(&unit.project) {
            Some(models) => ordered.push(models),
            None => missing.push(unit.project.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(ResolveError::FetchFailure {
            projects: missing,
            message: "the host returned no models for these projects".to_string(),
        });
    }

    for extra in by_project.keys() {
        tracing::debug!("Ignoring models for unrequested project {}", extra);
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RawSourceSet;
    use crate::test_support::MockHost;

    fn host() -> MockHost {
        MockHost::new(BuildRoot::new("app", "/w/app"))
            .with_project("app", ":", "/w/app", vec![RawSourceSet::named("/w/app", "main")])
            .with_project(
                "app",
                ":core",
                "/w/app/core",
                vec![
                    RawSourceSet::named("/w/app/core", "main"),
                    RawSourceSet::named("/w/app/core", "test"),
                ],
            )
    }

    #[test]
    fn test_single_batch_in_unit_order() {
        let host = host();
        let roots = vec![host.root_build()];

        let models = fetch_project_models(&host, &roots).unwrap();

        assert_eq!(host.batch_calls(), 1);
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].project.path, ":");
        assert_eq!(models[1].project.path, ":core");
        assert_eq!(models[1].source_sets.len(), 2);
    }

    #[test]
    fn test_results_reordered_to_unit_order() {
        let host = host().answer_in_reverse();
        let roots = vec![host.root_build()];

        let models = fetch_project_models(&host, &roots).unwrap();

        assert_eq!(models[0].project.path, ":");
        assert_eq!(models[1].project.path, ":core");
    }

    #[test]
    fn test_failure_names_every_project() {
        let host = host()
            .failing("app", ":", "script error")
            .failing("app", ":core", "missing plugin");
        let roots = vec![host.root_build()];

        match fetch_project_models(&host, &roots) {
            Err(ResolveError::FetchFailure { projects, message }) => {
                assert_eq!(projects.len(), 2);
                assert!(message.contains("script error"));
                assert!(message.contains("missing plugin"));
            }
            other => panic!("expected fetch failure, got {:?}", other.map(|m| m.len())),
        }
    }

    #[test]
    fn test_unanswered_unit_fails() {
        let host = host().dropping("app", ":core");
        let roots = vec![host.root_build()];

        match fetch_project_models(&host, &roots) {
            Err(ResolveError::FetchFailure { projects, .. }) => {
                assert_eq!(projects, vec![":core (in build `app`)".to_string()]);
            }
            other => panic!("expected fetch failure, got {:?}", other.map(|m| m.len())),
        }
    }
}
