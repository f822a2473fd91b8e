//! Resolution error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::SourceSetId;
use crate::util::diagnostic::Diagnostic;

/// Error while synthesizing the target graph.
///
/// A resolve either yields a complete graph or one of these; there is no
/// partial result.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error("failed to fetch project models: {message}")]
    #[diagnostic(
        code(targetgraph::resolve::fetch_failure),
        help("Fix the failing projects' build configuration and resolve again")
    )]
    FetchFailure {
        projects: Vec<String>,
        message: String,
    },

    #[error("source set `{id}` is defined more than once")]
    #[diagnostic(
        code(targetgraph::resolve::identity_collision),
        help("Include each build only once, or set `resolve.on_duplicate = \"first-wins\"`")
    )]
    IdentityCollision {
        id: SourceSetId,
        first: String,
        second: String,
    },

    #[error("invalid source-set model from {project}: {message}")]
    #[diagnostic(code(targetgraph::resolve::invalid_model))]
    InvalidModel { project: String, message: String },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::FetchFailure { projects, message } => {
                let mut diag = Diagnostic::error(format!(
                    "failed to fetch models for {} project(s)",
                    projects.len()
                ));

                for project in projects {
                    diag = diag.with_context(format!("unresolved: {}", project));
                }
                diag = diag.with_context(message.clone());

                diag.with_suggestion("Fix the failing projects' build configuration".to_string())
                    .with_suggestion("Run with `--verbose` to see every fetch unit".to_string())
            }

            ResolveError::IdentityCollision { id, first, second } => {
                Diagnostic::error(format!("source set `{}` is defined more than once", id))
                    .with_context(format!("first reported by {}", first))
                    .with_context(format!("again reported by {}", second))
                    .with_suggestion(
                        "Include the build only once in the composite".to_string(),
                    )
                    .with_suggestion(
                        "Keep the first definition: set `on_duplicate = \"first-wins\"` under [resolve]"
                            .to_string(),
                    )
            }

            ResolveError::InvalidModel { project, message } => {
                Diagnostic::error(format!("invalid source-set model from {}", project))
                    .with_context(message.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_diagnostic() {
        let err = ResolveError::FetchFailure {
            projects: vec![":core (in build `app`)".to_string(), ":web (in build `app`)".to_string()],
            message: "could not evaluate build script".to_string(),
        };

        let output = err.to_diagnostic().format(false);

        assert!(output.contains("2 project(s)"));
        assert!(output.contains(":core (in build `app`)"));
        assert!(output.contains(":web (in build `app`)"));
        assert!(output.contains("could not evaluate build script"));
    }

    #[test]
    fn test_identity_collision_diagnostic() {
        let err = ResolveError::IdentityCollision {
            id: SourceSetId::new("/w/lib", "main"),
            first: ": (in build `lib`)".to_string(),
            second: ": (in build `lib-copy`)".to_string(),
        };

        let output = err.to_diagnostic().format(false);

        assert!(output.contains("defined more than once"));
        assert!(output.contains("lib-copy"));
        assert!(output.contains("first-wins"));
    }
}
