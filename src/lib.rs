//! targetgraph - build target synthesis for composite JVM builds
//!
//! This crate turns the per-project models reported by a build host into
//! a deduplicated, cross-linked graph of build targets, and reports
//! field-level changes between two such graphs.

pub mod core;
pub mod diff;
pub mod host;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for targetgraph unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides an in-memory build host and source-set
/// builders.
#[cfg(test)]
pub mod test_support;

pub use core::{BuildTargetId, SourceSet, SourceSetId};
pub use diff::{changes_between, diff, Delta, TargetChange};
pub use host::{BuildHost, SnapshotHost};
pub use resolver::{resolve, ResolveError, ResolveOptions, TargetGraph};
pub use util::context::GlobalContext;
