//! Core data structures for targetgraph.
//!
//! This module contains the foundational types used throughout targetgraph:
//! - Build roots and project references reported by the host
//! - Source sets, their identities and module dependencies
//! - Per-language extensions
//! - Client-facing build target identifiers

pub mod build_root;
pub mod extension;
pub mod source_set;
pub mod target_id;

pub use build_root::{BuildRoot, ProjectRef};
pub use extension::{
    AntlrExtension, CompileSettings, GroovyExtension, JavaExtension, KotlinExtension, Language,
    LanguageExtension, LanguageFilter, ScalaExtension,
};
pub use source_set::{Artifact, ModuleDependency, RunTask, SourceSet, SourceSetId};
pub use target_id::BuildTargetId;
