//! High-level operations.
//!
//! This module contains the workflows behind the targetgraph commands.

pub mod diff;
pub mod resolve;

pub use diff::diff_paths;
pub use resolve::{find_target, load_host, resolve_path};
