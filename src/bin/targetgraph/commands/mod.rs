//! Command implementations

pub mod completions;
pub mod diff;
pub mod resolve;
pub mod tree;
