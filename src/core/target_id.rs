//! Build target identifiers - the externally visible name of a source set.
//!
//! The identifier is the project directory's `file:` URI with the source-set
//! name in the query, e.g. `file:///w/app/?sourceset=test`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::util::uri;

const SOURCE_SET_QUERY_KEY: &str = "sourceset";

/// The identifier clients use to refer to one source set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildTargetId(String);

impl BuildTargetId {
    /// Build the identifier for a (project directory, source-set name) pair.
    ///
    /// The project URI always carries a trailing slash so that the id does
    /// not depend on whether the directory exists yet.
    pub fn for_source_set(project_dir: &Path, source_set_name: &str) -> Self {
        let base = match uri::directory_uri(project_dir) {
            Some(url) => url.to_string(),
            None => project_dir.display().to_string(),
        };
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer.append_pair(SOURCE_SET_QUERY_KEY, source_set_name);
        BuildTargetId(format!("{}?{}", base, serializer.finish()))
    }

    /// Wrap an existing identifier string.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        BuildTargetId(uri.into())
    }

    /// The identifier as a URI string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The source-set name carried in the query, if any.
    pub fn source_set_name(&self) -> Option<String> {
        let url = Url::parse(&self.0).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == SOURCE_SET_QUERY_KEY)
            .map(|(_, value)| value.into_owned())
    }

    /// The identifier without its query section.
    pub fn project_uri(&self) -> &str {
        match self.0.split_once('?') {
            Some((base, _)) => base,
            None => &self.0,
        }
    }
}

impl fmt::Display for BuildTargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_target_id_format() {
        let id = BuildTargetId::for_source_set(Path::new("/w/app"), "test");
        assert_eq!(id.as_str(), "file:///w/app/?sourceset=test");
        assert_eq!(id.project_uri(), "file:///w/app/");
    }

    #[test]
    fn test_source_set_name_roundtrip() {
        let id = BuildTargetId::for_source_set(Path::new("/w/my app"), "integration test");
        assert!(id.as_str().contains("?sourceset="));
        assert_eq!(id.source_set_name().as_deref(), Some("integration test"));
    }

    #[test]
    fn test_from_uri_without_query() {
        let id = BuildTargetId::from_uri("file:///w/app/");
        assert_eq!(id.source_set_name(), None);
        assert_eq!(id.project_uri(), "file:///w/app/");
    }
}
