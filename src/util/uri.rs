//! `file:` URI rendering for paths.
//!
//! A directory's URI conventionally ends in `/` only when the directory exists,
//! so the same output directory can render two ways across resolves. Callers
//! that compare URIs should use [`uri_forms`], which yields both.

use std::path::{Path, PathBuf};

use url::Url;

fn absolute(path: &Path) -> Option<PathBuf> {
    std::path::absolute(path).ok()
}

/// The `file:` URI of a path without a trailing slash. Does not touch the disk.
pub fn file_uri(path: &Path) -> Option<Url> {
    Url::from_file_path(absolute(path)?).ok()
}

/// The `file:` URI of a directory, always with a trailing slash.
pub fn directory_uri(path: &Path) -> Option<Url> {
    Url::from_directory_path(absolute(path)?).ok()
}

/// Toggle a single trailing `/` on a URI string.
pub fn toggle_trailing_slash(uri: &str) -> String {
    match uri.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => format!("{}/", uri),
    }
}

/// Both URI forms of a path, without and with a single trailing slash.
pub fn uri_forms(path: &Path) -> Option<[String; 2]> {
    let uri = file_uri(path)?.to_string();
    let toggled = toggle_trailing_slash(&uri);
    Some([uri, toggled])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_file_uri() {
        let url = file_uri(Path::new("/P/out/main")).unwrap();
        assert_eq!(url.as_str(), "file:///P/out/main");

        let dir = directory_uri(Path::new("/P/out/main")).unwrap();
        assert_eq!(dir.as_str(), "file:///P/out/main/");
    }

    #[test]
    fn test_toggle_trailing_slash() {
        assert_eq!(toggle_trailing_slash("file:///a/b"), "file:///a/b/");
        assert_eq!(toggle_trailing_slash("file:///a/b/"), "file:///a/b");
    }

    #[cfg(unix)]
    #[test]
    fn test_uri_forms() {
        let forms = uri_forms(Path::new("/P/build/libs/p.jar")).unwrap();
        assert_eq!(forms[0], "file:///P/build/libs/p.jar");
        assert_eq!(forms[1], "file:///P/build/libs/p.jar/");
    }
}
