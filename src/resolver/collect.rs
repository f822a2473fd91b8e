//! Build tree collection.
//!
//! Walks linked builds from the root build and returns every reachable build
//! root exactly once, keyed by root project name.

use std::collections::BTreeMap;

use crate::core::BuildRoot;
use crate::host::{BuildHost, BuildLink};

/// Link kinds to probe, most capable first.
pub const PROBE_ORDER: [BuildLink; 2] = [BuildLink::Editable, BuildLink::Included];

/// Collect every build root reachable from the host's root build.
///
/// Roots are deduplicated by name, so cycles and diamond inclusions are
/// visited once. A build whose host supports none of the probes simply
/// contributes no further roots.
pub fn collect_build_roots(host: &dyn BuildHost) -> Vec<BuildRoot> {
    let root = host.root_build();
    let mut roots: BTreeMap<String, BuildRoot> = BTreeMap::new();
    let mut stack = vec![root];

    while let Some(build) = stack.pop() {
        if roots.contains_key(build.name()) {
            continue;
        }

        for linked in linked_builds(host, &build) {
            if !roots.contains_key(linked.name()) {
                stack.push(linked);
            }
        }

        roots.insert(build.name().to_string(), build);
    }

    tracing::debug!("Collected {} build root(s)", roots.len());
    roots.into_values().collect()
}

fn linked_builds(host: &dyn BuildHost, build: &BuildRoot) -> Vec<BuildRoot> {
    for link in PROBE_ORDER {
        match host.linked_builds(build, link) {
            Ok(linked) => return linked,
            Err(e) => tracing::debug!("{}, trying next probe", e),
        }
    }

    tracing::debug!("No build enumeration available for `{}`", build.name());
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockHost;

    fn names(roots: &[BuildRoot]) -> Vec<&str> {
        roots.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_single_build() {
        let host = MockHost::new(BuildRoot::new("app", "/w/app"));
        let roots = collect_build_roots(&host);
        assert_eq!(names(&roots), vec!["app"]);
    }

    #[test]
    fn test_diamond_and_cycle_visited_once() {
        let host = MockHost::new(BuildRoot::new("app", "/w/app"))
            .with_build(BuildRoot::new("a", "/w/a"))
            .with_build(BuildRoot::new("b", "/w/b"))
            .with_build(BuildRoot::new("shared", "/w/shared"))
            .with_link("app", BuildLink::Editable, &["a", "b"])
            .with_link("a", BuildLink::Editable, &["shared"])
            .with_link("b", BuildLink::Editable, &["shared"])
            .with_link("shared", BuildLink::Editable, &["app"]);

        let roots = collect_build_roots(&host);
        assert_eq!(names(&roots), vec!["a", "app", "b", "shared"]);
    }

    #[test]
    fn test_falls_back_to_included_builds() {
        let host = MockHost::new(BuildRoot::new("app", "/w/app"))
            .with_build(BuildRoot::new("lib", "/w/lib"))
            .with_link("app", BuildLink::Included, &["lib"]);

        let roots = collect_build_roots(&host);
        assert_eq!(names(&roots), vec!["app", "lib"]);
    }

    #[test]
    fn test_editable_builds_preferred() {
        let host = MockHost::new(BuildRoot::new("app", "/w/app"))
            .with_build(BuildRoot::new("editable", "/w/editable"))
            .with_build(BuildRoot::new("included", "/w/included"))
            .with_link("app", BuildLink::Editable, &["editable"])
            .with_link("app", BuildLink::Included, &["included"]);

        let roots = collect_build_roots(&host);
        assert_eq!(names(&roots), vec!["app", "editable"]);
    }

    #[test]
    fn test_no_capability_is_not_an_error() {
        let host = MockHost::new(BuildRoot::new("app", "/w/app"))
            .with_build(BuildRoot::new("lib", "/w/lib"));

        let roots = collect_build_roots(&host);
        assert_eq!(names(&roots), vec!["app"]);
    }
}
