//! Dependency linking.
//!
//! Two passes over the complete merged set. Pass 1 indexes every output
//! directory and archive by owner. Pass 2 walks each classpath, adds an edge
//! for every entry owned by another source set, and expands archive entries in
//! place to the directories they package.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::core::{SourceSet, SourceSetId};

/// Output locations of every source set, keyed by file identity.
#[derive(Debug, Default)]
pub struct OutputIndex {
    /// Output directory or archive -> index of the owning source set
    owners: HashMap<PathBuf, usize>,

    /// Archive -> directories it packages, in registration order
    archives: HashMap<PathBuf, Vec<PathBuf>>,
}

impl OutputIndex {
    /// Index all outputs of `source_sets`.
    ///
    /// When two source sets claim the same output, the one earlier in
    /// `source_sets` keeps it.
    pub fn build(source_sets: &[SourceSet]) -> Self {
        let mut index = OutputIndex::default();

        for (idx, source_set) in source_sets.iter().enumerate() {
            for dir in source_set.output_dirs() {
                index.register(dir, idx, source_sets);
            }
            for (archive, dirs) in &source_set.archive_output_files {
                index.register(archive, idx, source_sets);
                index
                    .archives
                    .entry(archive.clone())
                    .or_default()
                    .extend(dirs.iter().cloned());
            }
        }

        index
    }

    fn register(&mut self, path: &Path, idx: usize, source_sets: &[SourceSet]) {
        match self.owners.entry(path.to_path_buf()) {
            Entry::Vacant(e) => {
                e.insert(idx);
            }
            Entry::Occupied(e) if *e.get() != idx => {
                tracing::warn!(
                    "{} is an output of both `{}` and `{}`; attributing it to the first",
                    path.display(),
                    source_sets[*e.get()].id(),
                    source_sets[idx].id()
                );
            }
            Entry::Occupied(_) => {}
        }
    }

    /// The index of the source set owning `path`.
    pub fn owner(&self, path: &Path) -> Option<usize> {
        self.owners.get(path).copied()
    }

    /// The directories packaged by the archive at `path`.
    pub fn archive_dirs(&self, path: &Path) -> Option<&[PathBuf]> {
        self.archives.get(path).map(Vec::as_slice)
    }
}

/// Counters for one linking pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkStats {
    pub edges: usize,
    pub expanded_archives: usize,
    pub dropped_archives: usize,
}

/// Infer dependency edges and rewrite classpaths of every source set.
///
/// Replaces each source set's dependency edges. Untouched classpath entries
/// keep their relative order.
pub fn link(source_sets: &mut [SourceSet]) -> LinkStats {
    let index = OutputIndex::build(source_sets);
    let ids: Vec<SourceSetId> = source_sets.iter().map(SourceSet::id).collect();
    let mut stats = LinkStats::default();

    for (idx, source_set) in source_sets.iter_mut().enumerate() {
        let mut linker = Linker {
            index: &index,
            ids: &ids,
            this: idx,
            edges: BTreeSet::new(),
            stats: &mut stats,
        };

        source_set.compile_classpath = linker.rewrite(&source_set.compile_classpath);
        source_set.runtime_classpath = linker.rewrite(&source_set.runtime_classpath);

        let edges = linker.edges;
        stats.edges += edges.len();
        source_set.build_target_dependencies = edges;
    }

    tracing::debug!(
        "Linked {} edge(s), expanded {} archive entr(ies), dropped {}",
        stats.edges,
        stats.expanded_archives,
        stats.dropped_archives
    );
    stats
}

struct Linker<'a> {
    index: &'a OutputIndex,
    ids: &'a [SourceSetId],
    this: usize,
    edges: BTreeSet<SourceSetId>,
    stats: &'a mut LinkStats,
}

impl Linker<'_> {
    fn rewrite(&mut self, classpath: &[PathBuf]) -> Vec<PathBuf> {
        let mut rewritten = Vec::with_capacity(classpath.len());

        for entry in classpath {
            if let Some(owner) = self.index.owner(entry) {
                if owner != self.this {
                    self.edges.insert(self.ids[owner].clone());
                }
            }

            match self.index.archive_dirs(entry) {
                Some([]) => self.stats.dropped_archives += 1,
                Some(dirs) => {
                    self.stats.expanded_archives += 1;
                    rewritten.extend(dirs.iter().cloned());
                }
                None => rewritten.push(entry.clone()),
            }
        }

        rewritten
    }
}
