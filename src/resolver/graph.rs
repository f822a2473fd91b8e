//! TargetGraph - the frozen result of one resolve.
//!
//! Once created, a TargetGraph is read-only. Each resolve builds a new one;
//! an older graph is only kept around to diff against.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::core::{BuildTargetId, SourceSet, SourceSetId};
use crate::util::hash::Fingerprint;

/// The resolved source-set graph.
///
/// An edge `a -> b` means `a` depends on `b`.
#[derive(Debug, Clone)]
pub struct TargetGraph {
    /// Source sets sorted by identity
    source_sets: Vec<SourceSet>,

    /// Node weights are indices into `source_sets`
    graph: DiGraph<usize, ()>,

    /// Map from identity to node index
    id_to_node: HashMap<SourceSetId, NodeIndex>,

    /// Map from build target id to node index
    target_to_node: HashMap<BuildTargetId, NodeIndex>,
}

impl TargetGraph {
    /// Freeze a linked and sanitized set of source sets.
    pub fn new(mut source_sets: Vec<SourceSet>) -> Self {
        source_sets.sort_by(|a, b| {
            (&a.project_dir, &a.source_set_name).cmp(&(&b.project_dir, &b.source_set_name))
        });

        let mut graph = DiGraph::with_capacity(source_sets.len(), 0);
        let mut id_to_node = HashMap::with_capacity(source_sets.len());
        let mut target_to_node = HashMap::with_capacity(source_sets.len());

        for (idx, source_set) in source_sets.iter().enumerate() {
            let node = graph.add_node(idx);
            id_to_node.insert(source_set.id(), node);
            target_to_node.insert(source_set.target_id(), node);
        }

        for source_set in &source_sets {
            let from = id_to_node[&source_set.id()];
            for dep in &source_set.build_target_dependencies {
                match id_to_node.get(dep) {
                    Some(&to) => {
                        graph.add_edge(from, to, ());
                    }
                    None => tracing::debug!(
                        "`{}` depends on `{}`, which is not in the graph",
                        source_set.id(),
                        dep
                    ),
                }
            }
        }

        TargetGraph {
            source_sets,
            graph,
            id_to_node,
            target_to_node,
        }
    }

    fn node(&self, node: NodeIndex) -> &SourceSet {
        &self.source_sets[self.graph[node]]
    }

    fn sorted(&self, nodes: impl Iterator<Item = NodeIndex>) -> Vec<&SourceSet> {
        let mut indices: Vec<usize> = nodes.map(|n| self.graph[n]).collect();
        indices.sort_unstable();
        indices.dedup();
        indices.into_iter().map(|i| &self.source_sets[i]).collect()
    }

    /// Get the number of source sets.
    pub fn len(&self) -> usize {
        self.source_sets.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.source_sets.is_empty()
    }

    /// Iterate over all source sets in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceSet> {
        self.source_sets.iter()
    }

    pub fn source_sets(&self) -> &[SourceSet] {
        &self.source_sets
    }

    pub fn into_source_sets(self) -> Vec<SourceSet> {
        self.source_sets
    }

    /// Look up a source set by identity.
    pub fn get(&self, id: &SourceSetId) -> Option<&SourceSet> {
        self.id_to_node.get(id).map(|&n| self.node(n))
    }

    /// Look up a source set by build target id.
    pub fn get_target(&self, target: &BuildTargetId) -> Option<&SourceSet> {
        self.target_to_node.get(target).map(|&n| self.node(n))
    }

    pub fn contains(&self, id: &SourceSetId) -> bool {
        self.id_to_node.contains_key(id)
    }

    /// Direct dependencies of a source set.
    pub fn deps(&self, id: &SourceSetId) -> Vec<&SourceSet> {
        match self.id_to_node.get(id) {
            Some(&node) => self.sorted(self.graph.neighbors(node)),
            None => Vec::new(),
        }
    }

    /// Source sets that depend on the given one.
    pub fn dependents(&self, id: &SourceSetId) -> Vec<&SourceSet> {
        match self.id_to_node.get(id) {
            Some(&node) => self.sorted(self.graph.neighbors_directed(node, Direction::Incoming)),
            None => Vec::new(),
        }
    }

    /// All transitive dependencies of a source set, excluding itself.
    pub fn transitive_deps(&self, id: &SourceSetId) -> BTreeSet<SourceSetId> {
        let mut visited = BTreeSet::new();
        let mut stack: Vec<NodeIndex> = self.id_to_node.get(id).copied().into_iter().collect();

        while let Some(current) = stack.pop() {
            for next in self.graph.neighbors(current) {
                if visited.insert(self.node(next).id()) {
                    stack.push(next);
                }
            }
        }

        visited.remove(id);
        visited
    }

    /// Source sets with dependencies before dependents.
    ///
    /// Members of a dependency cycle are adjacent, in identity order.
    pub fn topological_order(&self) -> Vec<&SourceSet> {
        tarjan_scc(&self.graph)
            .into_iter()
            .flat_map(|scc| self.sorted(scc.into_iter()))
            .collect()
    }

    /// Dependency cycles, each in identity order.
    ///
    /// Composite builds can legitimately form cycles, so these are reported
    /// rather than rejected.
    pub fn cycles(&self) -> Vec<Vec<SourceSetId>> {
        let mut cycles: Vec<Vec<SourceSetId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| self.sorted(scc.into_iter()).iter().map(|s| s.id()).collect())
            .collect();
        cycles.sort();
        cycles
    }

    /// Source and generated-source directories mapped to their source set.
    pub fn source_dirs(&self) -> BTreeMap<PathBuf, SourceSetId> {
        let mut dirs = BTreeMap::new();
        for source_set in &self.source_sets {
            for dir in source_set
                .source_dirs
                .iter()
                .chain(source_set.generated_source_dirs.iter())
            {
                dirs.entry(dir.clone()).or_insert_with(|| source_set.id());
            }
        }
        dirs
    }

    /// The source set whose source directory most closely contains `path`.
    pub fn owner_of_source(&self, path: &Path) -> Option<&SourceSet> {
        self.source_dirs()
            .into_iter()
            .filter(|(dir, _)| path.starts_with(dir))
            .max_by_key(|(dir, _)| dir.components().count())
            .and_then(|(_, id)| self.get(&id))
    }

    /// SHA-256 over the full content of every source set, in identity order.
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        let mut fp = Fingerprint::new();
        for source_set in &self.source_sets {
            fp.update_json(source_set)?;
        }
        Ok(fp.finish())
    }
}
