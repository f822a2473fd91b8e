//! Structural diffs between two snapshots of the same source set.
//!
//! Only unequal fields are reported, each as `name: (old -> new)`. Values
//! with a fixed field set report the changed fields nested inside their own
//! name. Collections of equal length are compared position by position;
//! collections whose length changed are reported whole. Language extensions
//! are matched by language instead of by position.
//!
//! ```text
//! SourceSet: (extensions: (0: (key:java value: (sourceCompatibility: (17 -> 9)))))
//! ```

mod model;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::core::{BuildTargetId, SourceSet};
use crate::resolver::TargetGraph;

/// A value that can be compared field by field.
pub trait Diff: PartialEq {
    /// Render the whole value for `old -> new` output.
    fn describe(&self) -> String;

    /// Changed fields between `self` and `new`.
    ///
    /// Empty for scalars, and whenever the value can only be reported whole.
    fn field_changes(&self, _new: &Self) -> Vec<FieldChange> {
        Vec::new()
    }
}

/// How one field changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Change {
    Value { old: String, new: String },
    Nested(Vec<FieldChange>),
}

/// A single changed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub name: String,
    pub change: Change,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.change {
            Change::Value { old, new } => write!(f, "{}: ({} -> {})", self.name, old, new),
            Change::Nested(changes) => write!(f, "{}: ({})", self.name, join(changes)),
        }
    }
}

fn join(changes: &[FieldChange]) -> String {
    changes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compare one named field. `None` when both sides are equal.
pub fn compare<T: Diff + ?Sized>(name: &str, old: &T, new: &T) -> Option<FieldChange> {
    if old == new {
        return None;
    }

    let nested = old.field_changes(new);
    let change = if nested.is_empty() {
        Change::Value {
            old: old.describe(),
            new: new.describe(),
        }
    } else {
        Change::Nested(nested)
    };

    Some(FieldChange {
        name: name.to_string(),
        change,
    })
}

/// Keep the fields that changed.
pub(crate) fn changed(fields: impl IntoIterator<Item = Option<FieldChange>>) -> Vec<FieldChange> {
    fields.into_iter().flatten().collect()
}

fn positional<'a, T: Diff + 'a>(
    old: impl Iterator<Item = &'a T>,
    new: impl Iterator<Item = &'a T>,
) -> Vec<FieldChange> {
    old.zip(new)
        .enumerate()
        .filter_map(|(i, (a, b))| compare(&i.to_string(), a, b))
        .collect()
}

fn describe_all<'a, T: Diff + 'a>(items: impl Iterator<Item = &'a T>) -> String {
    let items: Vec<String> = items.map(|item| item.describe()).collect();
    format!("[{}]", items.join(", "))
}

impl Diff for String {
    fn describe(&self) -> String {
        self.clone()
    }
}

impl Diff for PathBuf {
    fn describe(&self) -> String {
        self.display().to_string()
    }
}

impl Diff for bool {
    fn describe(&self) -> String {
        self.to_string()
    }
}

impl<T: Diff> Diff for Option<T> {
    fn describe(&self) -> String {
        match self {
            Some(value) => value.describe(),
            None => "none".to_string(),
        }
    }

    fn field_changes(&self, new: &Self) -> Vec<FieldChange> {
        match (self, new) {
            (Some(old), Some(new)) => old.field_changes(new),
            _ => Vec::new(),
        }
    }
}

impl<T: Diff> Diff for Vec<T> {
    fn describe(&self) -> String {
        describe_all(self.iter())
    }

    fn field_changes(&self, new: &Self) -> Vec<FieldChange> {
        if self.len() != new.len() {
            return Vec::new();
        }
        positional(self.iter(), new.iter())
    }
}

impl<T: Diff + Ord> Diff for BTreeSet<T> {
    fn describe(&self) -> String {
        describe_all(self.iter())
    }

    fn field_changes(&self, new: &Self) -> Vec<FieldChange> {
        if self.len() != new.len() {
            return Vec::new();
        }
        positional(self.iter(), new.iter())
    }
}

impl<K: Diff + Ord, V: Diff> Diff for BTreeMap<K, V> {
    fn describe(&self) -> String {
        let entries: Vec<String> = self
            .iter()
            .map(|(k, v)| format!("{}={}", k.describe(), v.describe()))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }

    fn field_changes(&self, new: &Self) -> Vec<FieldChange> {
        if self.len() != new.len() {
            return Vec::new();
        }

        self.iter()
            .zip(new.iter())
            .enumerate()
            .filter_map(|(i, ((old_key, old_value), (new_key, new_value)))| {
                let entry = match compare("key", old_key, new_key) {
                    Some(key_change) => key_change,
                    None => compare(
                        &format!("key:{} value", old_key.describe()),
                        old_value,
                        new_value,
                    )?,
                };
                Some(FieldChange {
                    name: i.to_string(),
                    change: Change::Nested(vec![entry]),
                })
            })
            .collect()
    }
}

/// The field-level changes of one source set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSetDiff {
    pub changes: Vec<FieldChange>,
}

impl fmt::Display for SourceSetDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceSet: ({})", join(&self.changes))
    }
}

/// Outcome of comparing two snapshots of one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "diff", rename_all = "lowercase")]
pub enum Delta {
    /// No material change; callers suppress notification
    Unchanged,
    Added,
    Removed,
    Changed(SourceSetDiff),
}

impl Delta {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Delta::Unchanged)
    }
}

/// Compare two snapshots of one source set. Either side may be absent.
pub fn diff(old: Option<&SourceSet>, new: Option<&SourceSet>) -> Delta {
    match (old, new) {
        (None, None) => Delta::Unchanged,
        (None, Some(_)) => Delta::Added,
        (Some(_), None) => Delta::Removed,
        (Some(old), Some(new)) => {
            let changes = old.field_changes(new);
            if changes.is_empty() {
                Delta::Unchanged
            } else {
                Delta::Changed(SourceSetDiff { changes })
            }
        }
    }
}

/// One added, removed or changed build target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetChange {
    pub id: BuildTargetId,
    pub delta: Delta,
}

impl fmt::Display for TargetChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.delta {
            Delta::Unchanged => write!(f, "unchanged {}", self.id),
            Delta::Added => write!(f, "added {}", self.id),
            Delta::Removed => write!(f, "removed {}", self.id),
            Delta::Changed(diff) => write!(f, "changed {}: {}", self.id, diff),
        }
    }
}

/// Every target that was added, removed or changed between two graphs,
/// in build target id order.
pub fn changes_between(old: &TargetGraph, new: &TargetGraph) -> Vec<TargetChange> {
    let ids: BTreeSet<BuildTargetId> = old
        .iter()
        .chain(new.iter())
        .map(SourceSet::target_id)
        .collect();

    ids.into_iter()
        .filter_map(|id| {
            let delta = diff(old.get_target(&id), new.get_target(&id));
            (!delta.is_unchanged()).then_some(TargetChange { id, delta })
        })
        .collect()
}
