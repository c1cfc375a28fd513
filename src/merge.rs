use crate::config::EntryMap;
use serde_json::Value;
use std::collections::BTreeSet;

/// Entries enabled and disabled by a selection, sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDiff {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl EntryDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Result of folding target-only entries back into the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct FoldBack {
    pub catalog: EntryMap,
    /// Names inserted into the catalog, in target order
    pub added: Vec<String>,
}

/// One row of the selection prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub name: String,
    pub label: String,
    pub checked: bool,
}

/// Set difference in both directions; used for reporting only
pub fn compute_diff(old_enabled: &EntryMap, new_enabled: &EntryMap) -> EntryDiff {
    EntryDiff {
        added: new_enabled.keys().filter(|k| !old_enabled.contains_key(*k)).cloned().collect(),
        removed: old_enabled.keys().filter(|k| !new_enabled.contains_key(*k)).cloned().collect(),
    }
}

/// Copy the selected entries out of the catalog
///
/// Names the catalog does not know are dropped, which covers selections made
/// before the catalog was edited.
pub fn materialize<S: AsRef<str>>(catalog: &EntryMap, selection: &[S]) -> EntryMap {
    selection
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            catalog.get(name).map(|entry| (name.to_string(), entry.clone()))
        })
        .collect()
}

/// Left-biased union of the catalog and the target's enabled entries
///
/// Catalog entries are never removed or overwritten, even when the target
/// holds a different value under the same name.
pub fn fold_back(catalog: &EntryMap, target_enabled: &EntryMap) -> FoldBack {
    let mut merged = catalog.clone();
    let mut added = Vec::new();

    for (name, entry) in target_enabled {
        if !merged.contains_key(name) {
            merged.insert(name.clone(), entry.clone());
            added.push(name.clone());
        }
    }

    FoldBack { catalog: merged, added }
}

/// Prompt rows for the catalog, checked when currently enabled, sorted by label
pub fn build_choices(catalog: &EntryMap, enabled: &EntryMap) -> Vec<Choice> {
    let mut choices: Vec<Choice> = catalog
        .iter()
        .map(|(name, entry)| Choice {
            name: name.clone(),
            label: entry_label(name, entry),
            checked: enabled.contains_key(name),
        })
        .collect();

    choices.sort_by(|a, b| a.label.cmp(&b.label));
    choices
}

/// Human readable label; `type`, `url` and `command` are only read for display
pub fn entry_label(name: &str, entry: &Value) -> String {
    let field = |key: &str| entry.get(key).and_then(Value::as_str);

    if field("type") == Some("sse") {
        format!("{name} (SSE: {})", field("url").unwrap_or("N/A"))
    } else if entry.get("command").is_some() {
        format!("{name} (Command: {})", field("command").unwrap_or("N/A"))
    } else {
        name.to_string()
    }
}
