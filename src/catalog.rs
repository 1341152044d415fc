// Catalog data and the selection helpers the main screen cycles through.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::config::{Models, Slot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(rename = "owned_by")]
    pub owner: String,
}

impl CatalogEntry {
    pub fn new(owner: &str, id: &str) -> Self {
        Self {
            id: id.to_string(),
            owner: owner.to_string(),
        }
    }
}

/// Owner name to its sorted, distinct model ids.
pub type OwnerIndex = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Back,
}

pub fn group_by_owner(entries: &[CatalogEntry]) -> OwnerIndex {
    let mut index = OwnerIndex::new();
    for entry in entries {
        index
            .entry(entry.owner.clone())
            .or_default()
            .push(entry.id.clone());
    }
    for ids in index.values_mut() {
        ids.sort();
        ids.dedup();
    }
    index
}

pub fn owners(index: &OwnerIndex) -> Vec<String> {
    index.keys().cloned().collect()
}

pub fn ids_for<'a>(index: &'a OwnerIndex, owner: &str) -> &'a [String] {
    index.get(owner).map(Vec::as_slice).unwrap_or(&[])
}

/// Cycles to the neighbour of `current` in `list`, wrapping at both ends.
///
/// A value that is not in the list enters at the boundary in the direction
/// of travel: forward lands on the first entry, back on the last. An empty
/// list leaves `current` as it was.
pub fn advance(list: &[String], current: Option<&str>, step: Step) -> Option<String> {
    if list.is_empty() {
        return current.map(str::to_string);
    }
    let len = list.len();
    let start = match current.and_then(|c| list.iter().position(|v| v == c)) {
        Some(idx) => idx,
        None => match step {
            Step::Forward => len - 1,
            Step::Back => 0,
        },
    };
    let next = match step {
        Step::Forward => (start + 1) % len,
        Step::Back => (start + len - 1) % len,
    };
    Some(list[next].clone())
}

/// Clears every binding whose (owner, id) pair is not offered by `entries`.
/// Bindings that are already empty are left alone. Returns whether
/// anything was cleared.
pub fn reconcile(models: &mut Models, entries: &[CatalogEntry]) -> bool {
    let valid: HashSet<(&str, &str)> = entries
        .iter()
        .map(|e| (e.owner.as_str(), e.id.as_str()))
        .collect();

    let mut changed = false;
    for slot in Slot::ALL {
        let binding = models.get_mut(slot);
        let offered = match (binding.owner.as_deref(), binding.id.as_deref()) {
            (Some(owner), Some(id)) if !owner.is_empty() && !id.is_empty() => {
                valid.contains(&(owner, id))
            }
            _ => false,
        };
        if !offered && !binding.is_unset() {
            binding.owner = None;
            binding.id = None;
            changed = true;
        }
    }
    changed
}
