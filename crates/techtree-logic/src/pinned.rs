//! Pinned research goals.
//!
//! The pinned list is UI state, independent of the tree: an ordered list of
//! ids the player is working towards. It persists as a plain JSON array.

use serde::{Deserialize, Serialize};

use crate::tree::{Tree, TreeError};

/// Ordered list of pinned node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinnedList {
    ids: Vec<String>,
}

impl PinnedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Pin `id` at the end of the list. Returns false if it was already
    /// pinned.
    pub fn pin(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Remove `id`. Returns false if it was not pinned.
    pub fn unpin(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|x| x != id);
        self.ids.len() != before
    }

    /// Move `id` to the drop slot `slot`.
    ///
    /// Slots sit between entries: slot 0 is before the first entry, slot
    /// `len` after the last. Dropping after the current position shifts the
    /// target left by one, since the entry is removed first. Returns false
    /// when `id` is not pinned.
    pub fn move_to(&mut self, id: &str, slot: usize) -> bool {
        let Some(from) = self.ids.iter().position(|x| x == id) else {
            return false;
        };
        let to = if slot > from { slot - 1 } else { slot };
        let entry = self.ids.remove(from);
        let to = to.min(self.ids.len());
        self.ids.insert(to, entry);
        true
    }

    /// Unpin everything. Returns how many goals were removed.
    pub fn clear(&mut self) -> usize {
        std::mem::take(&mut self.ids).len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|x| x == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Pinned ids ordered by ascending missing science; ties keep pin order.
    pub fn by_missing_science(&self, tree: &Tree) -> Result<Vec<String>, TreeError> {
        let mut ranked = Vec::with_capacity(self.ids.len());
        for id in &self.ids {
            ranked.push((tree.missing_science(id)?, id.clone()));
        }
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(ranked.into_iter().map(|(_, id)| id).collect())
    }

    /// Science needed to research every pinned goal, shared requirements
    /// counted once.
    pub fn total_missing_science(&self, tree: &Tree) -> Result<f64, TreeError> {
        tree.total_missing_science(&self.ids)
    }
}
