//! Known-state mutations.
//!
//! Marking a node known also marks every transitive requirement known, so
//! that once a node is known its whole prerequisite closure is. Unmarking
//! only touches the node itself: dependents that were known stay known.

use std::collections::HashSet;

use crate::save::FinishedResearch;
use crate::tree::{Tree, TreeError};

impl Tree {
    /// Flip the known flag of `id` and return the new value.
    ///
    /// When the node becomes known, all of its requirements become known
    /// as well. Requirements are resolved before anything changes, so an
    /// error leaves the tree untouched.
    pub fn toggle_known(&mut self, id: &str) -> Result<bool, TreeError> {
        let requirements = self.all_requirements(id)?;
        let node = self.get_mut(id)?;
        node.known = !node.known;
        let known = node.known;

        if known {
            self.mark_known(&requirements)?;
        }
        self.known_changed();
        log::debug!("toggled '{}' to known={}", id, known);
        Ok(known)
    }

    /// Mark `id` and all of its requirements known.
    pub fn set_known(&mut self, id: &str) -> Result<(), TreeError> {
        let requirements = self.all_requirements(id)?;
        self.get_mut(id)?.known = true;
        self.mark_known(&requirements)?;
        self.known_changed();
        Ok(())
    }

    /// Make exactly the listed ids known and everything else unknown.
    ///
    /// No requirements are pulled in, so a set saved from [`Tree::known_ids`]
    /// comes back unchanged, including nodes that were toggled off under a
    /// known dependent. Every id is checked first: an unknown id leaves the
    /// tree untouched.
    pub fn restore_known<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<(), TreeError> {
        let mut listed = HashSet::with_capacity(ids.len());
        for id in ids {
            listed.insert(self.get(id.as_ref())?.id.clone());
        }
        self.set_flags(&listed);
        log::debug!("restored {} known flag(s)", listed.len());
        Ok(())
    }

    /// Forget every known flag.
    pub fn clear_known(&mut self) {
        for node in self.all_mut() {
            node.known = false;
        }
        self.known_changed();
    }

    /// Mark every finished technology and project from a save as known.
    ///
    /// All ids are checked before anything changes: a single unknown id
    /// aborts the import with `NotFound`. Nodes that were already known
    /// stay known. Returns how many nodes became known, including
    /// requirements pulled in to keep the prerequisite closure known.
    pub fn import_known(&mut self, finished: &FinishedResearch) -> Result<usize, TreeError> {
        let mut closure: Vec<String> = Vec::new();
        let mut listed = HashSet::new();
        for id in finished.all() {
            self.get(id)?;
            listed.insert(id);
            closure.push(id.to_string());
            closure.extend(self.all_requirements(id)?);
        }

        let mut newly_known = 0;
        let mut pulled_in = 0;
        for id in &closure {
            let node = self.get_mut(id)?;
            if !node.known {
                node.known = true;
                newly_known += 1;
                if !listed.contains(id.as_str()) {
                    pulled_in += 1;
                }
            }
        }
        if pulled_in > 0 {
            log::debug!(
                "save import marked {} unlisted requirement(s) known",
                pulled_in
            );
        }
        self.known_changed();
        Ok(newly_known)
    }

    /// Ids of every known node, in store order.
    pub fn known_ids(&self) -> Vec<String> {
        self.all()
            .filter(|node| node.known)
            .map(|node| node.id.clone())
            .collect()
    }

    pub(crate) fn set_flags(&mut self, known: &HashSet<String>) {
        for node in self.all_mut() {
            node.known = known.contains(&node.id);
        }
        self.known_changed();
    }

    fn mark_known(&mut self, ids: &[String]) -> Result<(), TreeError> {
        for id in ids {
            self.get_mut(id)?.known = true;
        }
        Ok(())
    }
}
