//! Research cost ("science") aggregation.
//!
//! Two policies coexist:
//!
//! - Per-target sums (`missing_science`, `total_science`) add each
//!   prerequisite's own sum, so a prerequisite shared by two branches of the
//!   same target is counted once per branch. These back per-card figures.
//! - Batch sums (`total_missing_science`, `missing_science_by_category`)
//!   collect the union of everything still unknown across all targets and
//!   count each node once. These back goal-list totals.

use std::collections::{BTreeMap, HashSet};

use crate::tree::{Tree, TreeError};

impl Tree {
    /// Science still needed to research `id` from the current known set.
    ///
    /// Zero when `id` is known; otherwise its own cost plus the missing
    /// science of every direct prerequisite (shared ancestors counted once
    /// per path).
    pub fn missing_science(&self, id: &str) -> Result<f64, TreeError> {
        let mut cache = self.cache.borrow_mut();
        self.evaluate(
            id,
            &mut cache.missing_science,
            |node| node.known.then_some(0.0),
            |node, prereq_costs| node.research_cost + prereq_costs.iter().sum::<f64>(),
        )
    }

    /// Science needed to research `id` from nothing, ignoring known state.
    pub fn total_science(&self, id: &str) -> Result<f64, TreeError> {
        let mut cache = self.cache.borrow_mut();
        self.evaluate(
            id,
            &mut cache.total_science,
            |_| None,
            |node, prereq_costs| node.research_cost + prereq_costs.iter().sum::<f64>(),
        )
    }

    /// Science needed to research every id in `ids`, counting each unknown
    /// node once no matter how many targets share it.
    pub fn total_missing_science<S: AsRef<str>>(&self, ids: &[S]) -> Result<f64, TreeError> {
        let mut total = 0.0;
        for id in self.unknown_closure(ids)? {
            total += self.get(&id)?.research_cost;
        }
        Ok(total)
    }

    /// Deduplicated missing science of `ids`, split by tech category
    /// (`"Other"` when a node has none).
    pub fn missing_science_by_category<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<BTreeMap<String, f64>, TreeError> {
        let mut totals = BTreeMap::new();
        for id in self.unknown_closure(ids)? {
            let node = self.get(&id)?;
            *totals.entry(node.category().to_string()).or_insert(0.0) += node.research_cost;
        }
        Ok(totals)
    }

    /// Every unknown target plus every unknown requirement of any target,
    /// each listed once in first-seen order.
    pub fn unknown_closure<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<String>, TreeError> {
        let mut seen = HashSet::new();
        let mut members = Vec::new();
        for id in ids {
            let id = id.as_ref();
            if !self.get(id)?.known && seen.insert(id.to_string()) {
                members.push(id.to_string());
            }
            for req in self.unknown_requirements(id)? {
                if seen.insert(req.clone()) {
                    members.push(req);
                }
            }
        }
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{NodeKind, TechNode};
    use crate::tree::Tree;

    fn abc() -> Tree {
        let mut tree = Tree::new();
        tree.insert(TechNode::new("A", NodeKind::Technology, 10.0).with_category("Energy"));
        tree.insert(
            TechNode::new("B", NodeKind::Technology, 20.0)
                .with_prereqs(["A"])
                .with_category("Materials"),
        );
        tree.insert(TechNode::new("C", NodeKind::Technology, 30.0).with_prereqs(["A"]));
        tree
    }

    #[test]
    fn test_missing_science_single_target() {
        let tree = abc();
        assert_eq!(tree.missing_science("B").unwrap(), 30.0);
        assert_eq!(tree.missing_science("C").unwrap(), 40.0);
    }

    #[test]
    fn test_batch_counts_shared_prereq_once() {
        let tree = abc();
        assert_eq!(tree.total_missing_science(&["B", "C"]).unwrap(), 60.0);
        let separate = tree.missing_science("B").unwrap() + tree.missing_science("C").unwrap();
        assert!(tree.total_missing_science(&["B", "C"]).unwrap() < separate);
    }

    #[test]
    fn test_diamond_double_counts_per_target() {
        let mut tree = abc();
        tree.insert(TechNode::new("D", NodeKind::Technology, 5.0).with_prereqs(["B", "C"]));
        // A is reached through both B and C.
        assert_eq!(tree.missing_science("D").unwrap(), 5.0 + 30.0 + 40.0);
        assert_eq!(tree.total_missing_science(&["D"]).unwrap(), 65.0);
    }

    #[test]
    fn test_known_nodes_cost_nothing() {
        let mut tree = abc();
        tree.toggle_known("A").unwrap();
        assert_eq!(tree.missing_science("A").unwrap(), 0.0);
        assert_eq!(tree.missing_science("B").unwrap(), 20.0);
        assert_eq!(tree.total_missing_science(&["B", "C"]).unwrap(), 50.0);
    }

    #[test]
    fn test_total_science_ignores_known() {
        let mut tree = abc();
        tree.toggle_known("B").unwrap();
        assert_eq!(tree.missing_science("B").unwrap(), 0.0);
        assert_eq!(tree.total_science("B").unwrap(), 30.0);
    }

    #[test]
    fn test_missing_science_follows_toggles() {
        let mut tree = abc();
        assert_eq!(tree.missing_science("C").unwrap(), 40.0);
        tree.toggle_known("A").unwrap();
        assert_eq!(tree.missing_science("C").unwrap(), 30.0);
        tree.toggle_known("A").unwrap();
        assert_eq!(tree.missing_science("C").unwrap(), 40.0);
    }

    #[test]
    fn test_by_category_deduplicates() {
        let tree = abc();
        let totals = tree.missing_science_by_category(&["B", "C"]).unwrap();
        assert_eq!(totals["Energy"], 10.0);
        assert_eq!(totals["Materials"], 20.0);
        assert_eq!(totals["Other"], 30.0);
        assert_eq!(totals.values().sum::<f64>(), 60.0);
    }

    #[test]
    fn test_batch_of_unknown_id_fails() {
        let tree = abc();
        assert!(tree.total_missing_science(&["B", "Nope"]).is_err());
    }

    #[test]
    fn test_empty_batch_is_zero() {
        let tree = abc();
        let none: [&str; 0] = [];
        assert_eq!(tree.total_missing_science(&none).unwrap(), 0.0);
    }
}
