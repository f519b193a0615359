//! Cost summaries for a set of techs (the pinned list, a role group, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tree::{Tree, TreeError};

/// How a summary accounts for costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    /// Only the listed nodes' own research costs.
    #[default]
    Direct,
    /// Everything still unknown that the listed nodes need, each node once.
    Recursive,
}

/// Science total for one category bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Humanized category name.
    pub name: String,
    pub cost: f64,
}

/// Total science of `ids` under `mode`.
pub fn summary_cost<S: AsRef<str>>(
    tree: &Tree,
    ids: &[S],
    mode: SummaryMode,
) -> Result<f64, TreeError> {
    match mode {
        SummaryMode::Direct => {
            let mut total = 0.0;
            for id in ids {
                total += tree.get(id.as_ref())?.research_cost;
            }
            Ok(total)
        }
        SummaryMode::Recursive => tree.total_missing_science(ids),
    }
}

/// Science of `ids` split by category, most expensive first.
pub fn category_totals<S: AsRef<str>>(
    tree: &Tree,
    ids: &[S],
    mode: SummaryMode,
) -> Result<Vec<CategoryTotal>, TreeError> {
    let buckets = match mode {
        SummaryMode::Direct => {
            let mut buckets = BTreeMap::new();
            for id in ids {
                let node = tree.get(id.as_ref())?;
                *buckets.entry(node.category().to_string()).or_insert(0.0) += node.research_cost;
            }
            buckets
        }
        SummaryMode::Recursive => tree.missing_science_by_category(ids)?,
    };

    let mut totals: Vec<CategoryTotal> = buckets
        .into_iter()
        .map(|(name, cost)| CategoryTotal {
            name: humanize_category(&name),
            cost,
        })
        .collect();
    totals.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    Ok(totals)
}

/// Split a camel-case category id into words: `"SpaceScience"` becomes
/// `"Space Science"`.
pub fn humanize_category(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        if i == 0 {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeKind, TechNode};

    fn sample() -> Tree {
        let mut tree = Tree::new();
        tree.insert(TechNode::new("A", NodeKind::Technology, 10.0).with_category("Energy"));
        tree.insert(
            TechNode::new("B", NodeKind::Technology, 20.0)
                .with_prereqs(["A"])
                .with_category("SpaceScience"),
        );
        tree.insert(
            TechNode::new("C", NodeKind::Technology, 30.0)
                .with_prereqs(["A"])
                .with_category("SpaceScience"),
        );
        tree
    }

    #[test]
    fn test_direct_cost_ignores_prereqs() {
        let tree = sample();
        assert_eq!(summary_cost(&tree, &["B", "C"], SummaryMode::Direct).unwrap(), 50.0);
    }

    #[test]
    fn test_recursive_cost_dedups() {
        let tree = sample();
        assert_eq!(summary_cost(&tree, &["B", "C"], SummaryMode::Recursive).unwrap(), 60.0);
    }

    #[test]
    fn test_category_totals_sorted_desc() {
        let tree = sample();
        let totals = category_totals(&tree, &["B", "C"], SummaryMode::Recursive).unwrap();
        assert_eq!(
            totals,
            vec![
                CategoryTotal { name: "Space Science".into(), cost: 50.0 },
                CategoryTotal { name: "Energy".into(), cost: 10.0 },
            ]
        );
    }

    #[test]
    fn test_direct_category_totals() {
        let tree = sample();
        let totals = category_totals(&tree, &["A", "B"], SummaryMode::Direct).unwrap();
        assert_eq!(totals[0].name, "Space Science");
        assert_eq!(totals[0].cost, 20.0);
        assert_eq!(totals[1].cost, 10.0);
    }

    #[test]
    fn test_humanize_category() {
        assert_eq!(humanize_category("SpaceScience"), "Space Science");
        assert_eq!(humanize_category("energy"), "Energy");
        assert_eq!(humanize_category("Other"), "Other");
        assert_eq!(humanize_category("MilitaryScience"), "Military Science");
    }
}
