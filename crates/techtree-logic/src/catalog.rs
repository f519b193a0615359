//! Browsing views over the tree: role groups, search, known list.

use std::collections::BTreeSet;

use crate::node::TechNode;
use crate::tree::{Tree, TreeError};

/// Minimum query length before search starts filtering.
pub const MIN_SEARCH_LEN: usize = 3;

/// Distinct roles present in `nodes`, sorted.
pub fn roles<'a>(nodes: impl IntoIterator<Item = &'a TechNode>) -> Vec<String> {
    nodes
        .into_iter()
        .filter_map(|node| node.role.as_deref())
        .filter(|role| !role.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Nodes matching `query` by display name, case-insensitively.
///
/// Queries shorter than [`MIN_SEARCH_LEN`] characters match everything.
/// Nodes without a localized display name never match a real query.
pub fn search<'a>(tree: &'a Tree, query: &str) -> Vec<&'a TechNode> {
    if query.chars().count() < MIN_SEARCH_LEN {
        return tree.all().collect();
    }
    let needle = query.to_lowercase();
    tree.all()
        .filter(|node| {
            node.display_name()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Nodes of `role` among `nodes`, cheapest to finish first.
pub fn by_role<'a>(
    tree: &Tree,
    nodes: &[&'a TechNode],
    role: &str,
) -> Result<Vec<&'a TechNode>, TreeError> {
    let mut ranked = Vec::new();
    for &node in nodes {
        if node.role.as_deref() == Some(role) {
            ranked.push((tree.missing_science(&node.id)?, node));
        }
    }
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(ranked.into_iter().map(|(_, node)| node).collect())
}

/// Known nodes sorted by name.
pub fn known_nodes(tree: &Tree) -> Vec<&TechNode> {
    let mut known: Vec<&TechNode> = tree.all().filter(|node| node.known).collect();
    known.sort_by(|a, b| a.name().cmp(b.name()));
    known
}
