//! The tech tree store and its memoized query cache.
//!
//! `Tree` owns every technology and project node keyed by id. Query
//! operations live in sibling modules (`requirements`, `status`, `level`,
//! `cost`, `known`) as further `impl Tree` blocks; this module holds the
//! storage, bulk loading, load-time validation and the shared traversal
//! helpers they build on.
//!
//! The prerequisite graph never changes after load, only the per-node
//! `known` flag does. Structural results (requirements, levels, total
//! science) are therefore cached until the node set changes, while
//! known-dependent results (missing science) are dropped on every known
//! mutation.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::node::{NodeKind, TechNode};
use crate::template::{self, TechTemplate};

/// Errors raised by tree loading and queries.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Lookup of an id that is not in the tree (dangling prerequisite,
    /// mistyped save entry, ...).
    #[error("unknown technology '{0}'")]
    NotFound(String),
    /// The prerequisite relation contains a cycle through these nodes.
    #[error("prerequisite cycle detected involving: {}", .0.join(", "))]
    Cycle(Vec<String>),
    /// A required template file is not valid JSON of the expected shape.
    #[error("failed to parse template file {name}.json")]
    MalformedTemplate {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Memoized query results, keyed by node id.
#[derive(Debug, Default)]
pub(crate) struct QueryCache {
    pub(crate) requirements: HashMap<String, Vec<String>>,
    pub(crate) levels: HashMap<String, u32>,
    pub(crate) total_science: HashMap<String, f64>,
    pub(crate) missing_science: HashMap<String, f64>,
}

impl QueryCache {
    /// Drop results that depend on `known` flags.
    fn invalidate_known(&mut self) {
        self.missing_science.clear();
    }

    /// Drop everything, after the node set itself changed.
    fn invalidate_all(&mut self) {
        self.requirements.clear();
        self.levels.clear();
        self.total_science.clear();
        self.missing_science.clear();
    }
}

/// Every technology and project, keyed by id.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: HashMap<String, TechNode>,
    /// Insertion order of ids, for stable iteration.
    order: Vec<String>,
    pub(crate) cache: RefCell<QueryCache>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a validated tree from parsed technology and project templates.
    pub fn from_templates(
        technologies: Vec<TechTemplate>,
        projects: Vec<TechTemplate>,
    ) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        for entry in projects {
            tree.add_technology(entry, NodeKind::Project);
        }
        for entry in technologies {
            tree.add_technology(entry, NodeKind::Technology);
        }
        tree.validate()?;
        log::debug!("tech tree loaded with {} nodes", tree.len());
        Ok(tree)
    }

    /// Build a validated tree from the raw contents of both template files.
    ///
    /// Malformed JSON in either file is fatal; no partial tree is returned.
    pub fn from_json(technologies: &str, projects: &str) -> Result<Self, TreeError> {
        let technologies =
            template::parse_templates(technologies).map_err(|source| {
                TreeError::MalformedTemplate {
                    name: template::TECH_TEMPLATE.to_string(),
                    source,
                }
            })?;
        let projects = template::parse_templates(projects).map_err(|source| {
            TreeError::MalformedTemplate {
                name: template::PROJECT_TEMPLATE.to_string(),
                source,
            }
        })?;
        Self::from_templates(technologies, projects)
    }

    /// Add (or replace) a node from a template entry.
    pub fn add_technology(&mut self, entry: TechTemplate, kind: NodeKind) {
        self.insert(entry.into_node(kind));
    }

    /// Add (or replace) an already-built node. A replaced node keeps its
    /// position in iteration order.
    pub fn insert(&mut self, node: TechNode) {
        let id = node.id.clone();
        if let Some(previous) = self.nodes.insert(id.clone(), node) {
            log::warn!(
                "{} '{}' replaced by a later entry with the same id",
                previous.kind.as_str(),
                id
            );
        } else {
            self.order.push(id);
        }
        self.cache.get_mut().invalidate_all();
    }

    /// Merge one localization string into the matching node(s).
    ///
    /// Project localization keys omit the `Project_` prefix of the project
    /// id, so both `key` and `Project_<key>` are updated. Unknown keys are
    /// ignored.
    pub fn add_translation(&mut self, kind: &str, key: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.text.insert(kind.to_string(), value.to_string());
        }
        if let Some(node) = self.nodes.get_mut(&format!("Project_{key}")) {
            node.text.insert(kind.to_string(), value.to_string());
        }
    }

    /// Look up a node by id.
    pub fn get(&self, id: &str) -> Result<&TechNode, TreeError> {
        self.nodes
            .get(id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Result<&mut TechNode, TreeError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))
    }

    /// Every node, in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &TechNode> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub(crate) fn all_mut(&mut self) -> impl Iterator<Item = &mut TechNode> + '_ {
        self.nodes.values_mut()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Called after any change to a `known` flag.
    pub(crate) fn known_changed(&mut self) {
        self.cache.get_mut().invalidate_known();
    }

    /// Order every node so that prerequisites come before dependents.
    ///
    /// Fails with `NotFound` on a dangling prerequisite and with `Cycle`
    /// (listing every node that could not be ordered) when the prerequisite
    /// relation is not acyclic.
    pub fn topological_order(&self) -> Result<Vec<&str>, TreeError> {
        let mut pending: HashMap<&str, usize> = HashMap::with_capacity(self.nodes.len());
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

        for node in self.all() {
            let mut unique = HashSet::new();
            for prereq in &node.prereqs {
                let prereq = self.get(prereq)?.id.as_str();
                if unique.insert(prereq) {
                    dependents.entry(prereq).or_default().push(node.id.as_str());
                }
            }
            pending.insert(node.id.as_str(), unique.len());
        }

        let mut ready: VecDeque<&str> = self
            .all()
            .filter(|node| pending[node.id.as_str()] == 0)
            .map(|node| node.id.as_str())
            .collect();
        let mut ordered = Vec::with_capacity(self.nodes.len());

        while let Some(id) = ready.pop_front() {
            ordered.push(id);
            for &dependent in dependents.get(id).map(Vec::as_slice).unwrap_or(&[]) {
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(dependent);
                    }
                }
            }
        }

        if ordered.len() < self.nodes.len() {
            let mut stuck: Vec<String> = pending
                .into_iter()
                .filter(|&(_, count)| count > 0)
                .map(|(id, _)| id.to_string())
                .collect();
            stuck.sort();
            return Err(TreeError::Cycle(stuck));
        }

        Ok(ordered)
    }

    /// Check that every prerequisite resolves and the graph is acyclic.
    pub fn validate(&self) -> Result<(), TreeError> {
        self.topological_order().map(|_| ())
    }

    /// Evaluate a per-node value bottom-up over the prerequisite graph.
    ///
    /// `shortcut` may answer a node without visiting its prerequisites;
    /// otherwise `combine` receives the node and its prerequisites' values.
    /// Results are stored in `memo` as they are computed. A prerequisite
    /// that leads back onto the current path yields `Cycle`.
    pub(crate) fn evaluate<T, S, C>(
        &self,
        id: &str,
        memo: &mut HashMap<String, T>,
        shortcut: S,
        combine: C,
    ) -> Result<T, TreeError>
    where
        T: Copy,
        S: Fn(&TechNode) -> Option<T>,
        C: Fn(&TechNode, &[T]) -> T,
    {
        if let Some(&value) = memo.get(id) {
            return Ok(value);
        }

        let root = self.get(id)?;
        let mut on_path: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&TechNode, bool)> = vec![(root, false)];

        while let Some((node, expanded)) = stack.pop() {
            if memo.contains_key(&node.id) {
                continue;
            }

            if expanded {
                let values: Vec<T> = node.prereqs.iter().map(|p| memo[p.as_str()]).collect();
                memo.insert(node.id.clone(), combine(node, &values));
                on_path.remove(node.id.as_str());
                continue;
            }

            if let Some(value) = shortcut(node) {
                memo.insert(node.id.clone(), value);
                continue;
            }

            on_path.insert(node.id.as_str());
            stack.push((node, true));
            for prereq in node.prereqs.iter().rev() {
                if memo.contains_key(prereq) {
                    continue;
                }
                if on_path.contains(prereq.as_str()) {
                    return Err(TreeError::Cycle(vec![node.id.clone(), prereq.clone()]));
                }
                stack.push((self.get(prereq)?, false));
            }
        }

        Ok(memo[id])
    }
}
