//! Transitive prerequisite queries.

use std::collections::HashSet;

use crate::status::Status;
use crate::tree::{Tree, TreeError};

impl Tree {
    /// Every node that must be researched before `id`, shallowest first.
    ///
    /// The result never contains `id` itself and holds each requirement
    /// once. Nodes of equal level keep their depth-first discovery order.
    pub fn all_requirements(&self, id: &str) -> Result<Vec<String>, TreeError> {
        if let Some(cached) = self.cache.borrow().requirements.get(id) {
            return Ok(cached.clone());
        }

        let root = self.get(id)?;
        let mut seen: HashSet<&str> = HashSet::new();
        let mut found: Vec<&str> = Vec::new();
        let mut stack: Vec<&str> = root.prereqs.iter().rev().map(String::as_str).collect();

        while let Some(current) = stack.pop() {
            if current == root.id || !seen.insert(current) {
                continue;
            }
            let node = self.get(current)?;
            found.push(current);
            stack.extend(node.prereqs.iter().rev().map(String::as_str));
        }

        let mut ranked = Vec::with_capacity(found.len());
        for req in found {
            ranked.push((self.level(req)?, req));
        }
        // Stable, so equal levels keep discovery order.
        ranked.sort_by_key(|&(level, _)| level);
        let requirements: Vec<String> = ranked.into_iter().map(|(_, r)| r.to_string()).collect();

        self.cache
            .borrow_mut()
            .requirements
            .insert(id.to_string(), requirements.clone());
        Ok(requirements)
    }

    /// Requirements of `id` that are already known.
    pub fn known_requirements(&self, id: &str) -> Result<Vec<String>, TreeError> {
        self.filter_requirements(id, |status| status == Status::Known)
    }

    /// Requirements of `id` that still have to be researched.
    pub fn unknown_requirements(&self, id: &str) -> Result<Vec<String>, TreeError> {
        self.filter_requirements(id, |status| status != Status::Known)
    }

    /// Whether any transitive requirement of `id` is known.
    pub fn has_known_requirements(&self, id: &str) -> Result<bool, TreeError> {
        self.any_requirement(id, |status| status == Status::Known)
    }

    /// Whether any transitive requirement of `id` is not yet known.
    pub fn has_unknown_requirements(&self, id: &str) -> Result<bool, TreeError> {
        self.any_requirement(id, |status| status != Status::Known)
    }

    fn filter_requirements<F>(&self, id: &str, keep: F) -> Result<Vec<String>, TreeError>
    where
        F: Fn(Status) -> bool,
    {
        let mut kept = Vec::new();
        for req in self.all_requirements(id)? {
            if keep(self.status(&req)?) {
                kept.push(req);
            }
        }
        Ok(kept)
    }

    /// Depth-first search that stops at the first requirement matching
    /// `hit`. Each node's immediate prerequisites are checked before
    /// descending into any of them.
    fn any_requirement<F>(&self, id: &str, hit: F) -> Result<bool, TreeError>
    where
        F: Fn(Status) -> bool,
    {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![self.get(id)?.id.as_str()];

        while let Some(current) = stack.pop() {
            let node = self.get(current)?;
            for prereq in &node.prereqs {
                if hit(self.status(prereq)?) {
                    return Ok(true);
                }
            }
            for prereq in node.prereqs.iter().rev() {
                if visited.insert(prereq.as_str()) {
                    stack.push(prereq.as_str());
                }
            }
        }

        Ok(false)
    }
}
