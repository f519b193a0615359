//! Technology and project nodes stored in the tech tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which template collection a node was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Technology,
    Project,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::Project => "project",
        }
    }
}

/// A resource granted when a node is researched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGrant {
    pub resource: String,
    #[serde(default)]
    pub value: f64,
}

/// One technology or project in the prerequisite graph.
///
/// Only `known` changes after load. The graph engine reads `prereqs`,
/// `research_cost` and `known`; everything else is descriptive data carried
/// along for display and grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechNode {
    /// Unique identifier (the template's `dataName`).
    pub id: String,
    pub kind: NodeKind,
    /// Direct prerequisites, in template order.
    pub prereqs: Vec<String>,
    /// Science needed to research this node alone.
    pub research_cost: f64,
    pub known: bool,
    /// AI role tag used to group nodes for display.
    pub role: Option<String>,
    /// Category bucket for cost subtotals.
    pub tech_category: Option<String>,
    /// Fallback name from the template when no localization is loaded.
    pub friendly_name: Option<String>,
    pub effects: Vec<String>,
    pub resources_granted: Vec<ResourceGrant>,
    /// Localization strings keyed by type (`displayName`, `description`, ...).
    pub text: BTreeMap<String, String>,
}

impl TechNode {
    /// Create a bare node with no descriptive data.
    pub fn new(id: impl Into<String>, kind: NodeKind, research_cost: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            prereqs: Vec::new(),
            research_cost,
            known: false,
            role: None,
            tech_category: None,
            friendly_name: None,
            effects: Vec::new(),
            resources_granted: Vec::new(),
            text: BTreeMap::new(),
        }
    }

    /// Builder-style helper to set direct prerequisites.
    pub fn with_prereqs<I, S>(mut self, prereqs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prereqs = prereqs.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style helper to set the category bucket.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.tech_category = Some(category.into());
        self
    }

    /// Builder-style helper to set the role tag.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Localized display name, if one was merged in.
    pub fn display_name(&self) -> Option<&str> {
        self.text.get("displayName").map(String::as_str)
    }

    /// Best name to show: display name, then friendly name, then the id.
    pub fn name(&self) -> &str {
        self.display_name()
            .or(self.friendly_name.as_deref())
            .unwrap_or(&self.id)
    }

    /// Category bucket used by cost subtotals.
    pub fn category(&self) -> &str {
        match self.tech_category.as_deref() {
            Some(category) if !category.is_empty() => category,
            _ => "Other",
        }
    }

    pub fn is_root(&self) -> bool {
        self.prereqs.is_empty()
    }
}
