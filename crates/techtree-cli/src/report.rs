//! Printable views of query results.
//!
//! Every view serializes to JSON for `--json` and implements `Display` for
//! the text output.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use techtree_logic::effects::CpStats;
use techtree_logic::modules::{ModuleStat, Modules};
use techtree_logic::orgs::OrgYield;
use techtree_logic::summary::{self, CategoryTotal};
use techtree_logic::{
    NodeKind, PinnedList, ResourceGrant, Status, SummaryMode, TechNode, Tree, TreeError,
};

use crate::loader::GameData;

/// One node in a listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRow {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub status: Status,
    pub level: u32,
    pub missing_science: f64,
}

impl NodeRow {
    pub fn new(tree: &Tree, node: &TechNode) -> Result<Self, TreeError> {
        Ok(Self {
            id: node.id.clone(),
            name: node.name().to_string(),
            kind: node.kind,
            status: tree.status(&node.id)?,
            level: tree.level(&node.id)?,
            missing_science: tree.missing_science(&node.id)?,
        })
    }
}

impl fmt::Display for NodeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<9} L{:<3} {:>10}  {}",
            self.status.as_str(),
            self.level,
            self.missing_science,
            self.name
        )?;
        if self.name != self.id {
            write!(f, " ({})", self.id)?;
        }
        Ok(())
    }
}

/// A list of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NodeList(pub Vec<NodeRow>);

impl NodeList {
    pub fn new<'a>(
        tree: &Tree,
        nodes: impl IntoIterator<Item = &'a TechNode>,
    ) -> Result<Self, TreeError> {
        nodes
            .into_iter()
            .map(|node| NodeRow::new(tree, node))
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

impl fmt::Display for NodeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Plain list of names (roles, pinned ids).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameList(pub Vec<String>);

impl fmt::Display for NameList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.0 {
            writeln!(f, "{name}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleView {
    pub id: String,
    pub name: Option<String>,
    pub wiki: String,
    pub stats: Vec<ModuleStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgView {
    pub id: String,
    pub name: Option<String>,
    pub yields: Vec<OrgYield>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectView {
    pub id: String,
    pub description: Option<String>,
}

/// Everything known about one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDetail {
    #[serde(flatten)]
    pub row: NodeRow,
    pub role: Option<String>,
    pub category: String,
    pub research_cost: f64,
    pub total_science: f64,
    pub description: Option<String>,
    pub prereqs: Vec<String>,
    pub unknown_requirements: Vec<String>,
    pub effects: Vec<EffectView>,
    pub resources_granted: Vec<ResourceGrant>,
    pub cp_stats: Option<CpStats>,
    pub modules: Vec<ModuleView>,
    pub orgs: Vec<OrgView>,
    pub benefits: Option<Value>,
}

impl NodeDetail {
    pub fn new(data: &GameData, id: &str) -> Result<Self, TreeError> {
        let tree = &data.tree;
        let node = tree.get(id)?;

        let modules = match node.kind {
            NodeKind::Project => data
                .modules
                .project_modules(id)
                .into_iter()
                .map(|module| ModuleView {
                    name: module.name().map(str::to_string),
                    stats: Modules::stats(&module),
                    id: module.data_name,
                    wiki: module.wiki,
                })
                .collect(),
            NodeKind::Technology => Vec::new(),
        };
        let orgs = data
            .orgs
            .tech_orgs(id)
            .into_iter()
            .map(|org| OrgView {
                id: org.data_name.clone(),
                name: org.name().map(str::to_string),
                yields: org.yields(),
            })
            .collect();
        let effects = node
            .effects
            .iter()
            .map(|effect| EffectView {
                id: effect.clone(),
                description: data.effects.description(effect).map(str::to_string),
            })
            .collect();

        Ok(Self {
            row: NodeRow::new(tree, node)?,
            role: node.role.clone(),
            category: summary::humanize_category(node.category()),
            research_cost: node.research_cost,
            total_science: tree.total_science(id)?,
            description: node.text.get("description").cloned(),
            prereqs: node.prereqs.clone(),
            unknown_requirements: tree.unknown_requirements(id)?,
            effects,
            resources_granted: node.resources_granted.clone(),
            cp_stats: data.effects.cp_stats(tree, node)?,
            modules,
            orgs,
            benefits: data.benefits.get(id).cloned(),
        })
    }
}

impl fmt::Display for NodeDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = &self.row;
        writeln!(f, "{} ({}, {})", row.name, row.id, row.kind.as_str())?;
        writeln!(f, "  status:          {}", row.status)?;
        writeln!(f, "  level:           {}", row.level)?;
        writeln!(f, "  category:        {}", self.category)?;
        if let Some(role) = &self.role {
            writeln!(f, "  role:            {role}")?;
        }
        writeln!(f, "  research cost:   {}", self.research_cost)?;
        writeln!(f, "  missing science: {}", row.missing_science)?;
        writeln!(f, "  total science:   {}", self.total_science)?;
        if let Some(description) = &self.description {
            writeln!(f, "  {description}")?;
        }
        if !self.prereqs.is_empty() {
            writeln!(f, "  prereqs: {}", self.prereqs.join(", "))?;
        }
        if !self.unknown_requirements.is_empty() {
            writeln!(f, "  still needed: {}", self.unknown_requirements.join(", "))?;
        }
        for effect in &self.effects {
            writeln!(
                f,
                "  effect: {}",
                effect.description.as_deref().unwrap_or(&effect.id)
            )?;
        }
        for grant in &self.resources_granted {
            writeln!(f, "  grants: {} {}", grant.value, grant.resource)?;
        }
        if let Some(cp) = &self.cp_stats {
            write!(f, "  control points: +{}", cp.cp)?;
            if let (Some(total), Some(own)) =
                (cp.total_cost_per_cp(), cp.standalone_cost_per_cp())
            {
                write!(f, " ({total:.0} science per CP in total, {own:.0} on its own)")?;
            }
            writeln!(f)?;
        }
        for module in &self.modules {
            writeln!(
                f,
                "  module: {} <{}>",
                module.name.as_deref().unwrap_or(&module.id),
                module.wiki
            )?;
            for stat in &module.stats {
                writeln!(f, "    {}: {}", stat.label, stat.value)?;
            }
        }
        for org in &self.orgs {
            let yields: Vec<String> = org
                .yields
                .iter()
                .map(|y| format!("{} {}", y.icon, y.value))
                .collect();
            writeln!(
                f,
                "  org: {} [{}]",
                org.name.as_deref().unwrap_or(&org.id),
                yields.join(", ")
            )?;
        }
        if let Some(benefits) = &self.benefits {
            match benefits {
                Value::String(text) => writeln!(f, "  benefits: {text}")?,
                other => writeln!(f, "  benefits: {other}")?,
            }
        }
        Ok(())
    }
}

/// Pinned goals with their cost summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinnedReport {
    pub mode: SummaryMode,
    pub goals: Vec<NodeRow>,
    /// Deduplicated science for every goal together.
    pub total_missing_science: f64,
    /// Summary cost under `mode`.
    pub summary_cost: f64,
    pub categories: Vec<CategoryTotal>,
}

impl PinnedReport {
    pub fn new(tree: &Tree, pinned: &PinnedList, mode: SummaryMode) -> Result<Self, TreeError> {
        let goals = pinned
            .by_missing_science(tree)?
            .iter()
            .map(|id| NodeRow::new(tree, tree.get(id)?))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            mode,
            goals,
            total_missing_science: pinned.total_missing_science(tree)?,
            summary_cost: summary::summary_cost(tree, pinned.ids(), mode)?,
            categories: summary::category_totals(tree, pinned.ids(), mode)?,
        })
    }
}

impl fmt::Display for PinnedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.goals.is_empty() {
            return writeln!(f, "nothing pinned");
        }
        for row in &self.goals {
            writeln!(f, "{row}")?;
        }
        writeln!(f)?;
        writeln!(f, "all goals together: {}", self.total_missing_science)?;
        let mode = match self.mode {
            SummaryMode::Direct => "direct",
            SummaryMode::Recursive => "recursive",
        };
        writeln!(f, "summary ({mode}): {}", self.summary_cost)?;
        for category in &self.categories {
            writeln!(f, "  {:<24} {}", category.name, category.cost)?;
        }
        Ok(())
    }
}

/// Outcome of a known-state mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnownChange {
    /// Ids whose flag was changed directly.
    pub changed: Vec<String>,
    /// Nodes that became known, including pulled-in requirements.
    pub newly_known: usize,
    /// Known nodes after the change.
    pub known: usize,
}

impl fmt::Display for KnownChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} newly known, {} known in total",
            self.newly_known, self.known
        )
    }
}

/// Counts reported by `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSummary {
    pub technologies: usize,
    pub projects: usize,
    pub modules: usize,
    pub orgs: usize,
    pub effects: usize,
    pub benefits: usize,
    pub max_level: u32,
}

impl DataSummary {
    pub fn new(data: &GameData) -> Result<Self, TreeError> {
        let tree = &data.tree;
        let projects = tree.all().filter(|n| n.kind == NodeKind::Project).count();
        let mut max_level = 0;
        for node in tree.all() {
            max_level = max_level.max(tree.level(&node.id)?);
        }
        Ok(Self {
            technologies: tree.len() - projects,
            projects,
            modules: data.modules.len(),
            orgs: data.orgs.len(),
            effects: data.effects.len(),
            benefits: data.benefits.len(),
            max_level,
        })
    }
}

impl fmt::Display for DataSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "technologies: {}", self.technologies)?;
        writeln!(f, "projects:     {}", self.projects)?;
        writeln!(f, "modules:      {}", self.modules)?;
        writeln!(f, "orgs:         {}", self.orgs)?;
        writeln!(f, "effects:      {}", self.effects)?;
        writeln!(f, "benefits:     {}", self.benefits)?;
        writeln!(f, "deepest tech: level {}", self.max_level)
    }
}
