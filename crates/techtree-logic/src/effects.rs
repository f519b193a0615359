//! Effect descriptions and control point efficiency.
//!
//! Effects have no template data worth keeping, only localized text from
//! `TIEffectTemplate.en`. Nodes list the effect ids they apply; this table
//! turns those ids into readable descriptions.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::node::TechNode;
use crate::tree::{Tree, TreeError};

/// Localization file holding effect texts.
pub const EFFECT_TEMPLATE: &str = "TIEffectTemplate";

static CP_GAIN: OnceLock<Regex> = OnceLock::new();

fn cp_gain_pattern() -> &'static Regex {
    CP_GAIN.get_or_init(|| {
        Regex::new(r"(?i)control point management capacity by ([0-9.]+)")
            .expect("control point regex must compile")
    })
}

/// Control point capacity gained by a node, set against what it costs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CpStats {
    /// Capacity gained.
    pub cp: f64,
    /// Science of the node and every requirement, known or not.
    pub total_cost: f64,
    /// Research cost of the node alone.
    pub standalone_cost: f64,
}

impl CpStats {
    /// Total science per control point, `None` for a zero gain.
    pub fn total_cost_per_cp(&self) -> Option<f64> {
        (self.cp > 0.0).then(|| self.total_cost / self.cp)
    }

    pub fn standalone_cost_per_cp(&self) -> Option<f64> {
        (self.cp > 0.0).then(|| self.standalone_cost / self.cp)
    }
}

/// Control point gain stated in an effect description.
pub fn parse_cp_gain(description: &str) -> Option<f64> {
    let captures = cp_gain_pattern().captures(description)?;
    captures[1].trim_end_matches('.').parse().ok()
}

/// Effect descriptions keyed by effect id.
#[derive(Debug, Default)]
pub struct Effects {
    descriptions: HashMap<String, String>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one localization string. Only descriptions are kept.
    pub fn add_translation(&mut self, key: &str, kind: &str, value: &str) {
        if kind == "description" {
            self.descriptions.insert(key.to_string(), value.to_string());
        }
    }

    pub fn description(&self, effect: &str) -> Option<&str> {
        self.descriptions.get(effect).map(String::as_str)
    }

    /// Control point stats of `node`, from the first of its effects whose
    /// description states a capacity gain.
    pub fn cp_stats(&self, tree: &Tree, node: &TechNode) -> Result<Option<CpStats>, TreeError> {
        let cp = node
            .effects
            .iter()
            .filter_map(|effect| self.description(effect))
            .find_map(parse_cp_gain);
        let Some(cp) = cp else {
            return Ok(None);
        };
        Ok(Some(CpStats {
            cp,
            total_cost: tree.total_science(&node.id)?,
            standalone_cost: node.research_cost,
        }))
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}
