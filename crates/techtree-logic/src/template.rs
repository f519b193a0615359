//! Game template entries for technologies and projects.
//!
//! The game ships `TITechTemplate.json` and `TIProjectTemplate.json` as
//! arrays of loosely-typed objects. Array fields may hold empty strings or
//! non-string placeholders, so those are filtered during deserialization
//! rather than rejected.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::node::{NodeKind, ResourceGrant, TechNode};

/// Template file holding technologies.
pub const TECH_TEMPLATE: &str = "TITechTemplate";
/// Template file holding projects.
pub const PROJECT_TEMPLATE: &str = "TIProjectTemplate";

/// One entry of a technology or project template file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechTemplate {
    pub data_name: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default, deserialize_with = "non_empty_strings")]
    pub prereqs: Vec<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub research_cost: f64,
    #[serde(default, rename = "AI_techRole")]
    pub ai_tech_role: Option<String>,
    #[serde(default, rename = "AI_projectRole")]
    pub ai_project_role: Option<String>,
    #[serde(default)]
    pub tech_category: Option<String>,
    #[serde(default, deserialize_with = "non_empty_strings")]
    pub effects: Vec<String>,
    #[serde(default, deserialize_with = "resource_grants")]
    pub resources_granted: Vec<ResourceGrant>,
}

impl TechTemplate {
    /// Convert into a fresh, unknown node of the given kind.
    ///
    /// Projects take their role from `AI_projectRole`, technologies from
    /// `AI_techRole`. Negative costs are clamped to zero.
    pub fn into_node(self, kind: NodeKind) -> TechNode {
        let role = match kind {
            NodeKind::Project => self.ai_project_role,
            NodeKind::Technology => self.ai_tech_role,
        }
        .filter(|role| !role.is_empty());

        let research_cost = if self.research_cost < 0.0 {
            log::warn!(
                "{} '{}' has negative research cost {}, using 0",
                kind.as_str(),
                self.data_name,
                self.research_cost
            );
            0.0
        } else {
            self.research_cost
        };

        TechNode {
            id: self.data_name,
            kind,
            prereqs: self.prereqs,
            research_cost,
            known: false,
            role,
            tech_category: self.tech_category,
            friendly_name: self.friendly_name,
            effects: self.effects,
            resources_granted: self.resources_granted,
            text: Default::default(),
        }
    }
}

/// Parse a whole template file (a JSON array of entries).
pub fn parse_templates(json: &str) -> Result<Vec<TechTemplate>, serde_json::Error> {
    serde_json::from_str(json)
}

fn non_empty_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        })
        .collect())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or(0.0))
}

fn resource_grants<'de, D>(deserializer: D) -> Result<Vec<ResourceGrant>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| {
            let resource = value.get("resource")?.as_str()?;
            if resource.is_empty() {
                return None;
            }
            Some(ResourceGrant {
                resource: resource.to_string(),
                value: value.get("value").and_then(Value::as_f64).unwrap_or(0.0),
            })
        })
        .collect())
}
