//! Organizations unlocked by technologies.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Template file holding orgs.
pub const ORG_TEMPLATE: &str = "TIOrgTemplate";

/// Attribute bonuses, shown as plain numbers.
const STATS: &[(&str, &str)] = &[
    ("administration", "administration"),
    ("command", "command"),
    ("espionage", "espionage"),
    ("investigation", "investigation"),
    ("security", "security"),
    ("science", "science"),
];

/// Income bonuses; keys ending in `Bonus` are fractions shown as percent.
const INCOMES: &[(&str, &str)] = &[
    ("incomeMoney", "currency"),
    ("incomeResearch", "research"),
    ("incomeInfluence", "influence"),
    ("incomeOps", "ops"),
    ("incomeBoost", "boost"),
    ("incomeMissionControl", "mission_control"),
    ("projectsGranted", "projects"),
    ("miningBonus", "core_res"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YieldKind {
    Stat,
    Income,
}

/// One formatted bonus of an org, e.g. `+2 ± 1` or `+15%`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgYield {
    pub icon: &'static str,
    pub value: String,
    pub kind: YieldKind,
}

/// An org template plus merged localization.
#[derive(Debug, Clone, PartialEq)]
pub struct Org {
    pub data_name: String,
    pub fields: Map<String, Value>,
}

impl Org {
    pub fn name(&self) -> Option<&str> {
        ["displayName", "friendlyName"]
            .iter()
            .filter_map(|key| self.fields.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
    }

    pub fn required_tech(&self) -> Option<&str> {
        self.fields
            .get("requiredTechName")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn number(&self, key: &str) -> f64 {
        self.fields.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// Formatted non-zero stats followed by non-zero incomes.
    pub fn yields(&self) -> Vec<OrgYield> {
        let mut yields = Vec::new();
        for &(key, icon) in STATS {
            if let Some(value) = self.format_bonus(key, false) {
                yields.push(OrgYield {
                    icon,
                    value,
                    kind: YieldKind::Stat,
                });
            }
        }
        for &(key, icon) in INCOMES {
            if let Some(value) = self.format_bonus(key, key.ends_with("Bonus")) {
                yields.push(OrgYield {
                    icon,
                    value,
                    kind: YieldKind::Income,
                });
            }
        }
        yields
    }

    /// `+value`, with ` ± rand` when the matching `rand<Key>` field is
    /// non-zero. `None` for a zero or missing value.
    fn format_bonus(&self, key: &str, percent: bool) -> Option<String> {
        let value = self.number(key);
        if value == 0.0 {
            return None;
        }
        let format = |v: f64| {
            if percent {
                format!("{:.0}%", v * 100.0)
            } else {
                v.to_string()
            }
        };

        let mut text = String::new();
        if value > 0.0 {
            text.push('+');
        }
        text.push_str(&format(value));

        let rand = self.number(&format!("rand{}", capitalize(key)));
        if rand != 0.0 {
            text.push_str(&format!(" ± {}", format(rand)));
        }
        Some(text)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Orgs keyed by id and indexed by the technology that unlocks them.
#[derive(Debug, Default)]
pub struct Orgs {
    data: HashMap<String, Org>,
    by_tech: HashMap<String, Vec<String>>,
}

impl Orgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every entry of the org template. Entries without a `dataName`
    /// are skipped.
    pub fn add_orgs(&mut self, entries: Vec<Value>) {
        for entry in entries {
            let Value::Object(fields) = entry else {
                log::warn!("skipping non-object org entry");
                continue;
            };
            let Some(data_name) = fields.get("dataName").and_then(Value::as_str) else {
                log::warn!("skipping org entry without dataName");
                continue;
            };
            let org = Org {
                data_name: data_name.to_string(),
                fields,
            };
            let tech = org.required_tech().map(str::to_string);
            let id = org.data_name.clone();
            if let Some(previous) = self.data.insert(id.clone(), org) {
                log::warn!("org '{}' replaced by a later entry with the same id", id);
                if let Some(ids) = previous
                    .required_tech()
                    .and_then(|old| self.by_tech.get_mut(old))
                {
                    ids.retain(|other| other != &id);
                }
            }
            if let Some(tech) = tech {
                self.by_tech.entry(tech).or_default().push(id);
            }
        }
    }

    /// Merge one localization string; unknown ids are ignored.
    pub fn add_translation(&mut self, data_name: &str, kind: &str, value: &str) {
        if let Some(org) = self.data.get_mut(data_name) {
            org.fields
                .insert(kind.to_string(), Value::String(value.to_string()));
        }
    }

    pub fn get(&self, data_name: &str) -> Option<&Org> {
        self.data.get(data_name)
    }

    /// Orgs unlocked by `tech`, in template order.
    pub fn tech_orgs(&self, tech: &str) -> Vec<&Org> {
        self.by_tech
            .get(tech)
            .map(|ids| ids.iter().filter_map(|id| self.data.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Orgs {
        let mut orgs = Orgs::new();
        orgs.add_orgs(vec![
            json!({
                "dataName": "SpaceAgency",
                "friendlyName": "Space Agency",
                "requiredTechName": "Rocketry",
                "science": 2,
                "randScience": 1,
                "command": -1,
                "incomeMoney": 5.5,
                "miningBonus": 0.15,
                "randMiningBonus": 0.05,
                "espionage": 0
            }),
            json!({"dataName": "Bank", "requiredTechName": ""}),
            json!("garbage"),
        ]);
        orgs
    }

    #[test]
    fn test_index_by_tech() {
        let orgs = sample();
        assert_eq!(orgs.len(), 2);
        let unlocked = orgs.tech_orgs("Rocketry");
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].name(), Some("Space Agency"));
        assert!(orgs.tech_orgs("").is_empty());
    }

    #[test]
    fn test_yields_formatting() {
        let orgs = sample();
        let yields = orgs.get("SpaceAgency").unwrap().yields();
        let values: Vec<(&str, &str)> = yields.iter().map(|y| (y.icon, y.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                ("command", "-1"),
                ("science", "+2 ± 1"),
                ("currency", "+5.5"),
                ("core_res", "+15% ± 5%"),
            ]
        );
        assert_eq!(yields[0].kind, YieldKind::Stat);
        assert_eq!(yields[2].kind, YieldKind::Income);
    }

    #[test]
    fn test_replaced_org_moves_to_new_tech() {
        let mut orgs = sample();
        orgs.add_orgs(vec![json!({"dataName": "SpaceAgency", "requiredTechName": "Fusion"})]);
        assert_eq!(orgs.len(), 2);
        assert!(orgs.tech_orgs("Rocketry").is_empty());
        assert_eq!(orgs.tech_orgs("Fusion")[0].data_name, "SpaceAgency");
    }

    #[test]
    fn test_translation() {
        let mut orgs = sample();
        orgs.add_translation("Bank", "displayName", "First Bank");
        assert_eq!(orgs.get("Bank").unwrap().name(), Some("First Bank"));
    }
}
