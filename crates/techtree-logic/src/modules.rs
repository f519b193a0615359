//! Ship modules unlocked by projects.
//!
//! Module templates come from many files (drives, guns, hulls, ...), each
//! with a wiki section. Modules are kept as raw JSON objects since their
//! fields vary by family; the table indexes them by the project that
//! unlocks them.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::{Map, Value};

/// Module template families and their wiki section.
pub const MODULE_TEMPLATES: &[(&str, &str)] = &[
    ("TIBatteryTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Battery"),
    ("TIDriveTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Drive"),
    ("TIGunTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Guns"),
    ("TIHabModuleTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Habs"),
    ("TIHeatSinkTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Heat_Sink"),
    ("TILaserWeaponTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Lasers"),
    ("TIMagneticGunTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Magnetic_Weapons"),
    ("TIMissileTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Missiles"),
    ("TIParticleWeaponTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Particle_Weapons"),
    ("TIPlasmaWeaponTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Plasma_Weapons"),
    ("TIPowerPlantTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Power_Plant"),
    ("TIRadiatorTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Radiator"),
    ("TIShipArmorTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Armor"),
    ("TIShipHullTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Hull"),
    ("TIUtilityModuleTemplate", "https://hoodedhorse.com/wiki/Terra_Invicta/Spaceships#Utility_Modules"),
];

/// Fields that are identifiers, presentation assets or nested data rather
/// than stats.
const NON_STAT_KEYS: &[&str] = &[
    "dataName",
    "friendlyName",
    "grouping",
    "weightedBuildMaterials",
    "iconResource",
    "requiredProjectName",
    "disable",
    "wiki",
    "displayName",
    "description",
    "summary",
    "effectName",
    "modelName",
    "materialsDescription",
    "soundCue",
    "particleEffect",
    "particles",
    "resourcesGranted",
    "unlocks",
    "prereqs",
    "crew",
];

/// Errors raised by lookup tables.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("unknown module '{0}'")]
    UnknownModule(String),
}

/// One ship module template plus merged localization.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipModule {
    pub data_name: String,
    pub wiki: String,
    pub fields: Map<String, Value>,
}

impl ShipModule {
    fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Localized name, falling back to the template's friendly name.
    pub fn name(&self) -> Option<&str> {
        self.text("displayName").or_else(|| self.text("friendlyName"))
    }

    pub fn required_project(&self) -> Option<&str> {
        self.text("requiredProjectName")
    }
}

/// A labelled scalar stat of a module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleStat {
    pub label: String,
    pub value: Value,
}

/// Ship modules keyed by id and indexed by unlocking project.
#[derive(Debug, Default)]
pub struct Modules {
    data: HashMap<String, ShipModule>,
    by_project: HashMap<String, Vec<String>>,
}

impl Modules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every entry of one template file. Entries without a `dataName`
    /// are skipped.
    pub fn add_modules(&mut self, entries: Vec<Value>, wiki: &str) {
        for entry in entries {
            match entry {
                Value::Object(fields) => self.add_module(fields, wiki),
                _ => log::warn!("skipping non-object module entry"),
            }
        }
    }

    /// Add one module. A later entry with the same `dataName` replaces the
    /// earlier one and moves to the project it names.
    pub fn add_module(&mut self, fields: Map<String, Value>, wiki: &str) {
        let Some(data_name) = fields.get("dataName").and_then(Value::as_str) else {
            log::warn!("skipping module entry without dataName");
            return;
        };
        let module = ShipModule {
            data_name: data_name.to_string(),
            wiki: wiki.to_string(),
            fields,
        };
        let project = module.required_project().map(str::to_string);
        let id = module.data_name.clone();

        if let Some(previous) = self.data.insert(id.clone(), module) {
            log::warn!("module '{}' replaced by a later entry with the same id", id);
            if let Some(old_project) = previous.required_project() {
                self.unindex(old_project, &id);
            }
        }
        if let Some(project) = project {
            self.by_project.entry(project).or_default().push(id);
        }
    }

    fn unindex(&mut self, project: &str, id: &str) {
        if let Some(ids) = self.by_project.get_mut(project) {
            ids.retain(|other| other != id);
            if ids.is_empty() {
                self.by_project.remove(project);
            }
        }
    }

    /// Merge one localization string; unknown ids are ignored.
    pub fn add_translation(&mut self, data_name: &str, kind: &str, value: &str) {
        if let Some(module) = self.data.get_mut(data_name) {
            module
                .fields
                .insert(kind.to_string(), Value::String(value.to_string()));
        }
    }

    pub fn get(&self, data_name: &str) -> Result<&ShipModule, LookupError> {
        self.data
            .get(data_name)
            .ok_or_else(|| LookupError::UnknownModule(data_name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Scalar stats of a module with human-readable labels, sorted by field
    /// name.
    pub fn stats(module: &ShipModule) -> Vec<ModuleStat> {
        module
            .fields
            .iter()
            .filter(|(key, _)| !NON_STAT_KEYS.contains(&key.as_str()))
            .filter(|(_, value)| !value.is_object() && !value.is_array())
            .map(|(key, value)| ModuleStat {
                label: humanize_key(key),
                value: value.clone(),
            })
            .collect()
    }

    /// Modules unlocked by `project`, one per base name.
    ///
    /// Variants named like `"Railgun x2"` collapse into the first module
    /// with that base name, and the returned copy has the ` xN` suffix
    /// removed from its names.
    pub fn project_modules(&self, project: &str) -> Vec<ShipModule> {
        let Some(ids) = self.by_project.get(project) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut modules = Vec::new();
        for module in ids.iter().filter_map(|id| self.data.get(id)) {
            let Some(name) = module.name() else {
                modules.push(module.clone());
                continue;
            };
            let (base, had_suffix) = strip_count_suffix(name);
            if !seen.insert(base.to_string()) {
                continue;
            }
            let mut module = module.clone();
            if had_suffix {
                for key in ["displayName", "friendlyName"] {
                    if let Some(Value::String(text)) = module.fields.get_mut(key) {
                        *text = strip_count_suffix(text).0.to_string();
                    }
                }
            }
            modules.push(module);
        }
        modules
    }
}

/// Split a trailing ` x<digits>` (case-insensitive) off a module name.
fn strip_count_suffix(name: &str) -> (&str, bool) {
    let digits = name.len() - name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let head = &name[..name.len() - digits];
        if let Some(base) = head
            .strip_suffix(" x")
            .or_else(|| head.strip_suffix(" X"))
        {
            return (base.trim(), true);
        }
    }
    (name.trim(), false)
}

/// `"thrustRating"` becomes `"Thrust Rating"`, `"mass_tons"` becomes
/// `"Mass tons"`.
fn humanize_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for c in key.chars() {
        if prev_lower && c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        prev_lower = c.is_ascii_lowercase();
        spaced.push(if c == '_' { ' ' } else { c });
    }
    let trimmed = spaced.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
