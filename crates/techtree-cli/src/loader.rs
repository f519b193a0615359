//! Loading a game data directory into the tree and lookup tables.
//!
//! The technology and project templates are required: a missing or
//! malformed file aborts the load. Everything else (module and org
//! templates, localization, effect texts, benefit notes) is optional and
//! degrades to "no data" with a warning.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use techtree_logic::benefits::Benefits;
use techtree_logic::effects::{Effects, EFFECT_TEMPLATE};
use techtree_logic::localization::{parse_localization, TranslationEntry, TRANSLATION_FILES};
use techtree_logic::modules::{Modules, MODULE_TEMPLATES};
use techtree_logic::orgs::{Orgs, ORG_TEMPLATE};
use techtree_logic::template::{PROJECT_TEMPLATE, TECH_TEMPLATE};
use techtree_logic::Tree;

use crate::config::Settings;

/// Everything read from one game data directory.
#[derive(Debug)]
pub struct GameData {
    pub tree: Tree,
    pub modules: Modules,
    pub orgs: Orgs,
    pub effects: Effects,
    pub benefits: Benefits,
}

impl GameData {
    pub fn load(settings: &Settings) -> Result<Self> {
        let techs = read_required(&settings.template_path(TECH_TEMPLATE))?;
        let projects = read_required(&settings.template_path(PROJECT_TEMPLATE))?;
        let mut tree = Tree::from_json(&techs, &projects).with_context(|| {
            format!("loading tech tree from {}", settings.game_data.display())
        })?;

        let mut modules = Modules::new();
        for &(family, wiki) in MODULE_TEMPLATES {
            modules.add_modules(read_entries(&settings.template_path(family))?, wiki);
        }
        let mut orgs = Orgs::new();
        orgs.add_orgs(read_entries(&settings.template_path(ORG_TEMPLATE))?);

        // Every localization file labels the tree; module, org and effect
        // files also label their own table.
        let mut effects = Effects::new();
        for &family in TRANSLATION_FILES {
            let is_module = MODULE_TEMPLATES.iter().any(|&(name, _)| name == family);
            for entry in read_localization(&settings.localization_path(family))? {
                let TranslationEntry { kind, key, value } = entry;
                tree.add_translation(&kind, &key, &value);
                if is_module {
                    modules.add_translation(&key, &kind, &value);
                } else if family == ORG_TEMPLATE {
                    orgs.add_translation(&key, &kind, &value);
                } else if family == EFFECT_TEMPLATE {
                    effects.add_translation(&key, &kind, &value);
                }
            }
        }

        let mut benefits = Benefits::new();
        if let Some(text) = read_optional(&settings.benefits_path())? {
            benefits.merge_json(&text);
        }

        log::info!(
            "loaded {} nodes, {} modules, {} orgs, {} effects, {} benefit notes",
            tree.len(),
            modules.len(),
            orgs.len(),
            effects.len(),
            benefits.len()
        );
        Ok(Self {
            tree,
            modules,
            orgs,
            effects,
            benefits,
        })
    }
}

fn read_required(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// `None` when the file does not exist; other I/O failures are errors.
fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("{} not found, skipping", path.display());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

/// Entries of an optional template file.
fn read_entries(path: &Path) -> Result<Vec<Value>> {
    let Some(text) = read_optional(path)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&text) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            log::warn!("ignoring malformed template {}: {}", path.display(), e);
            Ok(Vec::new())
        }
    }
}

fn read_localization(path: &Path) -> Result<Vec<TranslationEntry>> {
    Ok(read_optional(path)?
        .map(|text| parse_localization(&text))
        .unwrap_or_default())
}
