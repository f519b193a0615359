//! Command execution.
//!
//! Each command loads the game data, applies persisted known state, runs
//! its query or mutation, persists what changed and writes one view to
//! `out`.

use std::fmt::Display;
use std::io::Write;

use anyhow::{bail, Result};
use serde::Serialize;
use techtree_logic::{catalog, PinnedList, TechNode, Tree};

use crate::cli::{Command, KnownCommand};
use crate::config::Settings;
use crate::loader::GameData;
use crate::report::{DataSummary, KnownChange, NameList, NodeDetail, NodeList, PinnedReport};
use crate::save_file;
use crate::state;

/// Game data with the saved known state applied.
pub fn open(settings: &Settings) -> Result<GameData> {
    let mut data = GameData::load(settings)?;
    state::load_known(&settings.known_path(), &mut data.tree)?;
    Ok(data)
}

pub fn run(command: Command, settings: &Settings, out: &mut dyn Write) -> Result<()> {
    let mut data = open(settings)?;
    let tree = &data.tree;

    match command {
        Command::Roles { search } => {
            let nodes = filtered(tree, search.as_deref());
            emit(out, settings, &NameList(catalog::roles(nodes)))
        }
        Command::Role { role, search } => {
            let nodes = filtered(tree, search.as_deref());
            let ranked = catalog::by_role(tree, &nodes, &role)?;
            if ranked.is_empty() {
                log::warn!("no nodes with role '{}'", role);
            }
            emit(out, settings, &NodeList::new(tree, ranked)?)
        }
        Command::Show { id } => emit(out, settings, &NodeDetail::new(&data, &id)?),
        Command::Search { query } => {
            emit(out, settings, &NodeList::new(tree, catalog::search(tree, &query))?)
        }
        Command::Known { action } => run_known(action, &mut data, settings, out),
        Command::Pin { id } => edit_pinned(&data, settings, out, |pinned| {
            if !pinned.pin(&id) {
                log::info!("'{}' is already pinned", id);
            }
            Ok(())
        }),
        Command::Unpin { id, all } => edit_pinned(&data, settings, out, |pinned| {
            match id {
                Some(id) if !all => {
                    if !pinned.unpin(&id) {
                        bail!("'{}' is not pinned", id);
                    }
                }
                _ => {
                    let removed = pinned.clear();
                    log::info!("unpinned {} goal(s)", removed);
                }
            }
            Ok(())
        }),
        Command::Move { id, slot } => edit_pinned(&data, settings, out, |pinned| {
            if !pinned.move_to(&id, slot) {
                bail!("'{}' is not pinned", id);
            }
            Ok(())
        }),
        Command::Pinned { mode } => {
            let pinned = state::load_pinned(&settings.pinned_path(), tree)?;
            emit(out, settings, &PinnedReport::new(tree, &pinned, mode.into())?)
        }
        Command::Validate => {
            tree.validate()?;
            emit(out, settings, &DataSummary::new(&data)?)
        }
    }
}

fn run_known(
    action: KnownCommand,
    data: &mut GameData,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<()> {
    let tree = &mut data.tree;
    let before = tree.known_ids().len();

    let changed = match action {
        KnownCommand::List => {
            return emit(out, settings, &NodeList::new(tree, catalog::known_nodes(tree))?);
        }
        KnownCommand::Toggle { id } => {
            let known = tree.toggle_known(&id)?;
            log::info!("'{}' is now {}", id, if known { "known" } else { "unknown" });
            vec![id]
        }
        KnownCommand::Clear => {
            let cleared = tree.known_ids();
            tree.clear_known();
            cleared
        }
        KnownCommand::Import { save } => {
            let finished = save_file::read_finished_research(&save)?;
            tree.import_known(&finished)?;
            finished.all().map(str::to_string).collect()
        }
    };

    state::save_known(&settings.known_path(), tree)?;
    let known = tree.known_ids().len();
    emit(
        out,
        settings,
        &KnownChange {
            changed,
            newly_known: known.saturating_sub(before),
            known,
        },
    )
}

/// Apply `edit` to the persisted pinned list, save it and print it.
fn edit_pinned<F>(data: &GameData, settings: &Settings, out: &mut dyn Write, edit: F) -> Result<()>
where
    F: FnOnce(&mut PinnedList) -> Result<()>,
{
    let path = settings.pinned_path();
    let mut pinned = state::load_pinned(&path, &data.tree)?;
    edit(&mut pinned)?;
    for id in pinned.ids() {
        data.tree.get(id)?;
    }
    state::save_pinned(&path, &pinned)?;
    emit(out, settings, &NameList(pinned.ids().to_vec()))
}

/// Every node, or the search result for `query`.
fn filtered<'a>(tree: &'a Tree, query: Option<&str>) -> Vec<&'a TechNode> {
    match query {
        Some(query) => catalog::search(tree, query),
        None => tree.all().collect(),
    }
}

fn emit<T: Serialize + Display>(out: &mut dyn Write, settings: &Settings, view: &T) -> Result<()> {
    if settings.json {
        serde_json::to_writer_pretty(&mut *out, view)?;
        writeln!(out)?;
    } else {
        write!(out, "{view}")?;
    }
    Ok(())
}
