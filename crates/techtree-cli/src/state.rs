//! Persisted player state: the pinned list and the known ids.
//!
//! Both files are plain JSON arrays of ids. A missing file is an empty
//! list. Ids that no longer exist in the game data are dropped with a
//! warning, so stale state never blocks loading.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use techtree_logic::{PinnedList, Tree};

fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

fn write_creating_dirs(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

/// Load the pinned list, dropping ids missing from `tree`.
pub fn load_pinned(path: &Path, tree: &Tree) -> Result<PinnedList> {
    let Some(text) = read_if_exists(path)? else {
        return Ok(PinnedList::new());
    };
    let mut pinned =
        PinnedList::from_json(&text).with_context(|| format!("parsing {}", path.display()))?;
    let stale: Vec<String> = pinned
        .ids()
        .iter()
        .filter(|id| !tree.contains(id))
        .cloned()
        .collect();
    for id in &stale {
        log::warn!("dropping pinned '{}': not in game data", id);
        pinned.unpin(id);
    }
    Ok(pinned)
}

pub fn save_pinned(path: &Path, pinned: &PinnedList) -> Result<()> {
    write_creating_dirs(path, &pinned.to_json()?)
}

/// Restore the saved known flags onto `tree` exactly as they were written,
/// without pulling in requirements. Returns how many ids were restored.
pub fn load_known(path: &Path, tree: &mut Tree) -> Result<usize> {
    let Some(text) = read_if_exists(path)? else {
        return Ok(0);
    };
    let mut ids: Vec<String> =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    ids.retain(|id| {
        let exists = tree.contains(id);
        if !exists {
            log::warn!("dropping known '{}': not in game data", id);
        }
        exists
    });
    tree.restore_known(&ids)?;
    log::debug!("restored {} known ids from {}", ids.len(), path.display());
    Ok(ids.len())
}

pub fn save_known(path: &Path, tree: &Tree) -> Result<()> {
    write_creating_dirs(path, &serde_json::to_string(&tree.known_ids())?)
}
