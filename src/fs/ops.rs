//! Filesystem operations
//!
//! Every reader here degrades to an empty result: an unreadable folder is
//! simply a folder with nothing in it.

use std::fs;
use std::path::{Path, PathBuf};

use super::entry::{Entry, EntryKind, has_pak_suffix};
use super::layout::{LAUNCH_SCRIPT, Layout, MIN_UPDATE_SIZE};

/// Names never shown in a listing
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
        || name.ends_with("_cache.db")
        || name.starts_with("COPYING")
        || name == "license"
        || name == "LICENSE"
}

pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Visible immediate children of `path` as `(full path, is_dir)`, in
/// enumeration order
fn visible_children(path: &Path) -> Vec<(PathBuf, bool)> {
    let reader = match fs::read_dir(path) {
        Ok(reader) => reader,
        Err(e) => {
            log::debug!("cannot read {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    reader
        .filter_map(|entry| entry.ok())
        .filter(|entry| !is_hidden(&entry.file_name().to_string_lossy()))
        .map(|entry| {
            let full = entry.path();
            // Follow symlinks so a linked folder still opens as a folder
            let is_dir = full.is_dir();
            (full, is_dir)
        })
        .collect()
}

/// Read a real folder into unsorted entries
pub fn read_entries(path: &Path) -> Vec<Entry> {
    visible_children(path)
        .into_iter()
        .map(|(full, is_dir)| {
            let kind = EntryKind::classify(is_dir, has_pak_suffix(&full));
            Entry::new(full, kind)
        })
        .collect()
}

/// Materialize recents in their stored order
pub fn read_recents(recents: &[PathBuf]) -> Vec<Entry> {
    recents
        .iter()
        .map(|path| {
            let kind = if has_pak_suffix(path) {
                EntryKind::Package
            } else {
                EntryKind::Title
            };
            Entry::new(path.clone(), kind)
        })
        .collect()
}

/// Whether `dir` holds at least one `*.pak` folder with a launch script
pub fn has_paks(dir: &Path) -> bool {
    visible_children(dir)
        .iter()
        .any(|(path, is_dir)| *is_dir && has_pak_suffix(path) && exists(&path.join(LAUNCH_SCRIPT)))
}

/// Whether a ROM folder should appear at the root: its emulator package
/// must exist and it must contain at least one visible file
pub fn has_roms(layout: &Layout, rom_folder: &Path) -> bool {
    let Some(script) = layout.emulator_script(rom_folder) else {
        return false;
    };
    if !exists(&script) {
        return false;
    }
    visible_children(rom_folder).iter().any(|(_, is_dir)| !is_dir)
}

/// Whether a firmware update is waiting
pub fn has_update(layout: &Layout) -> bool {
    fs::metadata(&layout.update_archive)
        .map(|meta| meta.len() > MIN_UPDATE_SIZE)
        .unwrap_or(false)
}

/// Build the composite root listing.
///
/// Order is fixed: Recently Played, the emulator folders (sorted among
/// themselves), Games, Tools, Update. Only the emulator block is sorted.
pub fn read_root(layout: &Layout, recents: &[PathBuf]) -> Vec<Entry> {
    let mut entries = Vec::new();

    if recents.iter().any(|path| exists(path)) {
        entries.push(Entry::recently_played(layout.recently_played()));
    }

    let mut emus: Vec<Entry> = visible_children(&layout.roms_dir())
        .into_iter()
        .filter(|(path, _)| has_roms(layout, path))
        .map(|(path, _)| Entry::new(path, EntryKind::Directory))
        .collect();
    sort_entries(&mut emus);
    entries.extend(emus);

    let games = layout.games_dir();
    if has_paks(&games) {
        entries.push(Entry::new(games, EntryKind::Directory));
    }
    let tools = layout.tools_dir();
    if has_paks(&tools) {
        entries.push(Entry::new(tools, EntryKind::Directory));
    }
    if has_update(layout) {
        entries.push(Entry::new(layout.update_pak(), EntryKind::Package));
    }

    entries
}

/// Stable case-insensitive sort by display name
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by_cached_key(|e| e.name().to_lowercase());
}
