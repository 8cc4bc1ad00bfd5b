//! Launcher entry representation

use std::path::{Path, PathBuf};

use super::layout::PAK_SUFFIX;

/// What activating an entry does
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Plain folder, opened in place
    Directory,
    /// `.pak` folder with its own launch script
    Package,
    /// Content file run through its system's emulator package
    Title,
}

impl EntryKind {
    /// Classify a filesystem object
    pub fn classify(is_dir: bool, has_pak_suffix: bool) -> Self {
        match (is_dir, has_pak_suffix) {
            (true, false) => EntryKind::Directory,
            (true, true) => EntryKind::Package,
            (false, _) => EntryKind::Title,
        }
    }
}

/// A single navigable item inside a [`Directory`](crate::state::directory::Directory)
#[derive(Clone, Debug)]
pub struct Entry {
    /// Full path to the entry
    path: PathBuf,
    /// Derived display name (see [`display_name`])
    name: String,
    kind: EntryKind,
    /// Slot in the owning directory's alpha jump table
    pub(crate) alpha: usize,
    /// Display name equals a sorted neighbour's
    pub(crate) conflict: bool,
    /// Opens the recents view instead of a filesystem folder
    recents_view: bool,
}

impl Entry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        let path = path.into();
        let name = display_name(&file_name(&path));
        Self {
            path,
            name,
            kind,
            alpha: 0,
            conflict: false,
            recents_view: false,
        }
    }

    /// The synthetic "Recently Played" folder
    pub fn recently_played(path: impl Into<PathBuf>) -> Self {
        let mut entry = Self::new(path, EntryKind::Directory);
        entry.recents_view = true;
        entry
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Whether this entry opens the synthetic recents view
    pub fn is_recents_view(&self) -> bool {
        self.recents_view
    }

    /// Raw filename, shown instead of the display name on conflicts
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }

    /// Slot in the owning directory's alpha jump table
    pub fn alpha_bucket(&self) -> usize {
        self.alpha
    }

    pub fn name_conflict(&self) -> bool {
        self.conflict
    }
}

/// Whether a path names a package (`*.pak`)
pub fn has_pak_suffix(path: &Path) -> bool {
    path.to_string_lossy().ends_with(PAK_SUFFIX)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Derive the display name for a raw filename.
///
/// Drops the extension, then repeatedly cuts at the last `(` or `[` so
/// region/version tags like `(USA)` or `[!]` disappear. If that leaves
/// nothing, the extension-less name is kept as is.
pub fn display_name(raw: &str) -> String {
    let stem = match raw.rfind('.') {
        Some(dot) => &raw[..dot],
        None => raw,
    };

    let mut name = stem;
    while let Some(cut) = name.rfind('(').or_else(|| name.rfind('[')) {
        name = &name[..cut];
    }

    if name.is_empty() {
        stem.to_string()
    } else {
        name.to_string()
    }
}

/// Jump-table bucket of a name: 1..=26 for an ASCII letter, 0 otherwise
pub fn alpha_key(name: &str) -> u8 {
    match name.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some(c @ 'a'..='z') => (c as u8 - b'a') + 1,
        _ => 0,
    }
}
