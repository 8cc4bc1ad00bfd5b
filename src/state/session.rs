//! Launcher session: the navigation stack plus recents, resume and launch

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};
use crate::fs::layout::LAUNCH_SCRIPT;
use crate::fs::ops::exists;
use crate::fs::{Entry, EntryKind, Layout};

use super::directory::{AlphaJump, Directory, DirectorySource, Step};
use super::recents::RecentsStore;
use super::stack::NavigationStack;

/// Outcome of activating the selected entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Nothing selected
    Nothing,
    /// A directory was opened on top of the stack
    Opened,
    /// A command was queued; the control loop should exit
    Launched(String),
}

/// Owns all navigation state for one run of the launcher
#[derive(Debug)]
pub struct LauncherSession {
    layout: Layout,
    page_size: usize,
    stack: NavigationStack,
    recents: RecentsStore,
}

impl LauncherSession {
    /// Load recents and build the root listing
    pub fn new(layout: Layout, page_size: usize) -> Self {
        let recents = RecentsStore::load(&layout.recents_file);
        Self::with_recents(layout, recents, page_size)
    }

    pub fn with_recents(layout: Layout, recents: RecentsStore, page_size: usize) -> Self {
        let root = Directory::build(DirectorySource::Root, &layout, recents.paths(), page_size);
        log::info!(
            "root {} has {} entries, {} recents",
            layout.root.display(),
            root.len(),
            recents.paths().len()
        );
        Self {
            layout,
            page_size,
            stack: NavigationStack::new(root),
            recents,
        }
    }

    pub fn stack(&self) -> &NavigationStack {
        &self.stack
    }

    pub fn top(&self) -> &Directory {
        self.stack.top()
    }

    pub fn move_selection(&mut self, step: Step) -> bool {
        self.stack.top_mut().move_selection(step)
    }

    pub fn jump_alpha(&mut self, direction: AlphaJump) -> bool {
        self.stack.top_mut().jump_alpha(direction)
    }

    /// Close the top directory (never the root)
    pub fn ascend(&mut self) -> bool {
        self.stack.ascend()
    }

    /// Open the directory entry at `index` of the top listing
    pub fn descend(&mut self, index: usize) -> bool {
        let Some(entry) = self.stack.top().entries().get(index) else {
            return false;
        };
        if entry.kind() != EntryKind::Directory {
            return false;
        }
        let source = if entry.is_recents_view() {
            DirectorySource::Recents
        } else {
            DirectorySource::Path(entry.path().to_path_buf())
        };
        self.open(source);
        true
    }

    fn open(&mut self, source: DirectorySource) {
        let dir = Directory::build(source, &self.layout, self.recents.paths(), self.page_size);
        self.stack.push(dir);
    }

    /// Open a directory or launch a title/package
    pub fn activate(&mut self) -> AppResult<Activation> {
        let top = self.stack.top();
        let Some(entry) = top.selected_entry().cloned() else {
            return Ok(Activation::Nothing);
        };

        if entry.kind() == EntryKind::Directory {
            let index = top.selected();
            self.descend(index);
            return Ok(Activation::Opened);
        }

        let command = self.launch_command(&entry)?;
        if self.counts_as_played(&entry)
            && let Err(e) = self.recents.touch(entry.path())
        {
            log::warn!("could not save recents: {}", e);
        }
        if let Err(e) = self.persist_last(entry.path()) {
            log::warn!("could not save last path: {}", e);
        }
        self.queue_command(&command)?;
        log::info!("queued {}", command);
        Ok(Activation::Launched(command))
    }

    /// Titles always land in recents; packages only when they are games
    fn counts_as_played(&self, entry: &Entry) -> bool {
        match entry.kind() {
            EntryKind::Title => true,
            EntryKind::Package => entry.path().starts_with(self.layout.games_dir()),
            EntryKind::Directory => false,
        }
    }

    /// Shell command that runs `entry`
    pub fn launch_command(&self, entry: &Entry) -> AppResult<String> {
        let path = entry.path();
        match entry.kind() {
            EntryKind::Title => {
                let script = self.layout.emulator_for_title(path).ok_or_else(|| {
                    AppError::Launch(format!("no emulator for {}", path.display()))
                })?;
                Ok(format!(
                    "\"{}\" \"{}\"",
                    script.to_string_lossy(),
                    path.to_string_lossy()
                ))
            }
            EntryKind::Package => Ok(format!("\"{}\"", path.join(LAUNCH_SCRIPT).to_string_lossy())),
            EntryKind::Directory => {
                Err(AppError::Launch(format!("{} is a directory", path.display())))
            }
        }
    }

    /// Remember where the user was. Inside the recents view the view itself
    /// is remembered: its first entry is always the latest launch.
    pub fn persist_last(&self, path: &Path) -> AppResult<()> {
        let target = if *self.stack.top().source() == DirectorySource::Recents {
            self.layout.recently_played()
        } else {
            path.to_path_buf()
        };
        write_file(&self.layout.last_path, &target.to_string_lossy())
    }

    /// Hand the command to the supervisor
    pub fn queue_command(&self, command: &str) -> AppResult<()> {
        write_file(&self.layout.next_command, command)
    }

    /// Re-open the directories leading to the last-session path and select
    /// it. Stops quietly wherever the trail no longer matches.
    pub fn restore(&mut self) {
        let Some(last) = read_last(&self.layout) else {
            return;
        };
        let root = self.layout.root.clone();
        if !self.layout.contains(&last) {
            log::debug!("last path {} is outside {}", last.display(), root.display());
            return;
        }

        let mut trail: Vec<&Path> = last.ancestors().take_while(|p| *p != root.as_path()).collect();
        trail.reverse();

        for segment in trail {
            let top = self.stack.top_mut();
            // Intermediate folders like Roms/ are not listed at the root,
            // so a miss only skips the segment
            let Some(index) = top.position(segment) else {
                log::debug!("restore: {} not listed", segment.display());
                continue;
            };
            top.select(index);
            if top.entries()[index].kind() == EntryKind::Directory {
                self.descend(index);
            }
        }
        log::debug!("restored {} at depth {}", last.display(), self.stack.depth());
    }
}

/// First usable line of the last-session file. Falls back to the last
/// non-empty line so surviving ancestors of a deleted path still restore.
fn read_last(layout: &Layout) -> Option<PathBuf> {
    let content = fs::read_to_string(&layout.last_path).ok()?;
    let recently_played = layout.recently_played();
    let mut fallback = None;
    for line in content.lines().filter(|l| !l.is_empty()) {
        let path = PathBuf::from(line);
        if path == recently_played || exists(&path) {
            return Some(path);
        }
        fallback = Some(path);
    }
    fallback
}

fn write_file(path: &Path, content: &str) -> AppResult<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, content)?;
    Ok(())
}
