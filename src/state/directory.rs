//! Directory listing: sorted entries, alpha jump table and the
//! selection/window cursor

use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::fs::entry::alpha_key;
use crate::fs::{Entry, Layout, ops};

/// One slot per letter plus one for everything else
pub const MAX_ALPHA_SLOTS: usize = 27;

/// Default number of visible rows
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Where a directory's entries come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorySource {
    /// Composite root listing (recents, systems, Games, Tools, Update)
    Root,
    /// Recently played titles and packages, most recent first
    Recents,
    /// A real folder on disk
    Path(PathBuf),
}

/// Single-row or full-page cursor movement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
    PageUp,
    PageDown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaJump {
    Prev,
    Next,
}

/// An open listing with its own cursor.
///
/// `start..end` is the visible window. Whenever the listing is non-empty,
/// `start <= selected < end <= len` and `end - start == min(page_size, len)`.
#[derive(Debug, Clone)]
pub struct Directory {
    source: DirectorySource,
    /// Path (or synthetic identifier) the listing was built from
    path: PathBuf,
    entries: Vec<Entry>,
    /// Entry index where each alpha bucket starts
    alphas: Vec<usize>,
    selected: usize,
    start: usize,
    end: usize,
    page_size: usize,
}

impl Directory {
    /// Build a listing from its source
    pub fn build(
        source: DirectorySource,
        layout: &Layout,
        recents: &[PathBuf],
        page_size: usize,
    ) -> Self {
        let (path, entries) = match &source {
            DirectorySource::Root => (layout.root.clone(), ops::read_root(layout, recents)),
            DirectorySource::Recents => (layout.recently_played(), ops::read_recents(recents)),
            DirectorySource::Path(path) => {
                let mut entries = ops::read_entries(path);
                ops::sort_entries(&mut entries);
                (path.clone(), entries)
            }
        };
        log::debug!("indexed {} ({} entries)", path.display(), entries.len());
        Self::from_entries(source, path, entries, page_size)
    }

    /// Wrap already-ordered entries and index them
    pub fn from_entries(
        source: DirectorySource,
        path: PathBuf,
        entries: Vec<Entry>,
        page_size: usize,
    ) -> Self {
        let page_size = page_size.max(1);
        let end = entries.len().min(page_size);
        let mut dir = Self {
            source,
            path,
            entries,
            alphas: Vec::new(),
            selected: 0,
            start: 0,
            end,
            page_size,
        };
        dir.index();
        dir
    }

    /// Assign alpha slots and flag display-name collisions in one pass
    fn index(&mut self) {
        self.alphas.clear();
        let mut bucket: Option<u8> = None;
        let mut slot = 0;
        let mut overflowed = false;

        for i in 0..self.entries.len() {
            if i > 0 && self.entries[i - 1].name() == self.entries[i].name() {
                self.entries[i - 1].conflict = true;
                self.entries[i].conflict = true;
            }

            let key = alpha_key(self.entries[i].name());
            if bucket != Some(key) {
                bucket = Some(key);
                if self.alphas.len() < MAX_ALPHA_SLOTS {
                    slot = self.alphas.len();
                    self.alphas.push(i);
                } else if !overflowed {
                    overflowed = true;
                    log::warn!(
                        "alpha table for {} exceeds {} slots, merging the rest",
                        self.path.display(),
                        MAX_ALPHA_SLOTS
                    );
                }
            }
            self.entries[i].alpha = slot;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source(&self) -> &DirectorySource {
        &self.source
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Visible window as entry indices
    pub fn window(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Currently highlighted entry (none for an empty listing)
    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.selected)
    }

    /// Entries inside the visible window
    pub fn visible(&self) -> &[Entry] {
        &self.entries[self.start..self.end]
    }

    /// Index of the entry with exactly this path
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.path() == path)
    }

    fn first_page(&mut self) {
        self.start = 0;
        self.end = self.len().min(self.page_size);
    }

    fn last_page(&mut self) {
        self.end = self.len();
        self.start = self.end.saturating_sub(self.page_size);
    }

    /// Show a page starting at `index`, pulled back so it never runs past the end
    fn anchor_at(&mut self, index: usize) {
        self.end = (index + self.page_size).min(self.len());
        self.start = self.end.saturating_sub(self.page_size);
    }

    /// Move the cursor. Single steps wrap around the ends, page steps stop
    /// at them. Returns whether the selection changed.
    pub fn move_selection(&mut self, step: Step) -> bool {
        let total = self.len();
        if total == 0 {
            return false;
        }
        let page = self.page_size;
        let before = self.selected;

        match step {
            Step::Up => {
                if self.selected == 0 {
                    self.selected = total - 1;
                    self.last_page();
                } else {
                    self.selected -= 1;
                    if self.selected < self.start {
                        self.start -= 1;
                        self.end -= 1;
                    }
                }
            }
            Step::Down => {
                if self.selected + 1 >= total {
                    self.selected = 0;
                    self.first_page();
                } else {
                    self.selected += 1;
                    if self.selected >= self.end {
                        self.start += 1;
                        self.end += 1;
                    }
                }
            }
            Step::PageUp => {
                if self.selected < page {
                    self.selected = 0;
                    self.first_page();
                } else {
                    self.selected -= page;
                    if self.selected < self.start {
                        self.start = self.start.saturating_sub(page);
                        self.end = (self.start + page).min(total);
                    }
                }
            }
            Step::PageDown => {
                if self.selected + page >= total {
                    self.selected = total - 1;
                    self.last_page();
                } else {
                    self.selected += page;
                    if self.selected >= self.end {
                        self.end = (self.end + page).min(total);
                        self.start = self.end.saturating_sub(page);
                    }
                }
            }
        }

        self.selected != before
    }

    /// Jump to the first entry of the neighbouring alpha bucket.
    /// Returns whether the selection changed.
    pub fn jump_alpha(&mut self, direction: AlphaJump) -> bool {
        let Some(entry) = self.selected_entry() else {
            return false;
        };
        let bucket = entry.alpha_bucket();
        let slot = match direction {
            AlphaJump::Prev => bucket.checked_sub(1),
            AlphaJump::Next => Some(bucket + 1),
        };
        let Some(&target) = slot.and_then(|s| self.alphas.get(s)) else {
            return false;
        };

        let before = self.selected;
        self.selected = target;
        if self.len() > self.page_size {
            self.anchor_at(target);
        }
        self.selected != before
    }

    /// Select an entry directly, scrolling it into view
    pub fn select(&mut self, index: usize) {
        if index >= self.len() {
            return;
        }
        self.selected = index;
        if index >= self.end || index < self.start {
            self.anchor_at(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::EntryKind;

    fn listing(names: &[&str], page_size: usize) -> Directory {
        let mut entries: Vec<Entry> = names
            .iter()
            .map(|n| Entry::new(format!("/r/{}", n), EntryKind::Title))
            .collect();
        ops::sort_entries(&mut entries);
        Directory::from_entries(DirectorySource::Path("/r".into()), "/r".into(), entries, page_size)
    }

    fn numbered(count: usize) -> Directory {
        let names: Vec<String> = (0..count).map(|i| format!("item{:02}.gb", i)).collect();
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        listing(&refs, DEFAULT_PAGE_SIZE)
    }

    fn window(dir: &Directory) -> (usize, usize, usize) {
        (dir.selected, dir.start, dir.end)
    }

    #[test]
    fn test_alpha_table() {
        let dir = listing(
            &["apple.gb", "Avocado.gb", "banana.gb", "1942.gb", "cherry.gb", "Coconut.gb"],
            5,
        );
        // Sorted: 1942, apple, Avocado, banana, cherry, Coconut
        assert_eq!(dir.alphas, vec![0, 1, 3, 4]);
        let slots: Vec<usize> = dir.entries.iter().map(|e| e.alpha_bucket()).collect();
        assert_eq!(slots, vec![0, 1, 1, 2, 3, 3]);
        for entry in &dir.entries {
            let start = dir.alphas[entry.alpha_bucket()];
            assert_eq!(alpha_key(dir.entries[start].name()), alpha_key(entry.name()));
        }
    }

    #[test]
    fn test_conflicts_marked_for_whole_group() {
        let dir = listing(
            &[
                "Tetris (USA).gb",
                "Tetris (Europe).gb",
                "Tetris (Japan).gb",
                "Tetris DX.gbc",
                "Zelda.gb",
            ],
            5,
        );
        let flags: Vec<(String, bool)> = dir
            .entries
            .iter()
            .map(|e| (e.file_name(), e.name_conflict()))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("Tetris (USA).gb".to_string(), true),
                ("Tetris (Europe).gb".to_string(), true),
                ("Tetris (Japan).gb".to_string(), true),
                ("Tetris DX.gbc".to_string(), false),
                ("Zelda.gb".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_alpha_table_overflow_is_truncated() {
        // Letters interleaved with non-ASCII names force more bucket changes than slots
        let mut entries = Vec::new();
        for c in b'a'..=b'z' {
            entries.push(Entry::new(format!("/r/{}x.gb", c as char), EntryKind::Title));
            entries.push(Entry::new(format!("/r/é{}.gb", c as char), EntryKind::Title));
        }
        let dir = Directory::from_entries(DirectorySource::Recents, "/r".into(), entries, 5);
        assert_eq!(dir.alphas.len(), MAX_ALPHA_SLOTS);
        assert!(dir.entries.iter().all(|e| e.alpha_bucket() < MAX_ALPHA_SLOTS));
    }

    #[test]
    fn test_initial_window() {
        assert_eq!(window(&numbered(12)), (0, 0, 5));
        assert_eq!(window(&numbered(3)), (0, 0, 3));
        let empty = numbered(0);
        assert_eq!(window(&empty), (0, 0, 0));
        assert!(empty.selected_entry().is_none());
        assert!(empty.visible().is_empty());
    }

    #[test]
    fn test_down_wraps_to_first_page() {
        let mut dir = numbered(12);
        dir.select(11);
        assert_eq!(window(&dir), (11, 7, 12));
        assert!(dir.move_selection(Step::Down));
        assert_eq!(window(&dir), (0, 0, 5));
    }

    #[test]
    fn test_up_wraps_to_last_page() {
        let mut dir = numbered(12);
        assert!(dir.move_selection(Step::Up));
        assert_eq!(window(&dir), (11, 7, 12));

        let mut short = numbered(3);
        short.move_selection(Step::Up);
        assert_eq!(window(&short), (2, 0, 3));
    }

    #[test]
    fn test_single_steps_scroll_by_one() {
        let mut dir = numbered(12);
        for _ in 0..5 {
            dir.move_selection(Step::Down);
        }
        assert_eq!(window(&dir), (5, 1, 6));
        for _ in 0..5 {
            dir.move_selection(Step::Up);
        }
        assert_eq!(window(&dir), (0, 0, 5));
    }

    #[test]
    fn test_page_steps_clamp() {
        let mut dir = numbered(12);
        dir.move_selection(Step::PageDown);
        assert_eq!(window(&dir), (5, 5, 10));
        dir.move_selection(Step::PageDown);
        assert_eq!(window(&dir), (10, 7, 12));
        dir.move_selection(Step::PageDown);
        assert_eq!(window(&dir), (11, 7, 12));
        dir.move_selection(Step::PageUp);
        assert_eq!(window(&dir), (6, 2, 7));
        dir.move_selection(Step::PageUp);
        assert_eq!(window(&dir), (1, 0, 5));
        dir.move_selection(Step::PageUp);
        assert_eq!(window(&dir), (0, 0, 5));
    }

    #[test]
    fn test_window_invariant_holds() {
        let steps = [Step::Down, Step::Down, Step::PageDown, Step::Up, Step::PageUp, Step::Up];
        for count in [1, 4, 5, 6, 13] {
            let mut dir = numbered(count);
            for round in 0..40 {
                dir.move_selection(steps[round % steps.len()]);
                assert!(dir.start <= dir.selected && dir.selected < dir.end);
                assert!(dir.end <= count);
                assert_eq!(dir.end - dir.start, count.min(DEFAULT_PAGE_SIZE));
            }
        }
    }

    #[test]
    fn test_moves_on_empty_are_noops() {
        let mut dir = numbered(0);
        for step in [Step::Up, Step::Down, Step::PageUp, Step::PageDown] {
            assert!(!dir.move_selection(step));
        }
        assert!(!dir.jump_alpha(AlphaJump::Next));
        assert_eq!(window(&dir), (0, 0, 0));
    }

    #[test]
    fn test_jump_alpha() {
        let mut dir = listing(
            &[
                "a1.gb", "a2.gb", "b1.gb", "b2.gb", "b3.gb", "c1.gb", "d1.gb", "d2.gb", "e1.gb",
            ],
            5,
        );
        assert!(dir.jump_alpha(AlphaJump::Next));
        assert_eq!(window(&dir), (2, 2, 7));
        dir.jump_alpha(AlphaJump::Next);
        dir.jump_alpha(AlphaJump::Next);
        assert_eq!(window(&dir), (6, 4, 9));
        dir.jump_alpha(AlphaJump::Next);
        assert_eq!(window(&dir), (8, 4, 9));
        // No bucket past the last one
        assert!(!dir.jump_alpha(AlphaJump::Next));

        dir.select(4);
        assert!(dir.jump_alpha(AlphaJump::Prev));
        assert_eq!(dir.selected, 0);
        assert_eq!((dir.start, dir.end), (0, 5));
        assert!(!dir.jump_alpha(AlphaJump::Prev));
    }

    #[test]
    fn test_jump_alpha_short_list_keeps_window() {
        let mut dir = listing(&["a.gb", "b.gb", "c.gb"], 5);
        dir.jump_alpha(AlphaJump::Next);
        assert_eq!(window(&dir), (1, 0, 3));
    }

    #[test]
    fn test_select_scrolls_into_view() {
        let mut dir = numbered(12);
        dir.select(6);
        assert_eq!(window(&dir), (6, 6, 11));
        dir.select(2);
        assert_eq!(window(&dir), (2, 2, 7));
        dir.select(4);
        assert_eq!(window(&dir), (4, 2, 7));
        dir.select(99);
        assert_eq!(dir.selected, 4);
    }

    #[test]
    fn test_accessors_follow_cursor() {
        let mut dir = listing(&["a1.gb", "a2.gb", "b1.gb", "c1.gb", "c2.gb", "d1.gb", "e1.gb"], 3);
        assert_eq!(dir.source(), &DirectorySource::Path("/r".into()));
        assert_eq!(dir.path(), Path::new("/r"));
        assert_eq!(dir.entries().len(), 7);
        assert_eq!(dir.window(), 0..3);

        assert!(dir.jump_alpha(AlphaJump::Next));
        assert_eq!(dir.selected(), 2);
        assert_eq!(dir.window(), 2..5);
        assert_eq!(dir.entries()[dir.selected()].alpha_bucket(), 1);
        assert_eq!(dir.visible().len(), dir.window().len());

        dir.jump_alpha(AlphaJump::Next);
        assert_eq!(dir.selected(), 3);
        assert_eq!(dir.selected_entry().map(|e| e.file_name()), Some("c1.gb".to_string()));
        assert!(dir.window().contains(&dir.selected()));
    }
}
