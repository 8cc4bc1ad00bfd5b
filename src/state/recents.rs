use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AppResult;
use crate::fs::ops::exists;

/// Upper bound on remembered launches
pub const MAX_RECENTS: usize = 15;

/// Most-recently-launched paths, newest first, persisted one per line
#[derive(Debug)]
pub struct RecentsStore {
    /// Distinct paths, newest first
    entries: Vec<PathBuf>,
    /// Backing file
    file: PathBuf,
}

impl RecentsStore {
    /// Load from disk. Lines naming paths that no longer exist are dropped;
    /// the file itself is only rewritten by the next [`touch`](Self::touch).
    pub fn load(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let entries = match fs::read_to_string(&file) {
            Ok(content) => parse(&content),
            Err(e) => {
                log::debug!("no recents at {}: {}", file.display(), e);
                Vec::new()
            }
        };
        Self { entries, file }
    }

    /// Record a launch: move `path` to the front (evicting the oldest entry
    /// when a new path arrives at capacity), then persist
    pub fn touch(&mut self, path: &Path) -> AppResult<()> {
        match self.entries.iter().position(|p| p == path) {
            Some(0) => {}
            Some(index) => {
                let existing = self.entries.remove(index);
                self.entries.insert(0, existing);
            }
            None => {
                self.entries.truncate(MAX_RECENTS - 1);
                self.entries.insert(0, path.to_path_buf());
            }
        }
        self.save()
    }

    /// Rewrite the backing file, newest first, one path per line
    pub fn save(&self) -> AppResult<()> {
        if let Some(dir) = self.file.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut content = String::new();
        for path in &self.entries {
            content.push_str(&path.to_string_lossy());
            content.push('\n');
        }
        fs::write(&self.file, content)?;
        Ok(())
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.entries
    }
}

/// Keep existing, non-empty, distinct lines up to capacity
fn parse(content: &str) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = Vec::new();
    for line in content.lines() {
        if entries.len() >= MAX_RECENTS {
            break;
        }
        if line.is_empty() {
            continue;
        }
        let path = PathBuf::from(line);
        if exists(&path) && !entries.contains(&path) {
            entries.push(path);
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(count: usize) -> (TempDir, Vec<PathBuf>) {
        let tmp = TempDir::new().unwrap();
        let paths = (0..count)
            .map(|i| {
                let path = tmp.path().join(format!("game{:02}.gb", i));
                fs::write(&path, b"rom").unwrap();
                path
            })
            .collect();
        (tmp, paths)
    }

    fn file_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn test_load_drops_missing_and_blank_lines() {
        let (tmp, paths) = fixture(2);
        let file = tmp.path().join("recent.txt");
        let content = format!(
            "{}\n\n{}\n{}\n",
            paths[1].display(),
            tmp.path().join("deleted.gb").display(),
            paths[0].display()
        );
        fs::write(&file, &content).unwrap();

        let store = RecentsStore::load(&file);
        assert_eq!(store.paths(), &[paths[1].clone(), paths[0].clone()]);
        // Untouched until the next save
        assert_eq!(fs::read_to_string(&file).unwrap(), content);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = RecentsStore::load(tmp.path().join("recent.txt"));
        assert!(store.paths().is_empty());
    }

    #[test]
    fn test_load_caps_at_capacity() {
        let (tmp, paths) = fixture(20);
        let file = tmp.path().join("recent.txt");
        let content: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        fs::write(&file, content.join("\n")).unwrap();

        let store = RecentsStore::load(&file);
        assert_eq!(store.paths().len(), MAX_RECENTS);
        assert_eq!(store.paths()[0], paths[0]);
    }

    #[test]
    fn test_touch_new_path_goes_first_and_persists() {
        let (tmp, paths) = fixture(2);
        let file = tmp.path().join("recent.txt");
        let mut store = RecentsStore::load(&file);
        store.touch(&paths[0]).unwrap();
        store.touch(&paths[1]).unwrap();

        assert_eq!(store.paths(), &[paths[1].clone(), paths[0].clone()]);
        assert_eq!(
            file_lines(&file),
            vec![paths[1].display().to_string(), paths[0].display().to_string()]
        );
        assert!(fs::read_to_string(&file).unwrap().ends_with('\n'));
    }

    #[test]
    fn test_touch_existing_moves_to_front_without_growing() {
        let (tmp, paths) = fixture(4);
        let mut store = RecentsStore::load(tmp.path().join("recent.txt"));
        for path in &paths {
            store.touch(path).unwrap();
        }
        // Newest first: 3, 2, 1, 0
        store.touch(&paths[1]).unwrap();
        assert_eq!(
            store.paths(),
            &[paths[1].clone(), paths[3].clone(), paths[2].clone(), paths[0].clone()]
        );
        store.touch(&paths[1]).unwrap();
        assert_eq!(store.paths().len(), 4);
        assert_eq!(store.paths()[0], paths[1]);
    }

    #[test]
    fn test_touch_at_capacity_evicts_oldest() {
        let (tmp, paths) = fixture(MAX_RECENTS + 1);
        let file = tmp.path().join("recent.txt");
        let mut store = RecentsStore::load(&file);
        for path in &paths[..MAX_RECENTS] {
            store.touch(path).unwrap();
        }
        assert_eq!(store.paths().len(), MAX_RECENTS);
        assert_eq!(store.paths()[MAX_RECENTS - 1], paths[0]);

        store.touch(&paths[MAX_RECENTS]).unwrap();
        assert_eq!(store.paths().len(), MAX_RECENTS);
        assert_eq!(store.paths()[0], paths[MAX_RECENTS]);
        assert!(!store.paths().contains(&paths[0]));
        assert_eq!(store.paths()[MAX_RECENTS - 1], paths[1]);
        assert_eq!(file_lines(&file).len(), MAX_RECENTS);
    }

    #[test]
    fn test_round_trip_through_file() {
        let (tmp, paths) = fixture(3);
        let file = tmp.path().join("recent.txt");
        let mut store = RecentsStore::load(&file);
        for path in &paths {
            store.touch(path).unwrap();
        }
        let reloaded = RecentsStore::load(&file);
        assert_eq!(reloaded.paths(), store.paths());
    }
}
