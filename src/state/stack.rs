//! Stack of open directories, root at the bottom

use super::directory::Directory;

#[derive(Debug)]
pub struct NavigationStack {
    /// Never empty
    dirs: Vec<Directory>,
}

impl NavigationStack {
    pub fn new(root: Directory) -> Self {
        Self { dirs: vec![root] }
    }

    /// Currently displayed directory
    pub fn top(&self) -> &Directory {
        // The root is never popped
        &self.dirs[self.dirs.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut Directory {
        let last = self.dirs.len() - 1;
        &mut self.dirs[last]
    }

    pub fn depth(&self) -> usize {
        self.dirs.len()
    }

    /// Whether "back" is available
    pub fn can_ascend(&self) -> bool {
        self.dirs.len() > 1
    }

    pub fn push(&mut self, dir: Directory) {
        self.dirs.push(dir);
    }

    /// Drop the top directory. Refuses to pop the root.
    pub fn ascend(&mut self) -> bool {
        if !self.can_ascend() {
            return false;
        }
        self.dirs.pop();
        true
    }
}
