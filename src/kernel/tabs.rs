use std::path::{Path, PathBuf};

/// Key used for tabs opened from the tree or the search palette.
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTab {
    pub key: String,
    pub title: String,
    pub path: PathBuf,
    pub file_text: String,
    pub dirty: bool,
    /// Bumped on every edit; a save only cleans the revision it wrote.
    pub revision: u64,
}

impl FileTab {
    pub fn new(key: String, title: String, path: PathBuf, file_text: String) -> Self {
        Self {
            key,
            title,
            path,
            file_text,
            dirty: false,
            revision: 0,
        }
    }

    pub fn set_path(&mut self, path: PathBuf) {
        if let Some(name) = path.file_name() {
            self.title = name.to_string_lossy().into_owned();
        }
        self.path = path;
    }
}

/// Ordered open buffers plus the focused one.
///
/// `active` always names a tab in `tabs`, or is `None` when there are none.
#[derive(Debug, Default)]
pub struct TabRegistry {
    tabs: Vec<FileTab>,
    active: Option<String>,
}

impl TabRegistry {
    pub fn tabs(&self) -> &[FileTab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.tabs.iter().any(|t| t.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&FileTab> {
        self.tabs.iter().find(|t| t.key == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FileTab> {
        self.tabs.iter_mut().find(|t| t.key == key)
    }

    pub fn find_by_path(&self, path: &Path) -> Option<&FileTab> {
        self.tabs.iter().find(|t| t.path == path)
    }

    pub fn active_tab(&self) -> Option<&FileTab> {
        let key = self.active.as_deref()?;
        self.get(key)
    }

    pub fn activate(&mut self, key: &str) -> bool {
        if !self.contains(key) || self.active.as_deref() == Some(key) {
            return false;
        }
        self.active = Some(key.to_string());
        true
    }

    /// Appends `tab` and focuses it; an already open key is only focused.
    pub fn insert(&mut self, tab: FileTab) -> bool {
        if self.contains(&tab.key) {
            return self.activate(&tab.key);
        }
        self.active = Some(tab.key.clone());
        self.tabs.push(tab);
        true
    }

    /// Replaces the active buffer. Returns the edited tab, `None` when no tab
    /// is active.
    pub fn edit_active(&mut self, content: String) -> Option<&FileTab> {
        let key = self.active.clone()?;
        let tab = self.get_mut(&key)?;
        tab.file_text = content;
        tab.dirty = true;
        tab.revision = tab.revision.saturating_add(1);
        Some(tab)
    }

    /// Closing the active tab focuses its predecessor, or its successor when
    /// it was first, or nothing when it was the last one.
    pub fn close(&mut self, key: &str) -> Option<FileTab> {
        let index = self.tabs.iter().position(|t| t.key == key)?;
        let removed = self.tabs.remove(index);

        if self.active.as_deref() == Some(key) {
            self.active = if self.tabs.is_empty() {
                None
            } else {
                let next = index.saturating_sub(1).min(self.tabs.len() - 1);
                Some(self.tabs[next].key.clone())
            };
        }

        Some(removed)
    }

    /// Clears `dirty` if the tab is still at `revision`.
    pub fn mark_saved(&mut self, key: &str, revision: u64) -> bool {
        match self.get_mut(key) {
            Some(tab) if tab.revision == revision && tab.dirty => {
                tab.dirty = false;
                true
            }
            _ => false,
        }
    }

    /// Rewrites paths of tabs at or below `from` so they live under `to`.
    /// Tabs keyed by their path are re-keyed to the new path.
    pub fn retarget(&mut self, from: &Path, to: &Path) -> bool {
        let mut changed = false;
        for tab in &mut self.tabs {
            let Ok(rel) = tab.path.strip_prefix(from) else {
                continue;
            };
            let next = if rel.as_os_str().is_empty() {
                to.to_path_buf()
            } else {
                to.join(rel)
            };

            let old_key = path_key(&tab.path);
            if tab.key == old_key {
                let new_key = path_key(&next);
                if self.active.as_deref() == Some(old_key.as_str()) {
                    self.active = Some(new_key.clone());
                }
                tab.key = new_key;
            }
            tab.set_path(next);
            changed = true;
        }
        changed
    }

    pub fn clear(&mut self) {
        self.tabs.clear();
        self.active = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/tabs.rs"]
mod tests;
