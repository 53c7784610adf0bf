//! Quick-open palette over the workspace's files.

use std::path::{Path, PathBuf};

pub const MAX_RESULTS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub name: String,
    name_lc: String,
    rel_lc: String,
}

impl FileCandidate {
    pub fn new(root: &Path, path: PathBuf, name: String) -> Self {
        let rel_lc = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .to_lowercase();
        Self {
            name_lc: name.to_lowercase(),
            rel_lc,
            path,
            name,
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchPaletteState {
    pub visible: bool,
    pub scanning: bool,
    pub query: String,
    pub selected: usize,
    candidates: Vec<FileCandidate>,
    matches: Vec<usize>,
}

impl SearchPaletteState {
    pub fn open(&mut self) -> bool {
        let was_visible = self.visible;
        self.reset();
        self.visible = true;
        self.scanning = true;
        !was_visible
    }

    pub fn close(&mut self) -> bool {
        let was_visible = self.visible;
        self.reset();
        was_visible
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_candidates(&mut self, candidates: Vec<FileCandidate>) -> bool {
        if !self.visible {
            return false;
        }
        self.candidates = candidates;
        self.scanning = false;
        self.refilter();
        true
    }

    pub fn set_query(&mut self, query: String) -> bool {
        if !self.visible || self.query == query {
            return false;
        }
        self.query = query;
        self.refilter();
        true
    }

    pub fn move_selection(&mut self, delta: isize) -> bool {
        if self.matches.is_empty() || delta == 0 {
            return false;
        }
        let last = self.matches.len() - 1;
        let next = if delta < 0 {
            self.selected.saturating_sub(delta.unsigned_abs())
        } else {
            self.selected.saturating_add(delta.unsigned_abs()).min(last)
        };
        let changed = next != self.selected;
        self.selected = next;
        changed
    }

    pub fn matches(&self) -> impl Iterator<Item = &FileCandidate> {
        self.matches.iter().filter_map(|i| self.candidates.get(*i))
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn selected_item(&self) -> Option<&FileCandidate> {
        let index = *self.matches.get(self.selected)?;
        self.candidates.get(index)
    }

    fn refilter(&mut self) {
        self.matches = match_indices(&self.candidates, &self.query);
        self.selected = 0;
    }
}

/// Name hits rank before path-only hits; each group keeps scan order.
pub fn match_indices(candidates: &[FileCandidate], query: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..candidates.len().min(MAX_RESULTS)).collect();
    }

    let query_lc = query.to_lowercase();
    let mut by_name = Vec::new();
    let mut by_path = Vec::new();
    for (i, candidate) in candidates.iter().enumerate() {
        if candidate.name_lc.contains(&query_lc) {
            by_name.push(i);
        } else if candidate.rel_lc.contains(&query_lc) {
            by_path.push(i);
        }
    }

    by_name.extend(by_path);
    by_name.truncate(MAX_RESULTS);
    by_name
}
