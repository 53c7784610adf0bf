use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitFileStatusKind {
    Modified,
    Added,
    Deleted,
    Untracked,
    Conflict,
}

impl GitFileStatusKind {
    pub fn marker(self) -> char {
        match self {
            Self::Modified => 'M',
            Self::Added => 'A',
            Self::Deleted => 'D',
            Self::Untracked => '?',
            Self::Conflict => 'U',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GitFileStatus {
    pub index: Option<GitFileStatusKind>,
    pub worktree: Option<GitFileStatusKind>,
}

impl GitFileStatus {
    pub fn primary_kind(&self) -> Option<GitFileStatusKind> {
        use GitFileStatusKind::*;
        [Conflict, Untracked, Added, Deleted, Modified]
            .into_iter()
            .find(|kind| self.index == Some(*kind) || self.worktree == Some(*kind))
    }
}

/// What the status bar and explorer show about version control. Everything
/// empty means "no VCS info"; git failures never surface as errors.
#[derive(Debug, Default)]
pub struct GitState {
    pub repo_root: Option<PathBuf>,
    pub branch: Option<String>,
    pub branches: Vec<String>,
    pub file_status: FxHashMap<PathBuf, GitFileStatus>,
}

impl GitState {
    pub fn is_repo(&self) -> bool {
        self.repo_root.is_some()
    }

    pub fn status_of(&self, path: &Path) -> Option<GitFileStatus> {
        self.file_status.get(path).copied()
    }

    pub fn clear(&mut self) -> bool {
        let had_info = self.repo_root.is_some()
            || self.branch.is_some()
            || !self.branches.is_empty()
            || !self.file_status.is_empty();
        self.repo_root = None;
        self.branch = None;
        self.branches.clear();
        self.file_status.clear();
        had_info
    }
}
