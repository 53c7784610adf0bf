use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::kernel::git::GitState;
use crate::kernel::palette::SearchPaletteState;
use crate::kernel::services::ports::Settings;
use crate::kernel::tabs::TabRegistry;
use crate::kernel::terminal::TerminalState;
use crate::kernel::write_queue::WriteQueue;
use crate::models::FileTree;

const MAX_NOTICES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspacePhase {
    NoWorkspace,
    Loading { root: PathBuf },
    Open { root: PathBuf },
}

impl WorkspacePhase {
    pub fn root(&self) -> Option<&Path> {
        match self {
            WorkspacePhase::NoWorkspace => None,
            WorkspacePhase::Loading { root } | WorkspacePhase::Open { root } => Some(root),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, WorkspacePhase::Open { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub seq: u64,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug)]
pub struct AppState {
    pub phase: WorkspacePhase,
    /// Bumped whenever the workspace is opened or closed; I/O replies tagged
    /// with an older value are dropped.
    pub generation: u64,
    pub tree: Option<FileTree>,
    pub tabs: TabRegistry,
    pub writes: WriteQueue,
    /// Keys with a read in flight, so repeated opens do not re-read.
    pub pending_opens: FxHashSet<String>,
    pub git: GitState,
    pub terminal: TerminalState,
    pub search: SearchPaletteState,
    pub settings: Settings,
    pub last_error: Option<String>,
    pub notices: VecDeque<Notice>,
    next_notice_seq: u64,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            phase: WorkspacePhase::NoWorkspace,
            generation: 0,
            tree: None,
            tabs: TabRegistry::default(),
            writes: WriteQueue::default(),
            pending_opens: FxHashSet::default(),
            git: GitState::default(),
            terminal: TerminalState::default(),
            search: SearchPaletteState::default(),
            settings,
            last_error: None,
            notices: VecDeque::new(),
            next_notice_seq: 1,
        }
    }

    pub fn is_folder_open(&self) -> bool {
        self.phase.is_open()
    }

    pub fn workspace_root(&self) -> Option<&Path> {
        self.phase.root()
    }

    pub fn root_directory_name(&self) -> &str {
        match (&self.phase, &self.tree) {
            (WorkspacePhase::Open { .. }, Some(tree)) => tree.root_title(),
            _ => "",
        }
    }

    pub fn push_error(&mut self, message: String) {
        self.last_error = Some(message.clone());
        self.push_notice(NoticeLevel::Error, message);
    }

    pub fn push_notice(&mut self, level: NoticeLevel, message: String) {
        if self.notices.len() == MAX_NOTICES {
            self.notices.pop_front();
        }
        let seq = self.next_notice_seq;
        self.next_notice_seq += 1;
        self.notices.push_back(Notice {
            seq,
            level,
            message,
        });
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
