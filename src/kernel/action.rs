use std::path::PathBuf;
use std::time::Instant;

use crate::kernel::git::GitFileStatus;
use crate::kernel::palette::FileCandidate;
use crate::kernel::services::ports::DirEntryInfo;
use crate::kernel::terminal::TerminalId;
use crate::models::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    CreateFile,
    CreateDir,
    Rename,
    Delete,
}

impl FsOp {
    pub fn label(self) -> &'static str {
        match self {
            FsOp::CreateFile => "create file",
            FsOp::CreateDir => "create folder",
            FsOp::Rename => "rename",
            FsOp::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // workspace
    OpenWorkspace {
        path: PathBuf,
    },
    CloseWorkspace,
    RemoveRecentWorkspace {
        path: PathBuf,
    },

    // explorer
    ActivateNode {
        id: NodeId,
    },
    SelectNode {
        id: Option<NodeId>,
    },
    CollapseNode {
        id: NodeId,
    },
    RefreshDir {
        path: PathBuf,
    },
    DirLoaded {
        generation: u64,
        path: PathBuf,
        entries: Vec<DirEntryInfo>,
    },
    DirLoadFailed {
        generation: u64,
        path: PathBuf,
        error: String,
    },

    // file operations
    CreateFile {
        parent: PathBuf,
        name: String,
    },
    CreateDir {
        parent: PathBuf,
        name: String,
    },
    RenamePath {
        from: PathBuf,
        to: PathBuf,
    },
    DeletePath {
        path: PathBuf,
        is_dir: bool,
    },
    FsOpSucceeded {
        generation: u64,
        op: FsOp,
        path: PathBuf,
        to: Option<PathBuf>,
    },
    FsOpFailed {
        generation: u64,
        op: FsOp,
        path: PathBuf,
        error: String,
    },

    // tabs
    OpenFile {
        key: String,
        title: String,
        path: PathBuf,
    },
    FileLoaded {
        generation: u64,
        key: String,
        title: String,
        path: PathBuf,
        content: String,
    },
    FileLoadFailed {
        generation: u64,
        key: String,
        path: PathBuf,
        error: String,
    },
    ActivateTab {
        key: String,
    },
    EditActive {
        content: String,
        now: Instant,
    },
    CloseTab {
        key: String,
    },
    SaveTab {
        key: String,
    },
    SaveActive,
    FileSaved {
        generation: u64,
        key: String,
        path: PathBuf,
        revision: u64,
    },
    FileSaveFailed {
        generation: u64,
        key: String,
        path: PathBuf,
        error: String,
    },
    Tick {
        now: Instant,
    },

    // vcs
    GitUpdated {
        generation: u64,
        root: PathBuf,
        branch: Option<String>,
        branches: Vec<String>,
        statuses: Vec<(PathBuf, GitFileStatus)>,
    },

    // search palette
    SearchOpen,
    SearchClose,
    SearchSetQuery {
        query: String,
    },
    SearchMoveSelection {
        delta: isize,
    },
    SearchConfirm,
    FilesScanned {
        generation: u64,
        files: Vec<FileCandidate>,
    },

    // terminal
    TerminalNew,
    TerminalTogglePanel,
    TerminalActivate {
        id: TerminalId,
    },
    TerminalInput {
        id: TerminalId,
        bytes: Vec<u8>,
    },
    TerminalResize {
        id: TerminalId,
        cols: u16,
        rows: u16,
    },
    TerminalClose {
        id: TerminalId,
    },
    TerminalSpawned {
        id: TerminalId,
        title: String,
    },
    TerminalSpawnFailed {
        id: TerminalId,
        error: String,
    },
    TerminalOutput {
        id: TerminalId,
        bytes: Vec<u8>,
    },
    TerminalExited {
        id: TerminalId,
        code: Option<i32>,
    },

    DismissNotice,
}
