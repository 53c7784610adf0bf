use crate::kernel::palette::FileCandidate;
use crate::kernel::services::adapters::git::GitSnapshot;
use crate::kernel::services::ports::DirEntryInfo;
use crate::kernel::{Action, FsOp, TerminalId};
use std::path::PathBuf;

/// Replies from the runtime. `generation` is echoed from the effect that
/// started the work.
#[derive(Debug)]
pub enum AppMessage {
    DirLoaded {
        generation: u64,
        path: PathBuf,
        entries: Vec<DirEntryInfo>,
    },
    DirLoadError {
        generation: u64,
        path: PathBuf,
        error: String,
    },
    FileLoaded {
        generation: u64,
        key: String,
        title: String,
        path: PathBuf,
        content: String,
    },
    FileError {
        generation: u64,
        key: String,
        path: PathBuf,
        error: String,
    },
    FileSaved {
        generation: u64,
        key: String,
        path: PathBuf,
        revision: u64,
    },
    FileSaveError {
        generation: u64,
        key: String,
        path: PathBuf,
        error: String,
    },
    FsOpDone {
        generation: u64,
        op: FsOp,
        path: PathBuf,
        to: Option<PathBuf>,
    },
    FsOpError {
        generation: u64,
        op: FsOp,
        path: PathBuf,
        error: String,
    },
    GitUpdated {
        generation: u64,
        snapshot: GitSnapshot,
    },
    FilesScanned {
        generation: u64,
        files: Vec<FileCandidate>,
    },
    SettingsSaveError {
        error: String,
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
}

impl AppMessage {
    /// The kernel action this reply maps to. Settings failures have none;
    /// they are only logged.
    pub fn into_action(self) -> Option<Action> {
        let action = match self {
            AppMessage::DirLoaded {
                generation,
                path,
                entries,
            } => Action::DirLoaded {
                generation,
                path,
                entries,
            },
            AppMessage::DirLoadError {
                generation,
                path,
                error,
            } => Action::DirLoadFailed {
                generation,
                path,
                error,
            },
            AppMessage::FileLoaded {
                generation,
                key,
                title,
                path,
                content,
            } => Action::FileLoaded {
                generation,
                key,
                title,
                path,
                content,
            },
            AppMessage::FileError {
                generation,
                key,
                path,
                error,
            } => Action::FileLoadFailed {
                generation,
                key,
                path,
                error,
            },
            AppMessage::FileSaved {
                generation,
                key,
                path,
                revision,
            } => Action::FileSaved {
                generation,
                key,
                path,
                revision,
            },
            AppMessage::FileSaveError {
                generation,
                key,
                path,
                error,
            } => Action::FileSaveFailed {
                generation,
                key,
                path,
                error,
            },
            AppMessage::FsOpDone {
                generation,
                op,
                path,
                to,
            } => Action::FsOpSucceeded {
                generation,
                op,
                path,
                to,
            },
            AppMessage::FsOpError {
                generation,
                op,
                path,
                error,
            } => Action::FsOpFailed {
                generation,
                op,
                path,
                error,
            },
            AppMessage::GitUpdated {
                generation,
                snapshot,
            } => Action::GitUpdated {
                generation,
                root: snapshot.root,
                branch: snapshot.branch,
                branches: snapshot.branches,
                statuses: snapshot.statuses,
            },
            AppMessage::FilesScanned { generation, files } => {
                Action::FilesScanned { generation, files }
            }
            AppMessage::SettingsSaveError { error } => {
                tracing::warn!(error = %error, "failed to persist settings");
                return None;
            }
            AppMessage::TerminalSpawned { id, title } => Action::TerminalSpawned { id, title },
            AppMessage::TerminalSpawnFailed { id, error } => {
                Action::TerminalSpawnFailed { id, error }
            }
            AppMessage::TerminalOutput { id, bytes } => Action::TerminalOutput { id, bytes },
            AppMessage::TerminalExited { id, code } => Action::TerminalExited { id, code },
        };
        Some(action)
    }
}
