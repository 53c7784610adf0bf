use std::path::PathBuf;

use crate::kernel::services::ports::Settings;
use crate::kernel::terminal::TerminalId;

/// I/O the kernel asks the host to perform. `generation` is echoed back in
/// the reply so answers for a replaced workspace can be discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadDir {
        generation: u64,
        path: PathBuf,
    },
    LoadFile {
        generation: u64,
        key: String,
        title: String,
        path: PathBuf,
    },
    WriteFile {
        generation: u64,
        key: String,
        path: PathBuf,
        content: String,
        revision: u64,
    },
    CreateFile {
        generation: u64,
        path: PathBuf,
    },
    CreateDir {
        generation: u64,
        path: PathBuf,
    },
    RenamePath {
        generation: u64,
        from: PathBuf,
        to: PathBuf,
    },
    DeletePath {
        generation: u64,
        path: PathBuf,
        is_dir: bool,
    },
    PersistSettings(Settings),
    GitRefresh {
        generation: u64,
        root: PathBuf,
    },
    ScanFiles {
        generation: u64,
        root: PathBuf,
    },
    TerminalSpawn {
        id: TerminalId,
        cwd: PathBuf,
        cols: u16,
        rows: u16,
    },
    TerminalWrite {
        id: TerminalId,
        bytes: Vec<u8>,
    },
    TerminalResize {
        id: TerminalId,
        cols: u16,
        rows: u16,
    },
    TerminalKill {
        id: TerminalId,
    },
}
