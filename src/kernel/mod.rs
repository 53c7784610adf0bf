//! Headless application core (state/action/effect).

pub mod action;
pub mod effect;
pub mod git;
pub mod palette;
pub mod services;
pub mod state;
pub mod store;
pub mod tabs;
pub mod terminal;
pub mod write_queue;

pub use action::{Action, FsOp};
pub use effect::Effect;
pub use git::{GitFileStatus, GitFileStatusKind, GitState};
pub use palette::{FileCandidate, SearchPaletteState};
pub use state::{AppState, Notice, NoticeLevel, WorkspacePhase};
pub use store::{DispatchResult, Store};
pub use tabs::{path_key, FileTab, TabRegistry};
pub use terminal::{TerminalId, TerminalSession, TerminalState};
pub use write_queue::WriteQueue;
