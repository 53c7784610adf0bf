//! Service ports: traits + data contracts.

pub mod file;
pub mod settings;

pub use file::{
    compare_entries, sort_entries, validate_name, DirEntryInfo, FileError, FileProvider,
    Result as FileResult,
};
pub use settings::{EditorSettings, Settings, WorkspaceSettings};
