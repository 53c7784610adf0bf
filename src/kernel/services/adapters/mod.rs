//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod file;
pub mod git;
pub mod paths;
#[cfg(feature = "terminal")]
pub mod pty;
pub mod runtime;
pub mod scan;
pub mod settings;

pub use file::LocalFileProvider;
pub use git::GitSnapshot;
pub use paths::{ensure_log_dir, get_config_dir, get_log_dir};
pub use runtime::{AppMessage, AsyncRuntime};
pub use scan::scan_files;
pub use settings::{get_settings_path, SettingsError, SettingsStore};
