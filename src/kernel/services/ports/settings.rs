use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MAX_RECENT_WORKSPACES: usize = 10;
pub const MAX_RECENT_FILES: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub workspace: WorkspaceSettings,
    #[serde(default)]
    pub recent_files: Vec<PathBuf>,
    #[serde(default)]
    pub editor: EditorSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_path: Option<PathBuf>,
    #[serde(default)]
    pub recent_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default = "default_font_size")]
    pub font_size: u16,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// 0 disables write-on-edit.
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,
}

fn default_font_size() -> u16 {
    14
}

fn default_theme() -> String {
    "system".to_string()
}

fn default_autosave_delay_ms() -> u64 {
    1000
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            theme: default_theme(),
            autosave_delay_ms: default_autosave_delay_ms(),
        }
    }
}

impl EditorSettings {
    pub fn autosave_delay(&self) -> Option<Duration> {
        (self.autosave_delay_ms > 0).then(|| Duration::from_millis(self.autosave_delay_ms))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workspace: WorkspaceSettings::default(),
            recent_files: Vec::new(),
            editor: EditorSettings::default(),
        }
    }
}

impl Settings {
    pub fn set_current_workspace(&mut self, path: &Path) {
        self.workspace.current_path = Some(path.to_path_buf());
        push_recent(
            &mut self.workspace.recent_paths,
            path,
            MAX_RECENT_WORKSPACES,
        );
    }

    pub fn clear_current_workspace(&mut self) {
        self.workspace.current_path = None;
    }

    pub fn recent_workspaces(&self) -> &[PathBuf] {
        &self.workspace.recent_paths
    }

    pub fn remove_recent_workspace(&mut self, path: &Path) -> bool {
        let before = self.workspace.recent_paths.len();
        self.workspace.recent_paths.retain(|p| p != path);
        before != self.workspace.recent_paths.len()
    }

    pub fn add_recent_file(&mut self, path: &Path) {
        push_recent(&mut self.recent_files, path, MAX_RECENT_FILES);
    }
}

/// Newest first, de-duplicated, truncated to `limit`.
fn push_recent(list: &mut Vec<PathBuf>, path: &Path, limit: usize) {
    list.retain(|p| p != path);
    list.insert(0, path.to_path_buf());
    list.truncate(limit);
}
