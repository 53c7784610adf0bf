use super::{Action, AppState, Effect};

mod explorer;
mod git;
mod search;
mod tabs;
mod terminal;
mod workspace;

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed(state_changed: bool) -> Self {
        Self {
            effects: Vec::new(),
            state_changed,
        }
    }
}

/// Single owner of [`AppState`]. Every event goes through [`Store::dispatch`],
/// which runs to completion and returns the I/O it wants performed.
pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::OpenWorkspace { .. }
            | Action::CloseWorkspace
            | Action::RemoveRecentWorkspace { .. } => self.reduce_workspace_action(action),

            Action::ActivateNode { .. }
            | Action::SelectNode { .. }
            | Action::CollapseNode { .. }
            | Action::RefreshDir { .. }
            | Action::DirLoaded { .. }
            | Action::DirLoadFailed { .. }
            | Action::CreateFile { .. }
            | Action::CreateDir { .. }
            | Action::RenamePath { .. }
            | Action::DeletePath { .. }
            | Action::FsOpSucceeded { .. }
            | Action::FsOpFailed { .. } => self.reduce_explorer_action(action),

            Action::OpenFile { .. }
            | Action::FileLoaded { .. }
            | Action::FileLoadFailed { .. }
            | Action::ActivateTab { .. }
            | Action::EditActive { .. }
            | Action::CloseTab { .. }
            | Action::SaveTab { .. }
            | Action::SaveActive
            | Action::FileSaved { .. }
            | Action::FileSaveFailed { .. }
            | Action::Tick { .. } => self.reduce_tab_action(action),

            Action::GitUpdated { .. } => self.reduce_git_action(action),

            Action::SearchOpen
            | Action::SearchClose
            | Action::SearchSetQuery { .. }
            | Action::SearchMoveSelection { .. }
            | Action::SearchConfirm
            | Action::FilesScanned { .. } => self.reduce_search_action(action),

            Action::TerminalNew
            | Action::TerminalTogglePanel
            | Action::TerminalActivate { .. }
            | Action::TerminalInput { .. }
            | Action::TerminalResize { .. }
            | Action::TerminalClose { .. }
            | Action::TerminalSpawned { .. }
            | Action::TerminalSpawnFailed { .. }
            | Action::TerminalOutput { .. }
            | Action::TerminalExited { .. } => self.reduce_terminal_action(action),

            Action::DismissNotice => DispatchResult::changed(self.state.last_error.take().is_some()),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation == self.state.generation {
            return true;
        }
        tracing::debug!(
            generation,
            current = self.state.generation,
            "dropping reply for a replaced workspace"
        );
        false
    }

    fn require_workspace(&mut self, what: &str) -> bool {
        if self.state.phase.is_open() {
            return true;
        }
        self.state
            .push_error(format!("Open a folder before trying to {what}"));
        false
    }

    fn git_refresh_effect(&self) -> Option<Effect> {
        let root = self.state.git.repo_root.clone()?;
        Some(Effect::GitRefresh {
            generation: self.state.generation,
            root,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
