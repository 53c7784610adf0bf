use std::path::PathBuf;

use super::DispatchResult;
use crate::kernel::state::WorkspacePhase;
use crate::kernel::{Action, Effect};
use crate::models::FileTree;

impl super::Store {
    pub(super) fn reduce_workspace_action(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::OpenWorkspace { path } => self.open_workspace(path),
            Action::CloseWorkspace => self.close_workspace(),
            Action::RemoveRecentWorkspace { path } => {
                if !self.state.settings.remove_recent_workspace(&path) {
                    return DispatchResult::unchanged();
                }
                DispatchResult {
                    effects: vec![Effect::PersistSettings(self.state.settings.clone())],
                    state_changed: true,
                }
            }
            _ => unreachable!("non-workspace action passed to reduce_workspace_action"),
        }
    }

    fn open_workspace(&mut self, path: PathBuf) -> DispatchResult {
        let mut effects = self.flush_pending_writes();
        self.reset_workspace();

        self.state.generation += 1;
        self.state.phase = WorkspacePhase::Loading { root: path.clone() };
        self.state.tree = Some(FileTree::new(path.clone()));
        self.state.last_error = None;

        tracing::info!(
            root = %path.display(),
            generation = self.state.generation,
            "opening workspace"
        );

        effects.push(Effect::LoadDir {
            generation: self.state.generation,
            path,
        });
        DispatchResult {
            effects,
            state_changed: true,
        }
    }

    fn close_workspace(&mut self) -> DispatchResult {
        if self.state.phase == WorkspacePhase::NoWorkspace {
            return DispatchResult::unchanged();
        }

        let mut effects = self.flush_pending_writes();
        self.reset_workspace();
        self.state.generation += 1;
        self.state.phase = WorkspacePhase::NoWorkspace;
        self.state.settings.clear_current_workspace();

        tracing::info!(generation = self.state.generation, "workspace closed");

        effects.push(Effect::PersistSettings(self.state.settings.clone()));
        DispatchResult {
            effects,
            state_changed: true,
        }
    }

    /// Root listing arrived while loading: the workspace becomes open.
    pub(super) fn finish_workspace_open(
        &mut self,
        root: PathBuf,
        entries: Vec<crate::kernel::services::ports::DirEntryInfo>,
    ) -> DispatchResult {
        let Some(tree) = self.state.tree.as_mut() else {
            return DispatchResult::unchanged();
        };
        if let Err(e) = tree.apply_listing(&root, entries) {
            tracing::warn!(root = %root.display(), error = %e, "root listing did not apply");
            return self.fail_workspace_open(root, e.to_string());
        }
        let root_id = tree.root();
        tree.set_selected(Some(root_id));

        self.state.phase = WorkspacePhase::Open { root: root.clone() };
        self.state.settings.set_current_workspace(&root);

        tracing::info!(
            root = %root.display(),
            entries = tree.top_level().len(),
            "workspace open"
        );

        DispatchResult {
            effects: vec![
                Effect::PersistSettings(self.state.settings.clone()),
                Effect::GitRefresh {
                    generation: self.state.generation,
                    root,
                },
            ],
            state_changed: true,
        }
    }

    pub(super) fn fail_workspace_open(&mut self, root: PathBuf, error: String) -> DispatchResult {
        tracing::warn!(root = %root.display(), error = %error, "failed to open workspace");
        self.reset_workspace();
        self.state.generation += 1;
        self.state.phase = WorkspacePhase::NoWorkspace;
        self.state
            .push_error(format!("Failed to open folder {}: {error}", root.display()));
        DispatchResult::changed(true)
    }

    /// Tree and tabs are always emptied together. Writes already issued are
    /// left to finish; a rerun queued behind one keeps its buffer's content.
    fn reset_workspace(&mut self) {
        let state = &mut self.state;
        for tab in state.tabs.tabs() {
            state.writes.detach(&tab.path, tab.file_text.clone());
        }
        state.tree = None;
        state.tabs.clear();
        self.state.pending_opens.clear();
        self.state.git.clear();
        self.state.search.reset();
    }

    /// Writes every buffer whose debounced save has not fired yet.
    fn flush_pending_writes(&mut self) -> Vec<Effect> {
        let pending: Vec<PathBuf> = self
            .state
            .tabs
            .tabs()
            .iter()
            .filter(|tab| self.state.writes.has_pending(&tab.path))
            .map(|tab| tab.path.clone())
            .collect();

        pending
            .into_iter()
            .flat_map(|path| self.flush_path(&path))
            .collect()
    }
}
