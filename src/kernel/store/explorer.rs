use std::path::{Path, PathBuf};

use crate::kernel::services::ports::validate_name;
use crate::kernel::state::WorkspacePhase;
use crate::kernel::tabs::path_key;
use crate::kernel::{Action, Effect, FsOp};
use crate::models::{LoadState, NodeKind};

impl super::Store {
    pub(super) fn reduce_explorer_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::ActivateNode { id } => self.activate_node(id),
            Action::SelectNode { id } => super::DispatchResult {
                effects: Vec::new(),
                state_changed: self
                    .state
                    .tree
                    .as_mut()
                    .is_some_and(|tree| tree.set_selected(id)),
            },
            Action::CollapseNode { id } => super::DispatchResult {
                effects: Vec::new(),
                state_changed: self
                    .state
                    .tree
                    .as_mut()
                    .is_some_and(|tree| tree.collapse(id)),
            },
            Action::RefreshDir { path } => super::DispatchResult {
                effects: self.refresh_dir_effect(&path).into_iter().collect(),
                state_changed: false,
            },
            Action::DirLoaded {
                generation,
                path,
                entries,
            } => {
                if !self.is_current(generation) {
                    return super::DispatchResult::unchanged();
                }
                if let WorkspacePhase::Loading { root } = &self.state.phase {
                    if *root == path {
                        let root = root.clone();
                        return self.finish_workspace_open(root, entries);
                    }
                }

                let Some(tree) = self.state.tree.as_mut() else {
                    return super::DispatchResult::unchanged();
                };
                match tree.apply_listing(&path, entries) {
                    Ok(_) => super::DispatchResult::changed(true),
                    Err(e) => {
                        tracing::debug!(path = %path.display(), error = %e, "listing dropped");
                        super::DispatchResult::unchanged()
                    }
                }
            }
            Action::DirLoadFailed {
                generation,
                path,
                error,
            } => {
                if !self.is_current(generation) {
                    return super::DispatchResult::unchanged();
                }
                if let WorkspacePhase::Loading { root } = &self.state.phase {
                    if *root == path {
                        let root = root.clone();
                        return self.fail_workspace_open(root, error);
                    }
                }

                let Some(tree) = self.state.tree.as_mut() else {
                    return super::DispatchResult::unchanged();
                };
                let Some(id) = tree.find_by_path(&path) else {
                    return super::DispatchResult::unchanged();
                };
                tree.set_load_state(id, LoadState::Failed);
                tree.collapse(id);
                tracing::warn!(path = %path.display(), error = %error, "read_dir failed");
                self.state.push_error(format!(
                    "Failed to read folder {}: {error}",
                    path.display()
                ));
                super::DispatchResult::changed(true)
            }

            Action::CreateFile { parent, name } => self.request_create(parent, name, FsOp::CreateFile),
            Action::CreateDir { parent, name } => self.request_create(parent, name, FsOp::CreateDir),
            Action::RenamePath { from, to } => {
                if !self.require_workspace("rename") {
                    return super::DispatchResult::changed(true);
                }
                if from == to {
                    return super::DispatchResult::unchanged();
                }
                if let Some(name) = to.file_name().and_then(|n| n.to_str()) {
                    if let Err(e) = validate_name(name) {
                        self.state.push_error(format!("Failed to rename: {e}"));
                        return super::DispatchResult::changed(true);
                    }
                }
                super::DispatchResult {
                    effects: vec![Effect::RenamePath {
                        generation: self.state.generation,
                        from,
                        to,
                    }],
                    state_changed: false,
                }
            }
            Action::DeletePath { path, is_dir } => {
                if !self.require_workspace("delete") {
                    return super::DispatchResult::changed(true);
                }
                if self.state.workspace_root() == Some(path.as_path()) {
                    self.state
                        .push_error("The workspace folder itself cannot be deleted".to_string());
                    return super::DispatchResult::changed(true);
                }
                super::DispatchResult {
                    effects: vec![Effect::DeletePath {
                        generation: self.state.generation,
                        path,
                        is_dir,
                    }],
                    state_changed: false,
                }
            }
            Action::FsOpSucceeded {
                generation,
                op,
                path,
                to,
            } => {
                if !self.is_current(generation) {
                    return super::DispatchResult::unchanged();
                }
                self.finish_fs_op(op, path, to)
            }
            Action::FsOpFailed {
                generation,
                op,
                path,
                error,
            } => {
                if !self.is_current(generation) {
                    return super::DispatchResult::unchanged();
                }
                tracing::warn!(op = op.label(), path = %path.display(), error = %error, "file operation failed");
                self.state
                    .push_error(format!("Failed to {}: {error}", op.label()));
                super::DispatchResult::changed(true)
            }
            _ => unreachable!("non-explorer action passed to reduce_explorer_action"),
        }
    }

    fn activate_node(&mut self, id: crate::models::NodeId) -> super::DispatchResult {
        let generation = self.state.generation;
        let Some(tree) = self.state.tree.as_mut() else {
            return super::DispatchResult::unchanged();
        };
        let Some(node) = tree.node(id) else {
            return super::DispatchResult::unchanged();
        };
        let path = node.path.clone();
        let title = node.title.clone();
        let kind = node.kind;
        let load_state = node.load_state();

        let mut state_changed = tree.set_selected(Some(id));

        if kind == NodeKind::File {
            let open = self.open_file(path_key(&path), title, path);
            return super::DispatchResult {
                effects: open.effects,
                state_changed: state_changed || open.state_changed,
            };
        }

        if tree.is_expanded(id) && id != tree.root() {
            state_changed |= tree.collapse(id);
            return super::DispatchResult::changed(state_changed);
        }

        state_changed |= tree.expand(id);
        let effects = match load_state {
            LoadState::NotLoaded | LoadState::Failed => {
                tree.set_load_state(id, LoadState::Loading);
                state_changed = true;
                vec![Effect::LoadDir { generation, path }]
            }
            LoadState::Loading | LoadState::Loaded => Vec::new(),
        };
        super::DispatchResult {
            effects,
            state_changed,
        }
    }

    /// A fresh listing request for `dir` if it is in the tree and has been
    /// listed before. Unlisted directories will be read on first expand.
    pub(super) fn refresh_dir_effect(&self, dir: &Path) -> Option<Effect> {
        let tree = self.state.tree.as_ref()?;
        let id = tree.find_by_path(dir)?;
        if !tree.is_dir(id) || tree.load_state(id)? == LoadState::NotLoaded {
            return None;
        }
        Some(Effect::LoadDir {
            generation: self.state.generation,
            path: dir.to_path_buf(),
        })
    }

    fn request_create(&mut self, parent: PathBuf, name: String, op: FsOp) -> super::DispatchResult {
        if !self.require_workspace(op.label()) {
            return super::DispatchResult::changed(true);
        }
        let name = name.trim();
        if let Err(e) = validate_name(name) {
            self.state.push_error(format!("Failed to {}: {e}", op.label()));
            return super::DispatchResult::changed(true);
        }

        let generation = self.state.generation;
        let path = parent.join(name);
        let effect = match op {
            FsOp::CreateDir => Effect::CreateDir { generation, path },
            _ => Effect::CreateFile { generation, path },
        };
        super::DispatchResult {
            effects: vec![effect],
            state_changed: false,
        }
    }

    fn finish_fs_op(&mut self, op: FsOp, path: PathBuf, to: Option<PathBuf>) -> super::DispatchResult {
        tracing::info!(op = op.label(), path = %path.display(), "file operation done");

        let mut dirs: Vec<PathBuf> = Vec::with_capacity(2);
        if let Some(parent) = path.parent() {
            dirs.push(parent.to_path_buf());
        }

        let mut state_changed = false;
        let mut owed = Vec::new();
        if let (FsOp::Rename, Some(to)) = (op, to.as_ref()) {
            state_changed |= self.state.tabs.retarget(&path, to);
            owed = self.state.writes.retarget(&path, to);
            if let Some(parent) = to.parent() {
                if !dirs.iter().any(|d| d == parent) {
                    dirs.push(parent.to_path_buf());
                }
            }
        }
        if op == FsOp::Delete {
            self.state.writes.forget_under(&path);
        }

        let mut effects: Vec<Effect> = dirs
            .iter()
            .filter_map(|dir| self.refresh_dir_effect(dir))
            .collect();
        for next in owed {
            effects.extend(self.flush_path(&next));
        }
        effects.extend(self.git_refresh_effect());

        super::DispatchResult {
            effects,
            state_changed,
        }
    }
}
