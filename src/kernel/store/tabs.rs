use std::path::{Path, PathBuf};

use crate::kernel::tabs::{path_key, FileTab};
use crate::kernel::{Action, Effect};

impl super::Store {
    pub(super) fn reduce_tab_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::OpenFile { key, title, path } => self.open_file(key, title, path),
            Action::FileLoaded {
                generation,
                key,
                title,
                path,
                content,
            } => {
                if !self.is_current(generation) {
                    return super::DispatchResult::unchanged();
                }
                self.state.pending_opens.remove(&key);
                self.state
                    .tabs
                    .insert(FileTab::new(key, title, path.clone(), content));
                self.state.settings.add_recent_file(&path);
                super::DispatchResult {
                    effects: vec![Effect::PersistSettings(self.state.settings.clone())],
                    state_changed: true,
                }
            }
            Action::FileLoadFailed {
                generation,
                key,
                path,
                error,
            } => {
                if !self.is_current(generation) {
                    return super::DispatchResult::unchanged();
                }
                self.state.pending_opens.remove(&key);
                tracing::warn!(path = %path.display(), error = %error, "read_file failed");
                self.state
                    .push_error(format!("Failed to open {}: {error}", path.display()));
                super::DispatchResult::changed(true)
            }
            Action::ActivateTab { key } => {
                super::DispatchResult::changed(self.state.tabs.activate(&key))
            }
            Action::EditActive { content, now } => {
                let delay = self.state.settings.editor.autosave_delay();
                let Some(tab) = self.state.tabs.edit_active(content) else {
                    return super::DispatchResult::unchanged();
                };
                if let Some(delay) = delay {
                    self.state.writes.schedule(&tab.path, now, delay);
                }
                super::DispatchResult::changed(true)
            }
            Action::CloseTab { key } => {
                let Some(path) = self.state.tabs.get(&key).map(|t| t.path.clone()) else {
                    return super::DispatchResult::unchanged();
                };
                let effects = if self.state.writes.has_pending(&path) {
                    self.flush_path(&path)
                } else {
                    Vec::new()
                };
                if let Some(tab) = self.state.tabs.close(&key) {
                    self.state.writes.detach(&tab.path, tab.file_text);
                }
                super::DispatchResult {
                    effects,
                    state_changed: true,
                }
            }
            Action::SaveTab { key } => {
                let Some(path) = self.state.tabs.get(&key).map(|t| t.path.clone()) else {
                    return super::DispatchResult::unchanged();
                };
                super::DispatchResult {
                    effects: self.flush_path(&path),
                    state_changed: false,
                }
            }
            Action::SaveActive => {
                let Some(path) = self.state.tabs.active_tab().map(|t| t.path.clone()) else {
                    return super::DispatchResult::unchanged();
                };
                super::DispatchResult {
                    effects: self.flush_path(&path),
                    state_changed: false,
                }
            }
            Action::FileSaved {
                generation,
                key,
                path,
                revision,
            } => {
                // The queue outlives the workspace: a write issued before a
                // close still has to release its path.
                let current = generation == self.state.generation;
                tracing::debug!(path = %path.display(), revision, current, "saved");
                let state_changed = current && self.state.tabs.mark_saved(&key, revision);
                let mut effects = self.finish_write(&path);
                if current {
                    effects.extend(self.git_refresh_effect());
                }
                super::DispatchResult {
                    effects,
                    state_changed,
                }
            }
            Action::FileSaveFailed {
                generation,
                key: _,
                path,
                error,
            } => {
                tracing::warn!(path = %path.display(), generation, error = %error, "write_file failed");
                self.state
                    .push_error(format!("Failed to save {}: {error}", path.display()));
                super::DispatchResult {
                    effects: self.finish_write(&path),
                    state_changed: true,
                }
            }
            Action::Tick { now } => {
                let due = self.state.writes.take_due(now);
                let effects: Vec<Effect> = due
                    .iter()
                    .flat_map(|path| self.flush_path(path))
                    .collect();
                super::DispatchResult {
                    effects,
                    state_changed: false,
                }
            }
            _ => unreachable!("non-tab action passed to reduce_tab_action"),
        }
    }

    /// Focuses an open tab or starts reading the file. Reads already in
    /// flight for the same key are not repeated.
    pub(super) fn open_file(&mut self, key: String, title: String, path: PathBuf) -> super::DispatchResult {
        if !self.require_workspace("open files") {
            return super::DispatchResult::changed(true);
        }
        if self.state.tabs.contains(&key) {
            return super::DispatchResult::changed(self.state.tabs.activate(&key));
        }
        if !self.state.pending_opens.insert(key.clone()) {
            return super::DispatchResult::unchanged();
        }
        super::DispatchResult {
            effects: vec![Effect::LoadFile {
                generation: self.state.generation,
                key,
                title,
                path,
            }],
            state_changed: false,
        }
    }

    /// Issues a write of the current buffer for `path` unless one is already
    /// in flight, in which case the queue reruns it afterwards.
    pub(super) fn flush_path(&mut self, path: &Path) -> Vec<Effect> {
        if self.state.tabs.find_by_path(path).is_none() && !self.state.writes.has_detached(path) {
            self.state.writes.forget(path);
            return Vec::new();
        }
        if !self.state.writes.request(path) {
            return Vec::new();
        }
        match self.write_effect(path) {
            Some(effect) => vec![effect],
            None => {
                self.state.writes.finish(path);
                Vec::new()
            }
        }
    }

    fn finish_write(&mut self, path: &Path) -> Vec<Effect> {
        if !self.state.writes.finish(path) {
            return Vec::new();
        }
        self.flush_path(path)
    }

    /// Content left behind by a closed buffer wins unless the path was
    /// reopened and edited since.
    fn write_effect(&mut self, path: &Path) -> Option<Effect> {
        let detached = self.state.writes.take_detached(path);
        let tab = self.state.tabs.find_by_path(path);
        let (key, content, revision) = match (tab, detached) {
            (Some(tab), Some(_)) if tab.dirty => {
                (tab.key.clone(), tab.file_text.clone(), tab.revision)
            }
            (_, Some(content)) => (path_key(path), content, 0),
            (Some(tab), None) => (tab.key.clone(), tab.file_text.clone(), tab.revision),
            (None, None) => return None,
        };
        Some(Effect::WriteFile {
            generation: self.state.generation,
            key,
            path: path.to_path_buf(),
            content,
            revision,
        })
    }
}
