use super::{Workbench, WorkbenchEvent};
use crate::kernel::{Action, Effect};

impl Workbench {
    /// Runs `action` through the store, performs the resulting effects and
    /// notifies subscribers. Returns whether the state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        tracing::trace!(?action, "dispatch");
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.run_effect(effect);
        }
        self.notify(result.state_changed);
        result.state_changed
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::LoadDir { generation, path } => self.runtime.load_dir(generation, path),
            Effect::LoadFile {
                generation,
                key,
                title,
                path,
            } => self.runtime.load_file(generation, key, title, path),
            Effect::WriteFile {
                generation,
                key,
                path,
                content,
                revision,
            } => self
                .runtime
                .write_file(generation, key, path, content, revision),
            Effect::CreateFile { generation, path } => self.runtime.create_file(generation, path),
            Effect::CreateDir { generation, path } => self.runtime.create_dir(generation, path),
            Effect::RenamePath {
                generation,
                from,
                to,
            } => self.runtime.rename_path(generation, from, to),
            Effect::DeletePath {
                generation,
                path,
                is_dir,
            } => self.runtime.delete_path(generation, path, is_dir),
            Effect::PersistSettings(settings) => self.runtime.persist_settings(settings),
            Effect::GitRefresh { generation, root } => self.runtime.git_refresh(generation, root),
            Effect::ScanFiles { generation, root } => self.runtime.scan_files(generation, root),
            Effect::TerminalSpawn {
                id,
                cwd,
                cols,
                rows,
            } => self.runtime.spawn_terminal(id, cwd, cols, rows),
            Effect::TerminalWrite { id, bytes } => self.runtime.write_terminal(id, &bytes),
            Effect::TerminalResize { id, cols, rows } => {
                self.runtime.resize_terminal(id, cols, rows)
            }
            Effect::TerminalKill { id } => self.runtime.kill_terminal(id),
        }
    }

    fn notify(&mut self, state_changed: bool) {
        let fresh: Vec<String> = self
            .store
            .state()
            .notices
            .iter()
            .filter(|notice| notice.seq > self.last_notice_seq)
            .map(|notice| notice.message.clone())
            .collect();
        if let Some(last) = self.store.state().notices.back() {
            self.last_notice_seq = last.seq;
        }

        if state_changed {
            self.listeners.emit(&WorkbenchEvent::StateChanged);
        }
        for message in fresh {
            self.listeners.emit(&WorkbenchEvent::Notice(message));
        }
    }
}
