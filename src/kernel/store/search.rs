use crate::kernel::state::WorkspacePhase;
use crate::kernel::tabs::path_key;
use crate::kernel::{Action, Effect};

impl super::Store {
    pub(super) fn reduce_search_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::SearchOpen => {
                let WorkspacePhase::Open { root } = &self.state.phase else {
                    self.state
                        .push_error("Open a folder before searching files".to_string());
                    return super::DispatchResult::changed(true);
                };
                let root = root.clone();
                self.state.search.open();
                super::DispatchResult {
                    effects: vec![Effect::ScanFiles {
                        generation: self.state.generation,
                        root,
                    }],
                    state_changed: true,
                }
            }
            Action::SearchClose => super::DispatchResult::changed(self.state.search.close()),
            Action::SearchSetQuery { query } => {
                super::DispatchResult::changed(self.state.search.set_query(query))
            }
            Action::SearchMoveSelection { delta } => {
                super::DispatchResult::changed(self.state.search.move_selection(delta))
            }
            Action::SearchConfirm => {
                let Some(item) = self.state.search.selected_item().cloned() else {
                    return super::DispatchResult::unchanged();
                };
                self.state.search.close();
                let open = self.open_file(path_key(&item.path), item.name, item.path);
                super::DispatchResult {
                    effects: open.effects,
                    state_changed: true,
                }
            }
            Action::FilesScanned { generation, files } => {
                if !self.is_current(generation) {
                    return super::DispatchResult::unchanged();
                }
                tracing::debug!(files = files.len(), "workspace scan finished");
                super::DispatchResult::changed(self.state.search.set_candidates(files))
            }
            _ => unreachable!("non-search action passed to reduce_search_action"),
        }
    }
}
