use rustc_hash::FxHashMap;

use crate::kernel::Action;

impl super::Store {
    pub(super) fn reduce_git_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::GitUpdated {
                generation,
                root,
                branch,
                branches,
                statuses,
            } => {
                if !self.is_current(generation) {
                    return super::DispatchResult::unchanged();
                }

                // Not a repository, or git is unavailable.
                if branch.is_none() && statuses.is_empty() {
                    return super::DispatchResult::changed(self.state.git.clear());
                }

                let file_status: FxHashMap<_, _> = statuses.into_iter().collect();
                let git = &mut self.state.git;
                let state_changed = git.repo_root.as_ref() != Some(&root)
                    || git.branch != branch
                    || git.branches != branches
                    || git.file_status != file_status;

                git.repo_root = Some(root);
                git.branch = branch;
                git.branches = branches;
                git.file_status = file_status;

                super::DispatchResult::changed(state_changed)
            }
            _ => unreachable!("non-git action passed to reduce_git_action"),
        }
    }
}
