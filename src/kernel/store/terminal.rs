use std::path::PathBuf;

use crate::kernel::{Action, Effect};

const DEFAULT_COLS: u16 = 80;
const DEFAULT_ROWS: u16 = 24;

impl super::Store {
    pub(super) fn reduce_terminal_action(&mut self, action: Action) -> super::DispatchResult {
        match action {
            Action::TerminalNew => self.spawn_terminal(),
            Action::TerminalTogglePanel => {
                if !self.state.terminal.panel_visible && self.state.terminal.sessions.is_empty() {
                    return self.spawn_terminal();
                }
                self.state.terminal.panel_visible = !self.state.terminal.panel_visible;
                super::DispatchResult::changed(true)
            }
            Action::TerminalActivate { id } => {
                let terminal = &mut self.state.terminal;
                if terminal.active == Some(id) || terminal.session(id).is_none() {
                    return super::DispatchResult::unchanged();
                }
                terminal.active = Some(id);
                super::DispatchResult::changed(true)
            }
            Action::TerminalInput { id, bytes } => {
                if bytes.is_empty() || !self.state.terminal.is_live(id) {
                    return super::DispatchResult::unchanged();
                }
                super::DispatchResult {
                    effects: vec![Effect::TerminalWrite { id, bytes }],
                    state_changed: false,
                }
            }
            Action::TerminalResize { id, cols, rows } => {
                let live = self.state.terminal.is_live(id);
                let Some(session) = self.state.terminal.session_mut(id) else {
                    return super::DispatchResult::unchanged();
                };
                if !session.resize(cols, rows) {
                    return super::DispatchResult::unchanged();
                }
                let effects = if live {
                    vec![Effect::TerminalResize {
                        id,
                        cols: session.cols,
                        rows: session.rows,
                    }]
                } else {
                    Vec::new()
                };
                super::DispatchResult {
                    effects,
                    state_changed: true,
                }
            }
            Action::TerminalClose { id } => {
                let live = self.state.terminal.is_live(id);
                if !self.state.terminal.remove_session(id) {
                    return super::DispatchResult::unchanged();
                }
                super::DispatchResult {
                    effects: if live {
                        vec![Effect::TerminalKill { id }]
                    } else {
                        Vec::new()
                    },
                    state_changed: true,
                }
            }
            Action::TerminalSpawned { id, title } => {
                let Some(session) = self.state.terminal.session_mut(id) else {
                    return super::DispatchResult::unchanged();
                };
                session.title = title;
                super::DispatchResult::changed(true)
            }
            Action::TerminalSpawnFailed { id, error } => {
                tracing::warn!(id, error = %error, "terminal spawn failed");
                let Some(session) = self.state.terminal.session_mut(id) else {
                    return super::DispatchResult::unchanged();
                };
                session.push_text(&format!("\r\n[SPAWN FAILED] {error}\r\n"));
                session.exited = true;
                super::DispatchResult::changed(true)
            }
            Action::TerminalOutput { id, bytes } => {
                let Some(session) = self.state.terminal.session_mut(id) else {
                    return super::DispatchResult::unchanged();
                };
                super::DispatchResult::changed(session.process_output(&bytes))
            }
            Action::TerminalExited { id, code } => {
                let Some(session) = self.state.terminal.session_mut(id) else {
                    return super::DispatchResult::unchanged();
                };
                if session.exited {
                    return super::DispatchResult::unchanged();
                }
                session.exited = true;
                session.exit_code = code;
                tracing::info!(id, ?code, "terminal exited");
                super::DispatchResult::changed(true)
            }
            _ => unreachable!("non-terminal action passed to reduce_terminal_action"),
        }
    }

    fn spawn_terminal(&mut self) -> super::DispatchResult {
        let cwd = self
            .state
            .workspace_root()
            .map(|p| p.to_path_buf())
            .or_else(home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let id = self
            .state
            .terminal
            .open_session(cwd.clone(), DEFAULT_COLS, DEFAULT_ROWS);
        super::DispatchResult {
            effects: vec![Effect::TerminalSpawn {
                id,
                cwd,
                cols: DEFAULT_COLS,
                rows: DEFAULT_ROWS,
            }],
            state_changed: true,
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(var).map(PathBuf::from)
}
