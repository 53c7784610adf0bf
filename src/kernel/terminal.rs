use std::path::PathBuf;

pub type TerminalId = u64;

const DEFAULT_SCROLLBACK_BYTES: usize = 256 * 1024;

#[derive(Debug)]
pub struct TerminalSession {
    pub id: TerminalId,
    pub title: String,
    pub cwd: PathBuf,
    pub cols: u16,
    pub rows: u16,
    /// Raw output as received, trimmed from the front past the limit.
    pub scrollback: String,
    pub exited: bool,
    pub exit_code: Option<i32>,
    scrollback_limit: usize,
}

impl TerminalSession {
    pub fn new(id: TerminalId, cwd: PathBuf, cols: u16, rows: u16, limit: usize) -> Self {
        Self {
            id,
            title: format!("terminal-{id}"),
            cwd,
            cols: cols.max(1),
            rows: rows.max(1),
            scrollback: String::new(),
            exited: false,
            exit_code: None,
            scrollback_limit: limit.max(1),
        }
    }

    pub fn process_output(&mut self, bytes: &[u8]) -> bool {
        if bytes.is_empty() {
            return false;
        }
        self.push_text(&String::from_utf8_lossy(bytes));
        true
    }

    pub fn push_text(&mut self, text: &str) {
        self.scrollback.push_str(text);
        if self.scrollback.len() > self.scrollback_limit {
            let mut cut = self.scrollback.len() - self.scrollback_limit;
            while !self.scrollback.is_char_boundary(cut) {
                cut += 1;
            }
            self.scrollback.drain(..cut);
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) -> bool {
        let cols = cols.max(1);
        let rows = rows.max(1);
        if self.cols == cols && self.rows == rows {
            return false;
        }
        self.cols = cols;
        self.rows = rows;
        true
    }
}

#[derive(Debug)]
pub struct TerminalState {
    pub sessions: Vec<TerminalSession>,
    pub active: Option<TerminalId>,
    pub panel_visible: bool,
    pub next_id: TerminalId,
    pub scrollback_bytes: usize,
}

impl Default for TerminalState {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            active: None,
            panel_visible: false,
            next_id: 1,
            scrollback_bytes: DEFAULT_SCROLLBACK_BYTES,
        }
    }
}

impl TerminalState {
    pub fn active_session(&self) -> Option<&TerminalSession> {
        let id = self.active?;
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn session(&self, id: TerminalId) -> Option<&TerminalSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn session_mut(&mut self, id: TerminalId) -> Option<&mut TerminalSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub fn is_live(&self, id: TerminalId) -> bool {
        self.session(id).is_some_and(|s| !s.exited)
    }

    pub fn open_session(&mut self, cwd: PathBuf, cols: u16, rows: u16) -> TerminalId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        self.sessions.push(TerminalSession::new(
            id,
            cwd,
            cols,
            rows,
            self.scrollback_bytes,
        ));
        self.active = Some(id);
        self.panel_visible = true;
        id
    }

    pub fn remove_session(&mut self, id: TerminalId) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.active == Some(id) {
            self.active = self.sessions.last().map(|s| s.id);
        }
        if self.sessions.is_empty() {
            self.panel_visible = false;
        }
        before != self.sessions.len()
    }
}
