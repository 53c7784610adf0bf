//! Pseudo-terminal sessions backed by `portable-pty`.
//!
//! Each session gets a reader thread that streams output back as
//! [`AppMessage::TerminalOutput`] and reports [`AppMessage::TerminalExited`]
//! once the pty closes.

use super::runtime::AppMessage;
use crate::kernel::TerminalId;
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use rustc_hash::FxHashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

struct PtySession {
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send + Sync>,
}

pub struct PtyHost {
    tx: Sender<AppMessage>,
    sessions: FxHashMap<TerminalId, PtySession>,
}

impl PtyHost {
    pub fn new(tx: Sender<AppMessage>) -> Self {
        Self {
            tx,
            sessions: FxHashMap::default(),
        }
    }

    pub fn spawn(&mut self, id: TerminalId, cwd: PathBuf, cols: u16, rows: u16) {
        let shell = default_shell();
        match self.open(id, &shell, &cwd, cols, rows) {
            Ok(session) => {
                self.sessions.insert(id, session);
                tracing::info!(id, shell = %shell, cwd = %cwd.display(), "terminal started");
                let _ = self.tx.send(AppMessage::TerminalSpawned {
                    id,
                    title: shell_title(&shell),
                });
            }
            Err(error) => {
                let _ = self.tx.send(AppMessage::TerminalSpawnFailed { id, error });
            }
        }
    }

    fn open(
        &self,
        id: TerminalId,
        shell: &str,
        cwd: &Path,
        cols: u16,
        rows: u16,
    ) -> Result<PtySession, String> {
        let pair = native_pty_system()
            .openpty(pty_size(cols, rows))
            .map_err(|e| format!("failed to create PTY: {e}"))?;

        let mut command = CommandBuilder::new(shell);
        if cwd.is_dir() {
            command.cwd(cwd);
        }
        command.env("TERM", "xterm-256color");

        let child = pair
            .slave
            .spawn_command(command)
            .map_err(|e| format!("failed to spawn {shell}: {e}"))?;
        drop(pair.slave);

        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| format!("failed to attach PTY reader: {e}"))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| format!("failed to attach PTY writer: {e}"))?;

        let tx = self.tx.clone();
        thread::Builder::new()
            .name(format!("pty-reader-{id}"))
            .spawn(move || {
                let mut buf = [0u8; 8192];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            let bytes = buf[..n].to_vec();
                            if tx.send(AppMessage::TerminalOutput { id, bytes }).is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            let bytes = format!("\r\n[PTY ERROR] {e}\r\n").into_bytes();
                            let _ = tx.send(AppMessage::TerminalOutput { id, bytes });
                            break;
                        }
                    }
                }
                let _ = tx.send(AppMessage::TerminalExited { id, code: None });
            })
            .map_err(|e| format!("failed to start PTY reader: {e}"))?;

        Ok(PtySession {
            master: pair.master,
            writer,
            child,
        })
    }

    pub fn write(&mut self, id: TerminalId, bytes: &[u8]) {
        let Some(session) = self.sessions.get_mut(&id) else {
            tracing::debug!(id, "write to unknown terminal");
            return;
        };
        let result = session
            .writer
            .write_all(bytes)
            .and_then(|()| session.writer.flush());
        if let Err(e) = result {
            tracing::warn!(id, error = %e, "terminal write failed");
        }
    }

    pub fn resize(&mut self, id: TerminalId, cols: u16, rows: u16) {
        let Some(session) = self.sessions.get_mut(&id) else {
            return;
        };
        if let Err(e) = session.master.resize(pty_size(cols, rows)) {
            tracing::warn!(id, error = %e, "terminal resize failed");
        }
    }

    pub fn kill(&mut self, id: TerminalId) {
        let Some(mut session) = self.sessions.remove(&id) else {
            return;
        };
        if let Err(e) = session.child.kill() {
            tracing::debug!(id, error = %e, "terminal kill failed");
        }
        let _ = session.child.wait();
    }
}

impl Drop for PtyHost {
    fn drop(&mut self) {
        for (_, mut session) in self.sessions.drain() {
            let _ = session.child.kill();
        }
    }
}

fn pty_size(cols: u16, rows: u16) -> PtySize {
    PtySize {
        rows: rows.max(1),
        cols: cols.max(1),
        pixel_width: 0,
        pixel_height: 0,
    }
}

/// `$SHELL` when set, else the first common shell that exists.
pub fn default_shell() -> String {
    if cfg!(windows) {
        return std::env::var("COMSPEC").unwrap_or_else(|_| "powershell.exe".to_string());
    }
    if let Ok(shell) = std::env::var("SHELL") {
        if !shell.trim().is_empty() {
            return shell;
        }
    }
    ["/bin/bash", "/usr/bin/bash", "/bin/zsh", "/bin/sh"]
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .unwrap_or("/bin/sh")
        .to_string()
}

fn shell_title(shell: &str) -> String {
    Path::new(shell)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(shell)
        .to_string()
}
