use super::message::AppMessage;
use crate::kernel::services::adapters::git;
use crate::kernel::services::adapters::scan::scan_files;
use crate::kernel::services::adapters::settings::SettingsStore;
use crate::kernel::services::ports::{FileProvider, FileResult, Settings};
use crate::kernel::{FsOp, TerminalId};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

#[cfg(feature = "terminal")]
use crate::kernel::services::adapters::pty::PtyHost;

/// Runs I/O off the UI thread. Every job reports back exactly one
/// [`AppMessage`] (terminals stream several).
pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    tx: Sender<AppMessage>,
    provider: Arc<dyn FileProvider>,
    settings: Option<Arc<Mutex<SettingsWriter>>>,
    next_settings_seq: u64,
    #[cfg(feature = "terminal")]
    terminals: PtyHost,
}

/// Settings writes may finish out of order on the blocking pool; older
/// snapshots are skipped once a newer one is on disk.
struct SettingsWriter {
    store: SettingsStore,
    written_seq: u64,
}

impl AsyncRuntime {
    pub fn new(
        tx: Sender<AppMessage>,
        provider: Arc<dyn FileProvider>,
        settings: Option<SettingsStore>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            #[cfg(feature = "terminal")]
            terminals: PtyHost::new(tx.clone()),
            tx,
            provider,
            settings: settings.map(|store| {
                Arc::new(Mutex::new(SettingsWriter {
                    store,
                    written_seq: 0,
                }))
            }),
            next_settings_seq: 0,
        })
    }

    pub fn tokio_handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    /// Runs `work` on the blocking pool and sends whatever `reply` builds
    /// from its outcome.
    fn spawn_io<T, W, R>(&self, work: W, reply: R)
    where
        T: Send + 'static,
        W: FnOnce(&dyn FileProvider) -> FileResult<T> + Send + 'static,
        R: FnOnce(Result<T, String>) -> AppMessage + Send + 'static,
    {
        let tx = self.tx.clone();
        let provider = Arc::clone(&self.provider);
        self.runtime.spawn(async move {
            let result = tokio::task::spawn_blocking(move || work(provider.as_ref())).await;
            let outcome = match result {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(reply(outcome));
        });
    }

    pub fn load_dir(&self, generation: u64, path: PathBuf) {
        let target = path.clone();
        self.spawn_io(
            move |fs| fs.read_dir(&target),
            move |result| match result {
                Ok(entries) => AppMessage::DirLoaded {
                    generation,
                    path,
                    entries,
                },
                Err(error) => AppMessage::DirLoadError {
                    generation,
                    path,
                    error,
                },
            },
        );
    }

    pub fn load_file(&self, generation: u64, key: String, title: String, path: PathBuf) {
        let target = path.clone();
        self.spawn_io(
            move |fs| fs.read_file(&target),
            move |result| match result {
                Ok(content) => AppMessage::FileLoaded {
                    generation,
                    key,
                    title,
                    path,
                    content,
                },
                Err(error) => AppMessage::FileError {
                    generation,
                    key,
                    path,
                    error,
                },
            },
        );
    }

    pub fn write_file(
        &self,
        generation: u64,
        key: String,
        path: PathBuf,
        content: String,
        revision: u64,
    ) {
        let target = path.clone();
        self.spawn_io(
            move |fs| fs.write_file(&target, &content),
            move |result| match result {
                Ok(()) => AppMessage::FileSaved {
                    generation,
                    key,
                    path,
                    revision,
                },
                Err(error) => AppMessage::FileSaveError {
                    generation,
                    key,
                    path,
                    error,
                },
            },
        );
    }

    pub fn create_file(&self, generation: u64, path: PathBuf) {
        let target = path.clone();
        self.spawn_io(
            move |fs| fs.create_file(&target),
            move |result| fs_reply(generation, FsOp::CreateFile, path, None, result),
        );
    }

    pub fn create_dir(&self, generation: u64, path: PathBuf) {
        let target = path.clone();
        self.spawn_io(
            move |fs| fs.create_dir(&target),
            move |result| fs_reply(generation, FsOp::CreateDir, path, None, result),
        );
    }

    pub fn rename_path(&self, generation: u64, from: PathBuf, to: PathBuf) {
        let (src, dst) = (from.clone(), to.clone());
        self.spawn_io(
            move |fs| fs.rename(&src, &dst),
            move |result| fs_reply(generation, FsOp::Rename, from, Some(to), result),
        );
    }

    pub fn delete_path(&self, generation: u64, path: PathBuf, is_dir: bool) {
        let target = path.clone();
        self.spawn_io(
            move |fs| {
                if is_dir {
                    fs.delete_dir_all(&target)
                } else {
                    fs.delete_file(&target)
                }
            },
            move |result| fs_reply(generation, FsOp::Delete, path, None, result),
        );
    }

    pub fn persist_settings(&mut self, settings: Settings) {
        let Some(writer) = self.settings.as_ref().map(Arc::clone) else {
            return;
        };
        self.next_settings_seq += 1;
        let seq = self.next_settings_seq;
        let tx = self.tx.clone();
        self.runtime.spawn_blocking(move || {
            let Ok(mut writer) = writer.lock() else {
                return;
            };
            if seq <= writer.written_seq {
                return;
            }
            match writer.store.save(&settings) {
                Ok(()) => writer.written_seq = seq,
                Err(e) => {
                    let _ = tx.send(AppMessage::SettingsSaveError {
                        error: e.to_string(),
                    });
                }
            }
        });
    }

    pub fn git_refresh(&self, generation: u64, root: PathBuf) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let snapshot = git::snapshot(&root).await;
            let _ = tx.send(AppMessage::GitUpdated {
                generation,
                snapshot,
            });
        });
    }

    pub fn scan_files(&self, generation: u64, root: PathBuf) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let files = tokio::task::spawn_blocking(move || scan_files(&root))
                .await
                .unwrap_or_default();
            let _ = tx.send(AppMessage::FilesScanned { generation, files });
        });
    }

    #[cfg(feature = "terminal")]
    pub fn spawn_terminal(&mut self, id: TerminalId, cwd: PathBuf, cols: u16, rows: u16) {
        self.terminals.spawn(id, cwd, cols, rows);
    }

    #[cfg(not(feature = "terminal"))]
    pub fn spawn_terminal(&mut self, id: TerminalId, _cwd: PathBuf, _cols: u16, _rows: u16) {
        let _ = self.tx.send(AppMessage::TerminalSpawnFailed {
            id,
            error: "terminal support is not enabled in this build".to_string(),
        });
    }

    pub fn write_terminal(&mut self, id: TerminalId, bytes: &[u8]) {
        #[cfg(feature = "terminal")]
        self.terminals.write(id, bytes);
        #[cfg(not(feature = "terminal"))]
        let _ = (id, bytes);
    }

    pub fn resize_terminal(&mut self, id: TerminalId, cols: u16, rows: u16) {
        #[cfg(feature = "terminal")]
        self.terminals.resize(id, cols, rows);
        #[cfg(not(feature = "terminal"))]
        let _ = (id, cols, rows);
    }

    pub fn kill_terminal(&mut self, id: TerminalId) {
        #[cfg(feature = "terminal")]
        self.terminals.kill(id);
        #[cfg(not(feature = "terminal"))]
        let _ = id;
    }
}

fn fs_reply(
    generation: u64,
    op: FsOp,
    path: PathBuf,
    to: Option<PathBuf>,
    result: Result<(), String>,
) -> AppMessage {
    match result {
        Ok(()) => AppMessage::FsOpDone {
            generation,
            op,
            path,
            to,
        },
        Err(error) => AppMessage::FsOpError {
            generation,
            op,
            path,
            error,
        },
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/async_runtime.rs"]
mod tests;
