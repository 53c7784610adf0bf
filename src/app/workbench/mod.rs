//! 工作台：持有 Store 与运行时，执行副作用并回送结果

use crate::kernel::services::adapters::{
    AppMessage, AsyncRuntime, LocalFileProvider, SettingsStore,
};
use crate::kernel::services::ports::{FileProvider, Settings};
use crate::kernel::{AppState, Store};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

mod bridge;
mod subscription;
mod tick;

pub use subscription::{Subscription, WorkbenchEvent};
use subscription::Listeners;

const MAX_MESSAGE_DRAIN_PER_TICK: usize = 512;

pub struct Workbench {
    store: Store,
    runtime: AsyncRuntime,
    rx: Receiver<AppMessage>,
    listeners: Listeners,
    last_notice_seq: u64,
}

impl Workbench {
    /// Local filesystem, settings loaded from (and persisted to) `settings`.
    pub fn start(settings: Option<SettingsStore>) -> std::io::Result<Self> {
        let initial = settings
            .as_ref()
            .map(SettingsStore::load)
            .unwrap_or_default();
        Self::with_provider(initial, Arc::new(LocalFileProvider::new()), settings)
    }

    pub fn with_provider(
        settings: Settings,
        provider: Arc<dyn FileProvider>,
        store: Option<SettingsStore>,
    ) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let runtime = AsyncRuntime::new(tx, provider, store)?;
        Ok(Self {
            store: Store::new(AppState::new(settings)),
            runtime,
            rx,
            listeners: Listeners::default(),
            last_notice_seq: 0,
        })
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn subscribe(&self) -> (Subscription, Receiver<WorkbenchEvent>) {
        self.listeners.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/app/workbench.rs"]
mod tests;
