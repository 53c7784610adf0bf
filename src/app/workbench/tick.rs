use super::Workbench;
use crate::kernel::Action;
use std::sync::mpsc;
use std::time::{Duration, Instant};

impl Workbench {
    /// Drains runtime replies and fires due autosaves. Called from the host
    /// loop; returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        changed |= self.poll_messages();
        changed |= self.dispatch(Action::Tick {
            now: Instant::now(),
        });
        changed
    }

    pub fn poll_messages(&mut self) -> bool {
        let mut changed = false;
        for _ in 0..super::MAX_MESSAGE_DRAIN_PER_TICK {
            match self.rx.try_recv() {
                Ok(msg) => {
                    if let Some(action) = msg.into_action() {
                        changed |= self.dispatch(action);
                    }
                }
                Err(mpsc::TryRecvError::Empty) | Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    /// Blocks for at most `timeout` waiting for one runtime reply, then
    /// handles it. Pending autosaves are fired on the way.
    pub fn wait_message(&mut self, timeout: Duration) -> bool {
        let timeout = match self.store.state().writes.next_deadline() {
            Some(deadline) => timeout.min(deadline.saturating_duration_since(Instant::now())),
            None => timeout,
        };
        let mut changed = match self.rx.recv_timeout(timeout) {
            Ok(msg) => msg
                .into_action()
                .is_some_and(|action| self.dispatch(action)),
            Err(_) => false,
        };
        changed |= self.dispatch(Action::Tick {
            now: Instant::now(),
        });
        changed
    }

    /// Pumps replies until `done` holds or `timeout` elapses.
    pub fn run_until(&mut self, timeout: Duration, mut done: impl FnMut(&Self) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while !done(self) {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            self.wait_message((deadline - now).min(Duration::from_millis(50)));
        }
        true
    }

    /// Pumps replies until none arrives for `quiet`, or `max` elapses.
    pub fn settle(&mut self, quiet: Duration, max: Duration) {
        let deadline = Instant::now() + max;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            match self.rx.recv_timeout(quiet.min(deadline - now)) {
                Ok(msg) => {
                    if let Some(action) = msg.into_action() {
                        self.dispatch(action);
                    }
                }
                Err(_) => return,
            }
        }
    }
}
