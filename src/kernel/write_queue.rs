//! Per-path write coalescing.
//!
//! Edits schedule a debounced flush; an explicit save cancels the debounce and
//! writes at once. A path never has more than one write in flight: a flush
//! requested meanwhile is remembered and issued when the current write ends,
//! with whatever content the buffer has then (or had when it was closed).

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Slot {
    deadline: Option<Instant>,
    in_flight: bool,
    rerun: bool,
    /// Last content of a buffer closed while its rerun was still queued.
    detached: Option<String>,
}

impl Slot {
    fn is_idle(&self) -> bool {
        self.deadline.is_none() && !self.in_flight && !self.rerun && self.detached.is_none()
    }
}

#[derive(Debug, Default)]
pub struct WriteQueue {
    slots: FxHashMap<PathBuf, Slot>,
}

impl WriteQueue {
    pub fn schedule(&mut self, path: &Path, now: Instant, delay: Duration) {
        let slot = self.slots.entry(path.to_path_buf()).or_default();
        slot.deadline = Some(now + delay);
    }

    pub fn has_pending(&self, path: &Path) -> bool {
        self.slots
            .get(path)
            .is_some_and(|slot| slot.deadline.is_some())
    }

    pub fn is_in_flight(&self, path: &Path) -> bool {
        self.slots.get(path).is_some_and(|slot| slot.in_flight)
    }

    pub fn has_detached(&self, path: &Path) -> bool {
        self.slots
            .get(path)
            .is_some_and(|slot| slot.detached.is_some())
    }

    /// Cancels any pending debounce for `path`. Returns `true` when the caller
    /// should issue the write now (and marks it in flight); otherwise the
    /// write is queued behind the one in flight.
    pub fn request(&mut self, path: &Path) -> bool {
        let slot = self.slots.entry(path.to_path_buf()).or_default();
        slot.deadline = None;
        if slot.in_flight {
            slot.rerun = true;
            return false;
        }
        slot.in_flight = true;
        true
    }

    /// Paths whose debounce elapsed, earliest deadline first. Their deadlines
    /// are cleared; the caller is expected to `request` each of them.
    pub fn take_due(&mut self, now: Instant) -> Vec<PathBuf> {
        let mut due: Vec<(Instant, PathBuf)> = self
            .slots
            .iter_mut()
            .filter_map(|(path, slot)| match slot.deadline {
                Some(deadline) if deadline <= now => {
                    slot.deadline = None;
                    Some((deadline, path.clone()))
                }
                _ => None,
            })
            .collect();
        due.sort();
        due.into_iter().map(|(_, path)| path).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots.values().filter_map(|slot| slot.deadline).min()
    }

    /// Marks the in-flight write for `path` as finished. Returns `true` when
    /// another write was requested meanwhile; the caller should `request` it.
    pub fn finish(&mut self, path: &Path) -> bool {
        let Some(slot) = self.slots.get_mut(path) else {
            return false;
        };
        slot.in_flight = false;
        let rerun = std::mem::take(&mut slot.rerun);
        if slot.is_idle() {
            self.slots.remove(path);
        }
        rerun
    }

    /// The buffer for `path` is going away. A write queued behind the one in
    /// flight keeps `content`; everything else not yet issued is dropped.
    pub fn detach(&mut self, path: &Path, content: String) {
        let Some(slot) = self.slots.get_mut(path) else {
            return;
        };
        slot.deadline = None;
        if !slot.in_flight {
            self.slots.remove(path);
            return;
        }
        if slot.rerun {
            slot.detached = Some(content);
        }
    }

    pub fn take_detached(&mut self, path: &Path) -> Option<String> {
        self.slots.get_mut(path)?.detached.take()
    }

    /// Moves pending state at or below `from` under `to`. A write in flight
    /// stays on the old path until it finishes. Returns the new paths whose
    /// queued rerun should be issued now.
    pub fn retarget(&mut self, from: &Path, to: &Path) -> Vec<PathBuf> {
        let moved: Vec<PathBuf> = self
            .slots
            .keys()
            .filter(|path| path.starts_with(from))
            .cloned()
            .collect();

        let mut owed = Vec::new();
        for old in moved {
            let Some(slot) = self.slots.get_mut(&old) else {
                continue;
            };
            let deadline = slot.deadline.take();
            let detached = slot.detached.take();
            let rerun = std::mem::take(&mut slot.rerun);
            if slot.is_idle() {
                self.slots.remove(&old);
            }

            let Ok(rel) = old.strip_prefix(from) else {
                continue;
            };
            let next = if rel.as_os_str().is_empty() {
                to.to_path_buf()
            } else {
                to.join(rel)
            };
            if deadline.is_some() || detached.is_some() {
                let target = self.slots.entry(next.clone()).or_default();
                target.deadline = deadline;
                target.detached = detached;
            }
            if rerun {
                owed.push(next);
            }
        }
        owed
    }

    /// Drops everything not yet issued at or below `prefix`.
    pub fn forget_under(&mut self, prefix: &Path) {
        self.slots.retain(|path, slot| {
            if !path.starts_with(prefix) {
                return true;
            }
            slot.deadline = None;
            slot.rerun = false;
            slot.detached = None;
            !slot.is_idle()
        });
    }

    /// Drops every pending debounce and queued rerun for `path`.
    pub fn forget(&mut self, path: &Path) {
        if let Some(slot) = self.slots.get_mut(path) {
            slot.deadline = None;
            slot.rerun = false;
            slot.detached = None;
            if slot.is_idle() {
                self.slots.remove(path);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
