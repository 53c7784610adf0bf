use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::mpsc::{self, Receiver, Sender};

new_key_type! { struct ListenerId; }

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbenchEvent {
    StateChanged,
    Notice(String),
}

type Registry = RefCell<SlotMap<ListenerId, Sender<WorkbenchEvent>>>;

#[derive(Default)]
pub(super) struct Listeners {
    registry: Rc<Registry>,
}

impl Listeners {
    pub(super) fn subscribe(&self) -> (Subscription, Receiver<WorkbenchEvent>) {
        let (tx, rx) = mpsc::channel();
        let id = self.registry.borrow_mut().insert(tx);
        let guard = Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        };
        (guard, rx)
    }

    pub(super) fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Listeners whose receiver is gone are dropped on the way.
    pub(super) fn emit(&self, event: &WorkbenchEvent) {
        self.registry
            .borrow_mut()
            .retain(|_, tx| tx.send(event.clone()).is_ok());
    }
}

/// Keeps a listener registered. Dropping it unregisters the listener.
pub struct Subscription {
    id: ListenerId,
    registry: Weak<Registry>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
