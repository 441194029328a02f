//! Cross-component change notifications.
//!
//! Stores publish [`StoreEvent`]s on a shared [`EventBus`] so independent
//! views (cart badge, filter panel) can resynchronize without holding
//! references to each other. Everything runs on one thread; listeners are
//! invoked synchronously, in subscription order.

use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Where a change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOrigin {
    /// A mutation made through this process's store.
    Local,
    /// A change observed in shared storage, made by another writer.
    External,
}

/// A notification published on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum StoreEvent {
    /// Cart contents changed; `item_count` is the new badge count.
    CartChanged { origin: ChangeOrigin, item_count: u32 },
    /// Applied filters changed; `query` is the new query string.
    FiltersApplied { query: String },
    /// A navigation link rewrote the query string outside the filter panel.
    ExternalFilterNavigation { query: String },
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&StoreEvent)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

/// A single-threaded publish/subscribe channel. Clones share listeners.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<Listeners>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.entries.len();
        inner.entries.retain(|(entry, _)| *entry != id);
        inner.entries.len() < before
    }

    /// Deliver an event to every listener registered at the time of the call.
    ///
    /// Listeners may subscribe, unsubscribe or emit from inside a callback.
    pub fn emit(&self, event: &StoreEvent) {
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        tracing::trace!(?event, listeners = listeners.len(), "emit");
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
