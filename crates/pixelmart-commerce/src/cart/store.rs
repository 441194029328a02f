//! The persisted cart store.

use crate::cart::line_item::{parse_lines, total_quantity};
use crate::cart::{CartLineItem, CartSummary};
use crate::catalog::Catalog;
use crate::error::CommerceError;
use crate::events::{ChangeOrigin, EventBus, StoreEvent};
use crate::ids::ProductId;
use crate::pricing::{OptionsPatch, Quantity, SelectedOptions};
use pixelmart_cache::{Cache, KeyValueStore};

/// Storage key holding the cart.
pub const DEFAULT_CART_KEY: &str = "cartItems";

/// Owns the cart lines and keeps them in sync with a storage slot.
///
/// Every mutation rewrites the whole slot and publishes
/// [`StoreEvent::CartChanged`]. If the write fails the in-memory cart is
/// left untouched.
#[derive(Debug)]
pub struct CartStore<S: KeyValueStore> {
    cache: Cache<S>,
    key: String,
    items: Vec<CartLineItem>,
    /// Text last read from or written to the slot.
    last_seen: Option<String>,
    bus: EventBus,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store over `store` and load whatever it holds.
    pub fn open(store: S, bus: EventBus) -> Self {
        Self::open_with_key(store, DEFAULT_CART_KEY, bus)
    }

    /// Like [`CartStore::open`], using a custom storage key.
    pub fn open_with_key(store: S, key: impl Into<String>, bus: EventBus) -> Self {
        let mut cart = Self {
            cache: Cache::new(store),
            key: key.into(),
            items: Vec::new(),
            last_seen: None,
            bus,
        };
        cart.load();
        cart
    }

    /// Re-read the slot, replacing the in-memory cart. Never fails: missing
    /// or unreadable data loads as an empty cart.
    pub fn load(&mut self) -> &[CartLineItem] {
        let raw = self.read_raw();
        self.items = parse_lines(raw.as_deref());
        self.last_seen = raw;
        tracing::debug!(key = %self.key, lines = self.items.len(), "cart loaded");
        &self.items
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&CartLineItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u32 {
        total_quantity(&self.items)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Add a configuration to the cart.
    ///
    /// A line with the same product and options (ignoring quantity) absorbs
    /// the new quantity; otherwise a new line is appended. Returns the
    /// index of the affected line.
    pub fn add(&mut self, id: ProductId, options: SelectedOptions) -> Result<usize, CommerceError> {
        let line = CartLineItem::new(id, options);
        self.mutate(|items| {
            if let Some(index) = items.iter().position(|l| l.key() == line.key()) {
                let existing = &mut items[index].options.quantity;
                *existing = existing.saturating_add(line.quantity());
                Ok(index)
            } else {
                items.push(line);
                Ok(items.len() - 1)
            }
        })
    }

    /// Merge a partial change into a line's options.
    ///
    /// Lines are not re-merged if the change makes two lines identical.
    pub fn update(&mut self, index: usize, patch: OptionsPatch) -> Result<(), CommerceError> {
        self.mutate(|items| {
            let line = items
                .get_mut(index)
                .ok_or(CommerceError::LineItemNotFound(index))?;
            line.options.merge(patch);
            Ok(())
        })
    }

    pub fn set_quantity(&mut self, index: usize, quantity: Quantity) -> Result<(), CommerceError> {
        self.update(
            index,
            OptionsPatch {
                quantity: Some(quantity),
                ..Default::default()
            },
        )
    }

    /// Raise a line's quantity by one.
    pub fn increment(&mut self, index: usize) -> Result<Quantity, CommerceError> {
        let next = self.line(index)?.quantity().increment();
        self.set_quantity(index, next)?;
        Ok(next)
    }

    /// Lower a line's quantity by one, never below one.
    pub fn decrement(&mut self, index: usize) -> Result<Quantity, CommerceError> {
        let next = self.line(index)?.quantity().decrement();
        self.set_quantity(index, next)?;
        Ok(next)
    }

    /// Remove a line, returning it.
    pub fn remove(&mut self, index: usize) -> Result<CartLineItem, CommerceError> {
        self.mutate(|items| {
            if index >= items.len() {
                return Err(CommerceError::LineItemNotFound(index));
            }
            Ok(items.remove(index))
        })
    }

    /// Remove every line.
    pub fn clear(&mut self) -> Result<(), CommerceError> {
        self.mutate(|items| {
            items.clear();
            Ok(())
        })
    }

    /// Pick up changes another writer made to the slot.
    ///
    /// Returns true, after publishing an external [`StoreEvent::CartChanged`],
    /// when the stored text differs from what this store last saw.
    pub fn sync_from_storage(&mut self) -> bool {
        let raw = self.read_raw();
        if raw == self.last_seen {
            return false;
        }
        self.items = parse_lines(raw.as_deref());
        self.last_seen = raw;
        tracing::debug!(lines = self.items.len(), "cart changed in storage");
        self.publish(ChangeOrigin::External);
        true
    }

    /// Totals for the current cart.
    pub fn summary(&self, catalog: &Catalog) -> CartSummary {
        CartSummary::compute(&self.items, catalog)
    }

    fn line(&self, index: usize) -> Result<&CartLineItem, CommerceError> {
        self.items
            .get(index)
            .ok_or(CommerceError::LineItemNotFound(index))
    }

    fn read_raw(&self) -> Option<String> {
        match self.cache.store().get_raw(&self.key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read cart");
                None
            }
        }
    }

    /// Apply `f` to a copy of the lines, persist the result, then commit it.
    fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut Vec<CartLineItem>) -> Result<T, CommerceError>,
    ) -> Result<T, CommerceError> {
        let mut next = self.items.clone();
        let out = f(&mut next)?;
        let text = self.cache.set(&self.key, &next)?;
        self.items = next;
        self.last_seen = Some(text);
        self.publish(ChangeOrigin::Local);
        Ok(out)
    }

    fn publish(&self, origin: ChangeOrigin) {
        self.bus.emit(&StoreEvent::CartChanged {
            origin,
            item_count: self.item_count(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelmart_cache::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn open() -> (CartStore<MemoryStore>, MemoryStore, Rc<RefCell<Vec<StoreEvent>>>) {
        let storage = MemoryStore::new();
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        bus.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        (CartStore::open(storage.clone(), bus), storage, log)
    }

    fn black() -> SelectedOptions {
        SelectedOptions::new().with_color("Black").with_storage("128GB")
    }

    #[test]
    fn test_add_merges_identical_configuration() {
        let (mut cart, _, _) = open();
        assert_eq!(cart.add(ProductId::new(1), black()).unwrap(), 0);
        assert_eq!(cart.add(ProductId::new(1), black().with_quantity(2)).unwrap(), 0);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_different_option_creates_line() {
        let (mut cart, _, _) = open();
        cart.add(ProductId::new(1), black()).unwrap();
        let index = cart
            .add(ProductId::new(1), black().with_color("White"))
            .unwrap();
        assert_eq!(index, 1);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_delivery_does_not_split_lines() {
        let (mut cart, _, _) = open();
        cart.add(ProductId::new(1), black().with_delivery("express")).unwrap();
        cart.add(ProductId::new(1), black().with_delivery("sameday")).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].options.delivery_id, None);
    }

    #[test]
    fn test_mutations_persist_and_notify() {
        let (mut cart, storage, log) = open();
        cart.add(ProductId::new(1), black()).unwrap();
        cart.increment(0).unwrap();

        let raw = storage.get_raw(DEFAULT_CART_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["options"]["quantity"], 2);

        assert_eq!(
            log.borrow().last(),
            Some(&StoreEvent::CartChanged {
                origin: ChangeOrigin::Local,
                item_count: 2
            })
        );
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_update_and_quantity_bounds() {
        let (mut cart, _, _) = open();
        cart.add(ProductId::new(1), black()).unwrap();
        cart.update(
            0,
            OptionsPatch {
                storage: Some("256GB".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(cart.items()[0].options.storage.as_deref(), Some("256GB"));
        assert_eq!(cart.items()[0].options.color.as_deref(), Some("Black"));

        assert_eq!(cart.decrement(0).unwrap(), Quantity::ONE);
        cart.set_quantity(0, Quantity::new(50_000)).unwrap();
        assert_eq!(cart.item_count(), 9999);
    }

    #[test]
    fn test_out_of_range_index() {
        let (mut cart, _, log) = open();
        assert!(matches!(
            cart.remove(0),
            Err(CommerceError::LineItemNotFound(0))
        ));
        assert!(cart.increment(3).is_err());
        assert!(cart.update(1, OptionsPatch::default()).is_err());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let (mut cart, storage, _) = open();
        cart.add(ProductId::new(1), black()).unwrap();
        cart.add(ProductId::new(2), SelectedOptions::new()).unwrap();
        let removed = cart.remove(0).unwrap();
        assert_eq!(removed.id, ProductId::new(1));
        assert_eq!(cart.items()[0].id, ProductId::new(2));

        cart.clear().unwrap();
        assert!(cart.is_empty());
        assert_eq!(storage.get_raw(DEFAULT_CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_load_tolerates_garbage() {
        let storage = MemoryStore::new();
        storage.set_raw(DEFAULT_CART_KEY, "{\"oops\":").unwrap();
        let cart = CartStore::open(storage.clone(), EventBus::new());
        assert!(cart.is_empty());

        storage.set_raw(DEFAULT_CART_KEY, "{\"id\":1}").unwrap();
        let cart = CartStore::open(storage, EventBus::new());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_sync_from_storage_sees_other_writer() {
        let (mut cart, storage, log) = open();
        let bus = EventBus::new();
        let mut other_tab = CartStore::open(storage.clone(), bus);

        assert!(!cart.sync_from_storage());
        other_tab.add(ProductId::new(7), SelectedOptions::new().with_quantity(3)).unwrap();

        assert!(cart.sync_from_storage());
        assert_eq!(cart.item_count(), 3);
        assert_eq!(
            log.borrow().last(),
            Some(&StoreEvent::CartChanged {
                origin: ChangeOrigin::External,
                item_count: 3
            })
        );
        assert!(!cart.sync_from_storage());
    }

    #[test]
    fn test_own_writes_are_not_external_changes() {
        let (mut cart, _, _) = open();
        cart.add(ProductId::new(1), black()).unwrap();
        assert!(!cart.sync_from_storage());
    }
}
