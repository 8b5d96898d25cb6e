//! Cart persistence
//!
//! The cart survives page reloads through a key-value collaborator (browser
//! local storage in the storefront, an in-process map here). The store is a
//! best-effort cache: the in-memory cart stays authoritative for the session,
//! and a failed write-through is logged and otherwise ignored.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::aggregates::Cart;
use crate::domain::aggregates::cart::CartLineItem;
use crate::{CommerceError, Result};

/// Key-value storage boundary. Values are serialized carts; the store itself
/// never interprets them.
pub trait CartStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store used by the service and in tests.
#[derive(Default)]
pub struct MemoryCartStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CommerceError::Storage("cart store mutex poisoned".into()))
    }
}

impl CartStore for MemoryCartStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// One session's cart plus its write-through persistence.
///
/// Reads through the store once at open; every mutation updates the
/// in-memory cart synchronously and then writes through. Persistence
/// failures do not propagate to the caller.
pub struct SessionCart {
    key: String,
    cart: Cart,
    store: Arc<dyn CartStore>,
}

impl SessionCart {
    pub fn open(key: impl Into<String>, currency: &str, store: Arc<dyn CartStore>) -> Self {
        let key = key.into();
        let cart = match store.get(&key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(key = %key, error = %e, "stored cart unreadable, starting empty");
                Cart::new(currency)
            }),
            Ok(None) => Cart::new(currency),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cart store read failed, starting empty");
                Cart::new(currency)
            }
        };
        Self { key, cart, store }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn add_item(&mut self, item: CartLineItem) -> Result<()> {
        self.cart.add_item(item)?;
        self.persist();
        Ok(())
    }

    pub fn remove_item(&mut self, id: &str) {
        self.cart.remove_item(id);
        self.persist();
    }

    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> Result<()> {
        self.cart.set_quantity(id, quantity)?;
        self.persist();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cart.clear();
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "cart store remove failed");
        }
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.cart) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "cart serialization failed");
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &raw) {
            tracing::warn!(key = %self.key, error = %e, "cart write-through failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Money;
    use rust_decimal_macros::dec;

    fn line(id: &str, quantity: u32) -> CartLineItem {
        CartLineItem {
            id: id.into(),
            name: format!("Product {id}"),
            unit_price: Money::usd(dec!(10)),
            quantity,
            image_url: String::new(),
        }
    }

    #[test]
    fn test_cart_survives_reopen() {
        let store: Arc<dyn CartStore> = Arc::new(MemoryCartStore::new());
        let mut session = SessionCart::open("sess-1", "USD", store.clone());
        session.add_item(line("A", 2)).unwrap();
        session.set_quantity("A", 5).unwrap();
        drop(session);

        let reopened = SessionCart::open("sess-1", "USD", store);
        assert_eq!(reopened.cart().items()[0].quantity, 5);
        assert_eq!(reopened.cart().total_items(), 5);
    }

    #[test]
    fn test_clear_removes_persisted_entry() {
        let store = Arc::new(MemoryCartStore::new());
        let mut session = SessionCart::open("sess-2", "USD", store.clone());
        session.add_item(line("A", 2)).unwrap();
        session.clear();
        assert_eq!(store.get("sess-2").unwrap(), None);
        let reopened = SessionCart::open("sess-2", "USD", store);
        assert!(reopened.cart().is_empty());
    }

    #[test]
    fn test_failing_store_does_not_break_session() {
        struct BrokenStore;
        impl CartStore for BrokenStore {
            fn get(&self, _: &str) -> Result<Option<String>> {
                Err(CommerceError::Storage("offline".into()))
            }
            fn set(&self, _: &str, _: &str) -> Result<()> {
                Err(CommerceError::Storage("offline".into()))
            }
            fn remove(&self, _: &str) -> Result<()> {
                Err(CommerceError::Storage("offline".into()))
            }
        }

        let mut session = SessionCart::open("sess-3", "USD", Arc::new(BrokenStore));
        session.add_item(line("A", 2)).unwrap();
        session.set_quantity("A", 3).unwrap();
        session.remove_item("A");
        session.clear();
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_corrupt_stored_cart_starts_empty() {
        let store = Arc::new(MemoryCartStore::new());
        store.set("sess-4", "{not json").unwrap();
        let session = SessionCart::open("sess-4", "USD", store);
        assert!(session.cart().is_empty());
    }
}
