//! Cart Aggregate
//!
//! One cart per storefront session. Lines are keyed by product id and keep
//! insertion order for display; adding an id already in the cart merges by
//! incrementing its quantity. Totals are derived from the live line set on
//! every read so they can never drift from the lines themselves.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Money, Quantity};
use crate::{CommerceError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub image_url: String,
}

impl CartLineItem {
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cart {
    currency: String,
    items: Vec<CartLineItem>,
}

impl Cart {
    pub fn new(currency: &str) -> Self {
        Self { currency: currency.to_string(), items: vec![] }
    }

    pub fn currency(&self) -> &str { &self.currency }
    pub fn items(&self) -> &[CartLineItem] { &self.items }
    pub fn line_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Add a line, merging by product id. The item's quantity must be
    /// positive and its price must be in the cart currency; a line in a
    /// foreign currency would make the total undefined, so it is rejected
    /// here instead of being dropped from the sum later.
    pub fn add_item(&mut self, item: CartLineItem) -> Result<()> {
        if item.unit_price.currency() != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.clone(),
                actual: item.unit_price.currency().to_string(),
            });
        }
        let added = Quantity::new(item.quantity)?;
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = Quantity::new(existing.quantity)?.add(added.value()).value();
        } else {
            self.items.push(item);
        }
        Ok(())
    }

    /// Remove a line. Removing an id that is not present is a no-op, so
    /// removal is idempotent.
    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|i| i.id != id);
    }

    /// Replace a line's quantity. Zero means "remove the line"; quantities
    /// are never stored as zero.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> Result<()> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CommerceError::ItemNotFound(id.to_string()))?;
        if quantity == 0 {
            self.remove_item(id);
        } else {
            item.quantity = quantity;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total units across all lines.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Total monetary value, recomputed from the lines. Every line carries
    /// the cart currency (enforced by [`Cart::add_item`]), so the amounts
    /// sum directly; nothing is ever skipped.
    pub fn total_value(&self) -> Money {
        let total: Decimal =
            self.items.iter().map(|i| i.unit_price.amount() * Decimal::from(i.quantity)).sum();
        Money::new(total, &self.currency)
    }
}
