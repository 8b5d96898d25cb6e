//! Product catalog reference
//!
//! The catalog itself lives outside this service; handlers only need the
//! per-product fields that feed pricing and the cart, plus an in-memory
//! lookup seeded at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::value_objects::Money;
use crate::{CommerceError, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub unit_price: Money,
    pub min_order_quantity: u32,
    pub image_url: String,
}

impl Product {
    /// Minimum-order enforcement is a caller-level concern: the pricing
    /// calculator accepts any positive quantity, this gate sits in front.
    pub fn check_order_quantity(&self, quantity: u32) -> Result<()> {
        if quantity < self.min_order_quantity {
            return Err(CommerceError::BelowMinimumOrder {
                minimum: self.min_order_quantity,
                requested: quantity,
            });
        }
        Ok(())
    }
}

/// In-memory product lookup, insertion-ordered for listing.
#[derive(Clone, Debug, Default)]
pub struct ProductCatalog {
    order: Vec<String>,
    products: HashMap<String, Product>,
}

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        let mut catalog = Self::default();
        for p in products {
            if catalog.products.insert(p.id.clone(), p.clone()).is_none() {
                catalog.order.push(p.id);
            }
        }
        catalog
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn list(&self) -> Vec<&Product> {
        self.order.iter().filter_map(|id| self.products.get(id)).collect()
    }

    pub fn len(&self) -> usize { self.order.len() }
    pub fn is_empty(&self) -> bool { self.order.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn widget() -> Product {
        Product {
            id: "PROD-001".into(),
            name: "Widget".into(),
            unit_price: Money::usd(dec!(12.99)),
            min_order_quantity: 10,
            image_url: "/images/widget.png".into(),
        }
    }

    #[test]
    fn test_minimum_order_gate() {
        let p = widget();
        assert!(matches!(
            p.check_order_quantity(9),
            Err(CommerceError::BelowMinimumOrder { minimum: 10, requested: 9 })
        ));
        assert!(p.check_order_quantity(10).is_ok());
    }

    #[test]
    fn test_catalog_lookup_and_order() {
        let mut second = widget();
        second.id = "PROD-002".into();
        let catalog = ProductCatalog::new(vec![widget(), second]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("PROD-001").unwrap().name, "Widget");
        assert_eq!(catalog.list()[1].id, "PROD-002");
    }
}
