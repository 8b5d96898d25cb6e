//! Service configuration
//!
//! Everything comes from the environment: the listen port, the cart
//! currency, and optional JSON files for the tier table and the catalog
//! seed. A malformed tier table aborts startup; the tier invariants are
//! checked here once, never at resolution time.

use anyhow::Context;
use rust_decimal_macros::dec;

use crate::domain::catalog::{Product, ProductCatalog};
use crate::domain::pricing::{PricingTier, TierTable};
use crate::domain::value_objects::Money;

pub const DEFAULT_PORT: u16 = 8083;

pub struct Config {
    pub port: u16,
    pub currency: String,
    pub tier_table: TierTable,
    pub catalog: ProductCatalog,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT is not a valid port number")?,
            Err(_) => DEFAULT_PORT,
        };
        let currency = std::env::var("BULKCART_CURRENCY").unwrap_or_else(|_| "USD".to_string());

        let tier_table = match std::env::var("BULKCART_TIERS") {
            Ok(path) => load_tier_table(&path)
                .with_context(|| format!("loading tier table from {path}"))?,
            Err(_) => TierTable::standard(),
        };

        let catalog = match std::env::var("BULKCART_CATALOG") {
            Ok(path) => {
                load_catalog(&path).with_context(|| format!("loading catalog from {path}"))?
            }
            Err(_) => seed_catalog(&currency),
        };

        Ok(Self { port, currency, tier_table, catalog })
    }
}

fn load_tier_table(path: &str) -> anyhow::Result<TierTable> {
    let raw = std::fs::read_to_string(path)?;
    let tiers: Vec<PricingTier> = serde_json::from_str(&raw)?;
    Ok(TierTable::new(tiers)?)
}

fn load_catalog(path: &str) -> anyhow::Result<ProductCatalog> {
    let raw = std::fs::read_to_string(path)?;
    let products: Vec<Product> = serde_json::from_str(&raw)?;
    Ok(ProductCatalog::new(products))
}

/// Development seed used when no catalog file is configured.
fn seed_catalog(currency: &str) -> ProductCatalog {
    ProductCatalog::new(vec![
        Product {
            id: "PROD-001".into(),
            name: "Industrial Widget".into(),
            unit_price: Money::new(dec!(12.99), currency),
            min_order_quantity: 10,
            image_url: "/images/industrial-widget.png".into(),
        },
        Product {
            id: "PROD-002".into(),
            name: "Connector Gasket".into(),
            unit_price: Money::new(dec!(4.50), currency),
            min_order_quantity: 25,
            image_url: "/images/connector-gasket.png".into(),
        },
        Product {
            id: "PROD-003".into(),
            name: "Stainless Fastener Kit".into(),
            unit_price: Money::new(dec!(39.00), currency),
            min_order_quantity: 1,
            image_url: "/images/fastener-kit.png".into(),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog_has_products() {
        let catalog = seed_catalog("USD");
        assert!(!catalog.is_empty());
        assert!(catalog.get("PROD-001").is_some());
    }

    #[test]
    fn test_tier_table_file_round_trip() {
        let json = serde_json::to_string(TierTable::standard().tiers()).unwrap();
        let dir = std::env::temp_dir().join("bulkcart-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tiers.json");
        std::fs::write(&path, json).unwrap();
        let table = load_tier_table(path.to_str().unwrap()).unwrap();
        assert_eq!(table.tiers().len(), 5);
    }

    #[test]
    fn test_malformed_tier_file_fails_fast() {
        let json = r#"[{"label":"A","min_quantity":2,"max_quantity":null,"discount_percent":"0"}]"#;
        let dir = std::env::temp_dir().join("bulkcart-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad-tiers.json");
        std::fs::write(&path, json).unwrap();
        assert!(load_tier_table(path.to_str().unwrap()).is_err());
    }
}
