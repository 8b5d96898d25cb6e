//! Bulkcart B2B Commerce Core
//!
//! Self-hosted bulk-pricing and quote-request service for B2B storefronts.
//!
//! ## Features
//! - Tiered bulk pricing (quantity bands mapped to discount percentages)
//! - Session cart with merge-by-id line items and derived totals
//! - Quote-request assembly from a cart snapshot plus contact details
//! - Pluggable key-value cart persistence and quote submission

use thiserror::Error;

pub mod config;
pub mod domain;
pub mod storage;
pub mod submission;

pub use domain::aggregates::{Cart, CartLineItem, ContactInfo, QuoteRequest};
pub use domain::catalog::{Product, ProductCatalog};
pub use domain::pricing::{PriceBreakdown, PricingTier, TierTable};
pub use domain::value_objects::{Money, Quantity};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum CommerceError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("invalid tier table: {0}")]
    InvalidTierTable(String),

    #[error("quantity {requested} is below the minimum order of {minimum}")]
    BelowMinimumOrder { minimum: u32, requested: u32 },

    #[error("cart item not found: {0}")]
    ItemNotFound(String),

    #[error("currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: String, actual: String },

    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, CommerceError>;
