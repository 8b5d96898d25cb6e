//! Quote Request Assembly
//!
//! A quote request is a detached snapshot of the cart plus the buyer's
//! contact details. Once built it never changes; the cart can keep mutating
//! without affecting requests already handed to the submission service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::aggregates::Cart;
use crate::domain::aggregates::cart::CartLineItem;
use crate::domain::value_objects::Money;
use crate::Result;

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct ContactInfo {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email address is not valid"))]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Immutable sales-inquiry snapshot. Construct via [`QuoteRequest::build`].
#[derive(Clone, Debug, Serialize)]
pub struct QuoteRequest {
    id: String,
    reference: String,
    contact: ContactInfo,
    line_items: Vec<CartLineItem>,
    total_value: Money,
    message: String,
    submitted_at: DateTime<Utc>,
}

impl QuoteRequest {
    /// Validate the contact details and snapshot the cart. Line items are
    /// deep-copied so later cart mutation cannot reach into the request.
    pub fn build(cart: &Cart, contact: ContactInfo, message: impl Into<String>) -> Result<Self> {
        contact.validate()?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            reference: format!("QR-{:08}", rand::random::<u32>() % 100_000_000),
            contact,
            line_items: cart.items().to_vec(),
            total_value: cart.total_value(),
            message: message.into(),
            submitted_at: Utc::now(),
        })
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn reference(&self) -> &str { &self.reference }
    pub fn contact(&self) -> &ContactInfo { &self.contact }
    pub fn line_items(&self) -> &[CartLineItem] { &self.line_items }
    pub fn total_value(&self) -> &Money { &self.total_value }
    pub fn message(&self) -> &str { &self.message }
    pub fn submitted_at(&self) -> DateTime<Utc> { self.submitted_at }
}
