//! Aggregates module
pub mod cart;
pub mod quote;

pub use cart::{Cart, CartLineItem};
pub use quote::{ContactInfo, QuoteRequest};
