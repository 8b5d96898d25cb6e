//! Domain model: value objects, pricing, and the cart/quote aggregates.

pub mod aggregates;
pub mod catalog;
pub mod pricing;
pub mod value_objects;
