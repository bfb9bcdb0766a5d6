//! Cart module.
//!
//! Contains line items, per-restaurant snapshots and the gateway-backed store.

mod line_item;
mod snapshot;
mod store;

pub use line_item::{
    CartLineItem, NewLineItemRequest, QuantityDirection, QuantityUpdate, ToppingSelection,
};
pub use snapshot::{normalize_cart, CartSnapshot};
pub use store::CartStore;
