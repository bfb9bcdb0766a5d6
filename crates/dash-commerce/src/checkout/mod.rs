//! Checkout module.
//!
//! Contains addresses, delivery options, shipping quotes, checkout preferences
//! and the order payload.

mod address;
mod delivery;
mod order;
mod preferences;
mod shipping;

pub use address::{DeliveryAddress, GeoPoint};
pub use delivery::{DeliveryCatalog, DeliveryOption, ShippingQuote, TipOption, TIP_PRESETS};
pub use order::{AppliedDiscount, OrderDraft, OrderItem, OrderReceipt};
pub use preferences::{
    truncate_note, CheckoutPreferences, PaymentMethod, PreferencesStore, MAX_NOTE_CHARS,
};
pub use shipping::ShippingQuotes;
