//! Voucher module.
//!
//! Contains the voucher model and the eligibility resolver.

mod model;
mod resolver;

pub use model::{DiscountType, Voucher};
pub use resolver::{
    AvailableVoucher, UnavailableReason, UnavailableVoucher, VoucherPartition, VoucherResolver,
};
