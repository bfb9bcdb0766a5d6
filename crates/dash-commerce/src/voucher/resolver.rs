//! Voucher eligibility and discount computation.
//!
//! Everything here is pure: same inputs, same outputs, no I/O.

use crate::money::Money;
use crate::voucher::{DiscountType, Voucher};
use serde::Serialize;
use std::fmt;

/// Why a voucher cannot be applied to the current cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum UnavailableReason {
    /// The voucher has been switched off.
    Inactive,
    /// The subtotal is below `min_order_value`.
    MinimumSpendNotReached {
        /// Amount still missing to reach the minimum.
        shortfall: Money,
    },
}

impl UnavailableReason {
    /// User-facing message.
    pub fn message(&self) -> &'static str {
        match self {
            UnavailableReason::Inactive => "Voucher is no longer available",
            UnavailableReason::MinimumSpendNotReached { .. } => "Min spend does not reach",
        }
    }
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// An applicable voucher and the discount it would give right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableVoucher {
    pub voucher: Voucher,
    pub discount: Money,
}

/// A voucher that cannot be applied, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnavailableVoucher {
    pub voucher: Voucher,
    pub reason: UnavailableReason,
}

/// A voucher catalog split by eligibility. Every catalog entry lands in
/// exactly one of the two lists, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VoucherPartition {
    pub available: Vec<AvailableVoucher>,
    pub unavailable: Vec<UnavailableVoucher>,
}

impl VoucherPartition {
    /// Total number of vouchers.
    pub fn len(&self) -> usize {
        self.available.len() + self.unavailable.len()
    }

    /// Check if the catalog was empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find an available voucher by code.
    pub fn available_by_code(&self, code: &str) -> Option<&AvailableVoucher> {
        self.available.iter().find(|a| a.voucher.code == code)
    }

    /// Available voucher with the largest discount.
    pub fn best(&self) -> Option<&AvailableVoucher> {
        self.available.iter().max_by_key(|a| a.discount)
    }
}

/// Eligibility rules and discount formulas.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoucherResolver;

impl VoucherResolver {
    /// Create a resolver.
    pub fn new() -> Self {
        Self
    }

    /// Check whether `voucher` applies to a cart with `subtotal`.
    ///
    /// A voucher is available iff it is active and the subtotal reaches its
    /// minimum order value.
    pub fn eligibility(&self, voucher: &Voucher, subtotal: Money) -> Result<(), UnavailableReason> {
        if !voucher.is_active {
            return Err(UnavailableReason::Inactive);
        }
        if subtotal < voucher.min_order_value {
            return Err(UnavailableReason::MinimumSpendNotReached {
                shortfall: voucher.min_order_value - subtotal,
            });
        }
        Ok(())
    }

    /// Split `catalog` into available and unavailable vouchers.
    ///
    /// `delivery_price` is the shipping fee of the selected delivery option;
    /// it only feeds the discount preview of `Shipping` vouchers.
    pub fn partition(
        &self,
        subtotal: Money,
        catalog: &[Voucher],
        delivery_price: Money,
    ) -> VoucherPartition {
        let mut partition = VoucherPartition::default();
        for voucher in catalog {
            match self.eligibility(voucher, subtotal) {
                Ok(()) => partition.available.push(AvailableVoucher {
                    discount: self.compute_discount(Some(voucher), subtotal, delivery_price),
                    voucher: voucher.clone(),
                }),
                Err(reason) => partition.unavailable.push(UnavailableVoucher {
                    voucher: voucher.clone(),
                    reason,
                }),
            }
        }
        partition
    }

    /// Discount granted by `voucher`.
    ///
    /// - `Percent`: `subtotal × value%`, capped by `max_discount` when set.
    /// - `Fixed`: `value`.
    /// - `Shipping`: `shipping_fee × value%`, capped by `max_discount` when
    ///   set and never more than the shipping fee.
    ///
    /// The result is never negative. No voucher means no discount.
    pub fn compute_discount(
        &self,
        voucher: Option<&Voucher>,
        subtotal: Money,
        shipping_fee: Money,
    ) -> Money {
        let Some(voucher) = voucher else {
            return Money::ZERO;
        };
        let value = voucher.discount_value.max(0);

        let discount = match voucher.discount_type {
            DiscountType::Percent => cap(subtotal.percentage(value), voucher.max_discount),
            DiscountType::Fixed => Money::new(value),
            DiscountType::Shipping => {
                cap(shipping_fee.percentage(value), voucher.max_discount)
                    .min(shipping_fee.non_negative())
            }
        };
        discount.non_negative()
    }
}

fn cap(amount: Money, max: Option<Money>) -> Money {
    match max {
        Some(max) => amount.min(max),
        None => amount,
    }
}
