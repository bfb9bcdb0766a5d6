//! Voucher types.

use crate::ids::VoucherId;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a voucher's `discount_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// Percent of the cart subtotal.
    Percent,
    /// Fixed amount off.
    Fixed,
    /// Percent of the shipping fee.
    Shipping,
}

/// A discount rule from the voucher catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    #[serde(alias = "_id")]
    pub id: VoucherId,
    /// Code shown to and typed by the user (e.g., "FREESHIP50").
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Percent for `Percent`/`Shipping`, minor units for `Fixed`.
    pub discount_value: i64,
    #[serde(default)]
    pub min_order_value: Money,
    /// Cap on the computed discount. `None` means uncapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<Money>,
    #[serde(default = "default_active", alias = "isAvailable")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Voucher {
    fn base(code: impl Into<String>, discount_type: DiscountType, discount_value: i64) -> Self {
        let code = code.into();
        Self {
            id: VoucherId::new(code.clone()),
            code,
            title: None,
            description: None,
            discount_type,
            discount_value,
            min_order_value: Money::ZERO,
            max_discount: None,
            is_active: true,
            usage_limit: None,
            used_count: None,
            start_date: None,
            end_date: None,
        }
    }

    /// Percent off the subtotal.
    pub fn percent(code: impl Into<String>, percent: i64) -> Self {
        Self::base(code, DiscountType::Percent, percent)
    }

    /// Fixed amount off.
    pub fn fixed(code: impl Into<String>, amount: Money) -> Self {
        Self::base(code, DiscountType::Fixed, amount.minor_units())
    }

    /// Percent off the shipping fee.
    pub fn shipping(code: impl Into<String>, percent: i64) -> Self {
        Self::base(code, DiscountType::Shipping, percent)
    }

    /// Set the minimum subtotal.
    pub fn with_min_order_value(mut self, min: Money) -> Self {
        self.min_order_value = min;
        self
    }

    /// Cap the discount.
    pub fn with_max_discount(mut self, max: Money) -> Self {
        self.max_discount = Some(max);
        self
    }

    /// Set the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the validity window.
    pub fn with_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Set usage counters.
    pub fn with_usage(mut self, limit: u32, used: u32) -> Self {
        self.usage_limit = Some(limit);
        self.used_count = Some(used);
        self
    }

    /// Mark as inactive.
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Check if `at` is past the end date.
    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        self.end_date.is_some_and(|end| at > end)
    }

    /// Check if `at` is before the start date.
    pub fn is_upcoming(&self, at: DateTime<Utc>) -> bool {
        self.start_date.is_some_and(|start| at < start)
    }

    /// Check if the usage limit has been reached.
    pub fn is_exhausted(&self) -> bool {
        match self.usage_limit {
            Some(limit) => self.used_count.unwrap_or(0) >= limit,
            None => false,
        }
    }

    /// Remaining uses, if limited.
    pub fn remaining_uses(&self) -> Option<u32> {
        self.usage_limit
            .map(|limit| limit.saturating_sub(self.used_count.unwrap_or(0)))
    }
}
