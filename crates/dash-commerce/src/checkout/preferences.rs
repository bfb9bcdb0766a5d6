//! Checkout preferences and their store.

use crate::checkout::DeliveryAddress;
use crate::ids::{DeliveryOptionId, RestaurantId};
use crate::money::Money;
use crate::persistence::{Persistence, PREFERENCES_PART};
use crate::voucher::Voucher;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

/// Longest accepted note, in characters.
pub const MAX_NOTE_CHARS: usize = 200;

/// How the order will be paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cash,
    /// Online payment through the payment provider.
    Online,
}

/// The user's checkout selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutPreferences {
    pub selected_voucher: Option<Voucher>,
    pub tip_amount: Money,
    #[serde(alias = "deliveryOption")]
    pub delivery_option_id: DeliveryOptionId,
    pub include_cutlery: bool,
    pub note: String,
    pub selected_payment_method: PaymentMethod,
    pub selected_address: Option<DeliveryAddress>,
}

impl Default for CheckoutPreferences {
    fn default() -> Self {
        Self {
            selected_voucher: None,
            tip_amount: Money::ZERO,
            delivery_option_id: DeliveryOptionId::new("standard"),
            include_cutlery: false,
            note: String::new(),
            selected_payment_method: PaymentMethod::Cash,
            selected_address: None,
        }
    }
}

impl CheckoutPreferences {
    /// Defaults with a different delivery option.
    pub fn with_delivery_option(delivery_option_id: DeliveryOptionId) -> Self {
        Self {
            delivery_option_id,
            ..Self::default()
        }
    }
}

/// Cut `note` to [`MAX_NOTE_CHARS`] characters.
pub fn truncate_note(note: &str) -> String {
    note.chars().take(MAX_NOTE_CHARS).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PreferencesState {
    restaurant_id: Option<RestaurantId>,
    preferences: CheckoutPreferences,
}

/// Holds [`CheckoutPreferences`] for the restaurant being checked out.
///
/// Setters are total and local. Every change is written to persistence
/// immediately, under the same lock that applied it, so the persisted copy
/// never lags behind a newer in-memory state. After [`teardown`] changes
/// still apply in memory but are no longer persisted.
///
/// [`teardown`]: PreferencesStore::teardown
#[derive(Debug)]
pub struct PreferencesStore {
    state: RwLock<PreferencesState>,
    persistence: Option<Persistence>,
    default_delivery_option: DeliveryOptionId,
    alive: AtomicBool,
}

impl Default for PreferencesStore {
    fn default() -> Self {
        Self::new(DeliveryOptionId::new("standard"))
    }
}

impl PreferencesStore {
    /// Create a store whose fresh preferences use `default_delivery_option`.
    pub fn new(default_delivery_option: DeliveryOptionId) -> Self {
        let state = PreferencesState {
            restaurant_id: None,
            preferences: CheckoutPreferences::with_delivery_option(default_delivery_option.clone()),
        };
        Self {
            state: RwLock::new(state),
            persistence: None,
            default_delivery_option,
            alive: AtomicBool::new(true),
        }
    }

    /// Rehydrate from and persist to `persistence`.
    pub fn with_persistence(mut self, persistence: Persistence) -> Self {
        if let Some(mut persisted) = persistence.load::<PreferencesState>(PREFERENCES_PART) {
            persisted.preferences.note = truncate_note(&persisted.preferences.note);
            persisted.preferences.tip_amount = persisted.preferences.tip_amount.non_negative();
            tracing::debug!(restaurant_id = ?persisted.restaurant_id, "rehydrated checkout preferences");
            *self.state.get_mut().unwrap_or_else(PoisonError::into_inner) = persisted;
        }
        self.persistence = Some(persistence);
        self
    }

    /// Current preferences.
    pub fn current(&self) -> CheckoutPreferences {
        self.read(|s| s.preferences.clone())
    }

    /// Restaurant the preferences belong to, if checkout has begun.
    pub fn restaurant(&self) -> Option<RestaurantId> {
        self.read(|s| s.restaurant_id.clone())
    }

    /// Start (or resume) checkout for `restaurant_id`.
    ///
    /// Resuming the same restaurant keeps every selection. Switching to another
    /// restaurant keeps address, payment method, delivery option, tip and
    /// cutlery, and clears the voucher and the note.
    pub fn begin_checkout(&self, restaurant_id: &RestaurantId) -> CheckoutPreferences {
        self.update(|state| {
            if state.restaurant_id.as_ref() != Some(restaurant_id) {
                tracing::debug!(restaurant_id = %restaurant_id, "checkout switched restaurant");
                state.restaurant_id = Some(restaurant_id.clone());
                state.preferences.selected_voucher = None;
                state.preferences.note.clear();
            }
        })
    }

    /// Clear voucher and note after an order for `restaurant_id` was placed.
    ///
    /// Preferences of another restaurant are left alone.
    pub fn reset_for_restaurant(&self, restaurant_id: &RestaurantId) {
        self.update(|state| {
            if state.restaurant_id.as_ref() == Some(restaurant_id) {
                state.preferences.selected_voucher = None;
                state.preferences.note.clear();
            }
        });
    }

    /// Reset everything to defaults.
    pub fn reset(&self) {
        let default_delivery_option = self.default_delivery_option.clone();
        self.update(|state| {
            *state = PreferencesState {
                restaurant_id: None,
                preferences: CheckoutPreferences::with_delivery_option(default_delivery_option),
            };
        });
    }

    pub fn set_selected_voucher(&self, voucher: Option<Voucher>) -> CheckoutPreferences {
        self.update(|s| s.preferences.selected_voucher = voucher)
    }

    /// Negative tips are stored as zero.
    pub fn set_tip_amount(&self, tip: Money) -> CheckoutPreferences {
        self.update(|s| s.preferences.tip_amount = tip.non_negative())
    }

    pub fn set_delivery_option(&self, delivery_option_id: DeliveryOptionId) -> CheckoutPreferences {
        self.update(|s| s.preferences.delivery_option_id = delivery_option_id)
    }

    pub fn set_include_cutlery(&self, include: bool) -> CheckoutPreferences {
        self.update(|s| s.preferences.include_cutlery = include)
    }

    /// Notes longer than [`MAX_NOTE_CHARS`] are truncated.
    pub fn set_note(&self, note: &str) -> CheckoutPreferences {
        let note = truncate_note(note);
        self.update(|s| s.preferences.note = note)
    }

    pub fn set_selected_payment_method(&self, method: PaymentMethod) -> CheckoutPreferences {
        self.update(|s| s.preferences.selected_payment_method = method)
    }

    pub fn set_selected_address(&self, address: Option<DeliveryAddress>) -> CheckoutPreferences {
        self.update(|s| s.preferences.selected_address = address)
    }

    /// Stop writing changes to persistence.
    pub fn teardown(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            tracing::debug!("checkout preferences detached from persistence");
        }
    }

    /// Check if changes are still persisted.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn read<T>(&self, f: impl FnOnce(&PreferencesState) -> T) -> T {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn update(&self, f: impl FnOnce(&mut PreferencesState)) -> CheckoutPreferences {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
        if let Some(persistence) = self.persistence.as_ref().filter(|_| self.is_alive()) {
            persistence.save(PREFERENCES_PART, &*state);
        }
        state.preferences.clone()
    }
}
