//! # Cashback
//!
//! Redemption clamping, final amount and the earning preview.
//!
//! ## Clamping Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  requested                                                             │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  < 0 ? ─────────── yes ──► 0 (silently)                                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  > balance ? ───── yes ──► balance   + ExceedsBalance warning          │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  > subtotal ? ──── yes ──► subtotal  + ExceedsSubtotal warning         │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  result ∈ [0, min(balance, subtotal)]                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The subtotal check runs on the value left by the balance check, so a
//! request above both limits ends at the smaller one and raises both
//! warnings.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::CashbackRate;

/// Why a redemption request was reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RedemptionWarning {
    /// The customer does not hold that much cashback.
    ExceedsBalance,
    /// Cashback cannot pay for more than the purchase.
    ExceedsSubtotal,
}

impl RedemptionWarning {
    /// Message shown to the cashier.
    pub fn message(&self) -> &'static str {
        match self {
            RedemptionWarning::ExceedsBalance => {
                "Requested cashback exceeds the customer's available balance"
            }
            RedemptionWarning::ExceedsSubtotal => {
                "Requested cashback exceeds the purchase subtotal"
            }
        }
    }
}

impl std::fmt::Display for RedemptionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of clamping a redemption request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    /// What the cashier asked for.
    pub requested: Money,
    /// What will actually be redeemed.
    pub amount: Money,
    /// Warnings in the order they were raised.
    pub warnings: Vec<RedemptionWarning>,
}

impl Redemption {
    /// True when the request had to be reduced.
    pub fn was_clamped(&self) -> bool {
        self.requested != self.amount
    }
}

/// Clamps `requested` into `[0, min(balance, subtotal)]`.
///
/// ## Example
/// ```rust
/// use loyalty_core::cashback::{clamp_redemption, RedemptionWarning};
/// use loyalty_core::Money;
///
/// let r = clamp_redemption(
///     Money::from_cents(3000),  // requested 30.00
///     Money::from_cents(2000),  // balance   20.00
///     Money::from_cents(15000), // subtotal 150.00
/// );
/// assert_eq!(r.amount, Money::from_cents(2000));
/// assert_eq!(r.warnings, vec![RedemptionWarning::ExceedsBalance]);
/// ```
pub fn clamp_redemption(requested: Money, balance: Money, subtotal: Money) -> Redemption {
    let mut amount = requested.max(Money::zero());
    let mut warnings = Vec::new();

    let balance = balance.max(Money::zero());
    let subtotal = subtotal.max(Money::zero());

    if amount > balance {
        amount = balance;
        warnings.push(RedemptionWarning::ExceedsBalance);
    }

    if amount > subtotal {
        amount = subtotal;
        warnings.push(RedemptionWarning::ExceedsSubtotal);
    }

    Redemption {
        requested,
        amount,
        warnings,
    }
}

/// `max(0, subtotal − redemption)`.
pub fn final_amount(subtotal: Money, redemption: Money) -> Money {
    subtotal.saturating_sub_to_zero(redemption)
}

/// Cashback the customer will earn on a purchase of `final_amount`.
///
/// `rate` of the amount rounded half up to cents. Purchases whose share
/// rounds below 0.01 earn nothing.
pub fn earned_cashback(final_amount: Money, rate: CashbackRate) -> Money {
    if !final_amount.is_positive() {
        return Money::zero();
    }
    final_amount.percentage_of(rate).max(Money::zero())
}

/// Strict check of an already-chosen redemption.
///
/// Used when an order is assembled: unlike [`clamp_redemption`] it rejects
/// instead of correcting, the same checks the order service applies.
pub fn validate_redemption(amount: Money, balance: Money, subtotal: Money) -> CoreResult<()> {
    let reject = |reason: &str| CoreError::InvalidRedemption {
        amount,
        reason: reason.to_string(),
    };

    if amount.is_negative() {
        return Err(reject("cashback cannot be negative"));
    }
    if amount.is_zero() {
        return Ok(());
    }
    if amount > subtotal {
        return Err(reject("cashback cannot exceed the purchase total"));
    }
    if amount > balance {
        return Err(reject(&format!("insufficient cashback balance, available {}", balance)));
    }
    Ok(())
}
