//! # Checkout Calculator
//!
//! Session-scoped state of one sale in progress: the cart, the selected
//! customer and the cashback redemption.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Lifecycle                                   │
//! │                                                                         │
//! │  ┌──────────┐  select_customer  ┌──────────┐  add_item  ┌──────────┐   │
//! │  │ No       │──────────────────►│ Customer │───────────►│ Non-empty│   │
//! │  │ customer │                   │ chosen   │◄───────────│ cart     │   │
//! │  └──────────┘                   └──────────┘ remove last└────┬─────┘   │
//! │                                                              │         │
//! │                                 set_cashback_redemption ◄────┤         │
//! │                                 prepare_order ◄──────────────┘         │
//! │                                                                         │
//! │  Cashback and checkout sections are shown only in "Non-empty cart".    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation ends in [`Checkout::recompute`], which keeps the stored
//! redemption inside `[0, min(balance, subtotal)]`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, LineItem};
use crate::cashback::{self, Redemption};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CashbackRate, Customer, Product};

// =============================================================================
// Section Visibility
// =============================================================================

/// Which parts of the checkout page are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SectionVisibility {
    /// Product search, available once a customer is chosen.
    pub products: bool,
    /// Cashback entry box.
    pub cashback: bool,
    /// Finish-sale button.
    pub checkout: bool,
}

impl SectionVisibility {
    /// Pure function of customer selection and cart size.
    pub fn for_state(customer_selected: bool, cart_len: usize) -> Self {
        let has_items = cart_len > 0;
        SectionVisibility {
            products: customer_selected,
            cashback: has_items,
            checkout: has_items,
        }
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Totals shown under the cart after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub cashback_balance: Money,
    pub redemption: Money,
    pub final_amount: Money,
    /// Cashback the customer will earn on this purchase.
    pub earned_cashback: Money,
    pub sections: SectionVisibility,
}

// =============================================================================
// Submission Payload
// =============================================================================

/// Cart contents in the shape the order form expects.
///
/// `product_ids[i]` and `quantities[i]` describe the i-th cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub product_ids: Vec<String>,
    pub quantities: Vec<i64>,
    pub cashback_used: Money,
}

/// A complete order ready for the submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub customer_id: String,
    pub product_ids: Vec<String>,
    pub quantities: Vec<i64>,
    pub cashback_used: Money,
}

impl OrderSubmission {
    /// Attaches a customer to a cart payload.
    pub fn new(customer_id: impl Into<String>, payload: SubmissionPayload) -> Self {
        OrderSubmission {
            customer_id: customer_id.into(),
            product_ids: payload.product_ids,
            quantities: payload.quantities,
            cashback_used: payload.cashback_used,
        }
    }

    /// URL-form pairs as posted by the page: one `productIds` and one
    /// `quantities` entry per line, in cart order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(2 + self.product_ids.len() * 2);
        fields.push(("customerId", self.customer_id.clone()));
        for (product_id, quantity) in self.product_ids.iter().zip(&self.quantities) {
            fields.push(("productIds", product_id.clone()));
            fields.push(("quantities", quantity.to_string()));
        }
        fields.push(("cashbackUsed", self.cashback_used.to_string()));
        fields
    }

    /// JSON request body (camelCase keys, amounts in cents).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// The cart + cashback calculator for one page session.
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    cart: Cart,
    customer: Option<Customer>,
    /// `None` until the cashier types a value.
    redemption: Option<Money>,
    earn_rate: CashbackRate,
}

impl Checkout {
    /// Creates an empty checkout earning cashback at `earn_rate`.
    pub fn new(earn_rate: CashbackRate) -> Self {
        Checkout {
            cart: Cart::new(),
            customer: None,
            redemption: None,
            earn_rate,
        }
    }

    /// The cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Cart lines in order.
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// The selected customer, if any.
    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// Makes `customer` the buyer. Replaces any earlier selection.
    pub fn select_customer(&mut self, customer: Customer) {
        self.customer = Some(customer);
        self.recompute();
    }

    /// Appends `product` with quantity 1. Always succeeds.
    pub fn add_item(&mut self, product: &Product) -> usize {
        let index = self.cart.add_item(product);
        self.recompute();
        index
    }

    /// Sets a line quantity. Values below 1 are ignored (`Ok(false)`).
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<bool> {
        let applied = self.cart.set_quantity(index, quantity)?;
        self.recompute();
        Ok(applied)
    }

    /// Deletes a line.
    pub fn remove_item(&mut self, index: usize) -> CoreResult<LineItem> {
        let removed = self.cart.remove_item(index)?;
        self.recompute();
        Ok(removed)
    }

    /// Σ quantity × unit price.
    pub fn compute_subtotal(&self) -> Money {
        self.cart.subtotal()
    }

    /// Balance of the selected customer, zero when none is selected.
    pub fn cashback_balance(&self) -> Money {
        self.customer
            .as_ref()
            .map(|c| c.cashback_balance)
            .unwrap_or_default()
    }

    /// Clamps and stores the requested redemption.
    ///
    /// The returned [`Redemption`] carries the warnings the page must show.
    pub fn set_cashback_redemption(&mut self, requested: Money) -> Redemption {
        let redemption =
            cashback::clamp_redemption(requested, self.cashback_balance(), self.compute_subtotal());
        self.redemption = Some(redemption.amount);
        redemption
    }

    /// Current redemption, zero when unset.
    pub fn redemption(&self) -> Money {
        self.redemption.unwrap_or_default()
    }

    /// `max(0, subtotal − redemption)`.
    pub fn compute_final_amount(&self) -> Money {
        cashback::final_amount(self.compute_subtotal(), self.redemption())
    }

    /// Cashback earned on the final amount.
    pub fn earned_cashback(&self) -> Money {
        cashback::earned_cashback(self.compute_final_amount(), self.earn_rate)
    }

    /// Section visibility for the current state.
    pub fn sections(&self) -> SectionVisibility {
        SectionVisibility::for_state(self.customer.is_some(), self.cart.item_count())
    }

    /// Snapshot of all derived values.
    pub fn summary(&self) -> CheckoutSummary {
        CheckoutSummary {
            item_count: self.cart.item_count(),
            total_quantity: self.cart.total_quantity(),
            subtotal: self.compute_subtotal(),
            cashback_balance: self.cashback_balance(),
            redemption: self.redemption(),
            final_amount: self.compute_final_amount(),
            earned_cashback: self.earned_cashback(),
            sections: self.sections(),
        }
    }

    /// Product ids and quantities in cart order, plus the redemption.
    pub fn build_submission_payload(&self) -> SubmissionPayload {
        let items = self.cart.items();
        SubmissionPayload {
            product_ids: items.iter().map(|i| i.product_id.clone()).collect(),
            quantities: items.iter().map(|i| i.quantity).collect(),
            cashback_used: self.redemption(),
        }
    }

    /// Builds the order to submit, refusing what the order service refuses.
    pub fn prepare_order(&self) -> CoreResult<OrderSubmission> {
        let customer = self.customer.as_ref().ok_or(CoreError::NoCustomerSelected)?;
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let payload = self.build_submission_payload();
        cashback::validate_redemption(
            payload.cashback_used,
            customer.cashback_balance,
            self.compute_subtotal(),
        )?;

        Ok(OrderSubmission::new(customer.id.clone(), payload))
    }

    /// Re-applies the redemption bounds after the cart or customer changed.
    ///
    /// Silent: the cashier is only warned about values they typed.
    fn recompute(&mut self) {
        if let Some(stored) = self.redemption {
            let upper = self.cashback_balance().min(self.compute_subtotal());
            if stored > upper {
                self.redemption = Some(upper.max(Money::zero()));
            }
        }
    }
}
