//! # Cart
//!
//! The ordered list of line items on the checkout page.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Page Action              Operation               Cart Change           │
//! │  ───────────              ─────────               ───────────           │
//! │                                                                         │
//! │  Click product result ──► add_item() ──────────► items.push(line)      │
//! │                                                                         │
//! │  Edit quantity box ─────► set_quantity() ──────► items[i].qty = n      │
//! │                                                   (only 1 <= n <= 999)  │
//! │                                                                         │
//! │  Click trash icon ──────► remove_item() ───────► items.remove(i)       │
//! │                                                                         │
//! │  NOTE: adding the same product twice creates two lines.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::MAX_ITEM_QUANTITY;

/// A product entry in the cart.
///
/// Display fields and the unit price are copied from the product when the
/// line is created and never re-fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub brand: String,
    pub variant: String,
    /// Always >= 1.
    pub quantity: i64,
    /// Price at the moment the product was added (frozen).
    pub unit_price: Money,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a line with quantity 1 from a product.
    pub fn from_product(product: &Product) -> Self {
        LineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            variant: product.variant.clone(),
            quantity: 1,
            unit_price: product.sale_price,
            added_at: Utc::now(),
        }
    }

    /// Quantity × unit price.
    pub fn line_total(&self) -> Money {
        self.unit_price.saturating_mul(self.quantity)
    }

    /// `name - brand (variant)` as shown in the cart table.
    pub fn description(&self) -> String {
        format!("{} - {} ({})", self.name, self.brand, self.variant)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Insertion order is preserved
/// - Every line has quantity >= 1
/// - Duplicate products are NOT merged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Appends a new line for `product` with quantity 1.
    ///
    /// Always succeeds. Returns the index of the new line.
    pub fn add_item(&mut self, product: &Product) -> usize {
        self.items.push(LineItem::from_product(product));
        self.items.len() - 1
    }

    /// Sets the quantity of the line at `index`.
    ///
    /// ## Behavior
    /// - `quantity >= 1`: replaces the quantity, returns `Ok(true)`
    /// - `quantity < 1`: leaves the line untouched, returns `Ok(false)`
    /// - `quantity > MAX_ITEM_QUANTITY`: `CoreError::QuantityTooLarge`
    /// - new subtotal out of range: `CoreError::AmountOverflow`
    /// - `index` out of range: `CoreError::LineNotFound`
    ///
    /// The line is unchanged whenever an error is returned.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<bool> {
        let len = self.items.len();
        if index >= len {
            return Err(CoreError::LineNotFound { index, len });
        }

        if quantity < 1 {
            return Ok(false);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        self.checked_subtotal_with(index, quantity)
            .ok_or(CoreError::AmountOverflow)?;

        self.items[index].quantity = quantity;
        Ok(true)
    }

    /// Subtotal if line `index` had `quantity`, `None` on overflow.
    fn checked_subtotal_with(&self, index: usize, quantity: i64) -> Option<Money> {
        self.items
            .iter()
            .enumerate()
            .try_fold(Money::zero(), |total, (i, line)| {
                let qty = if i == index { quantity } else { line.quantity };
                total.checked_add(line.unit_price.checked_mul(qty)?)
            })
    }

    /// Removes the line at `index`; later lines shift down by one.
    pub fn remove_item(&mut self, index: usize) -> CoreResult<LineItem> {
        if index >= self.items.len() {
            return Err(CoreError::LineNotFound {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Line at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    /// Number of lines (not units).
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of quantity × unit price over all lines. Exact, no rounding;
    /// saturates rather than wrapping.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
