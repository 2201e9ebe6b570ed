//! # Domain Types
//!
//! Records delivered by the search endpoints, plus the cashback rate.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────────┐                     │
//! │  │      Customer       │   │       Product       │                     │
//! │  │  ─────────────────  │   │  ─────────────────  │                     │
//! │  │  id                 │   │  id                 │                     │
//! │  │  full_name          │   │  name, brand        │                     │
//! │  │  tax_id (CPF)       │   │  variant ("100ml")  │                     │
//! │  │  cashback_balance   │   │  sale_price         │                     │
//! │  └─────────────────────┘   └─────────────────────┘                     │
//! │                                                                         │
//! │  Both are read-only once selected. The cart copies what it needs.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Cashback Rate
// =============================================================================

/// Cashback earning rate in basis points (500 = 5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashbackRate(u32);

impl CashbackRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        CashbackRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

impl Default for CashbackRate {
    fn default() -> Self {
        CashbackRate(crate::DEFAULT_CASHBACK_RATE_BPS)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A loyalty customer as returned by the customer search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub full_name: String,
    /// Brazilian CPF, 11 digits, stored unformatted.
    pub tax_id: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Cashback currently available for redemption.
    pub cashback_balance: Money,
}

impl Customer {
    /// Tax id in the `###.###.###-##` display mask.
    ///
    /// Values that are not exactly 11 digits are shown as stored.
    ///
    /// ## Example
    /// ```rust
    /// # use loyalty_core::{Customer, Money};
    /// let customer = Customer {
    ///     id: "7".into(),
    ///     full_name: "Ana Souza".into(),
    ///     tax_id: "12345678901".into(),
    ///     phone: None,
    ///     email: None,
    ///     cashback_balance: Money::zero(),
    /// };
    /// assert_eq!(customer.formatted_tax_id(), "123.456.789-01");
    /// ```
    pub fn formatted_tax_id(&self) -> String {
        let id = self.tax_id.as_str();
        if id.len() != 11 || !id.bytes().all(|b| b.is_ascii_digit()) {
            return id.to_string();
        }
        format!("{}.{}.{}-{}", &id[0..3], &id[3..6], &id[6..9], &id[9..11])
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as returned by the product search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    /// Perfume name shown to the cashier.
    pub name: String,
    pub brand: String,
    /// Size label such as "100ml".
    pub variant: String,
    /// Current sale price. Frozen into the line item when added.
    pub sale_price: Money,
}

impl Product {
    /// One-line description: `name - brand (variant)`.
    pub fn description(&self) -> String {
        format!("{} - {} ({})", self.name, self.brand, self.variant)
    }
}
