//! # loyalty-core: Pure Business Logic for the Loyalty POS page
//!
//! Cart math and cashback rules for the checkout screen, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Loyalty POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Checkout page (web)                          │   │
//! │  │   Customer search ──► Product search ──► Cart ──► Cashback      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ UiEvent / CheckoutView                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              loyalty-session (PageSession)                      │   │
//! │  │   debounce timers, search channels, notices                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ loyalty-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │   │  money  │ │  cart   │ │ cashback │ │ checkout │ │validate│ │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └──────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Customer and Product records, cashback rate
//! - [`cart`] - Ordered line items
//! - [`cashback`] - Redemption clamping and earning
//! - [`checkout`] - The calculator tying cart, customer and cashback together
//! - [`validation`] - Interpreting raw input text
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use loyalty_core::{Checkout, Customer, Money, Product};
//!
//! let mut checkout = Checkout::default();
//! checkout.select_customer(Customer {
//!     id: "42".into(),
//!     full_name: "Ana Souza".into(),
//!     tax_id: "12345678901".into(),
//!     phone: None,
//!     email: None,
//!     cashback_balance: Money::from_cents(2000),
//! });
//! checkout.add_item(&Product {
//!     id: "7".into(),
//!     name: "Egeo".into(),
//!     brand: "Boticário".into(),
//!     variant: "90ml".into(),
//!     sale_price: Money::from_cents(5000),
//! });
//! checkout.set_quantity(0, 3).unwrap();
//!
//! let redemption = checkout.set_cashback_redemption(Money::from_cents(3000));
//! assert_eq!(redemption.amount, Money::from_cents(2000));
//! assert_eq!(checkout.compute_final_amount(), Money::from_cents(13000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod cashback;
pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, LineItem};
pub use cashback::{Redemption, RedemptionWarning};
pub use checkout::{
    Checkout, CheckoutSummary, OrderSubmission, SectionVisibility, SubmissionPayload,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum characters before a search box queries the server.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Quiet period after the last keystroke before a search is issued.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

/// Largest quantity a single cart line accepts.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Share of the final amount returned as cashback (500 bps = 5%).
pub const DEFAULT_CASHBACK_RATE_BPS: u32 = 500;
