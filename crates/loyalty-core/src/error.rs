//! # Error Types
//!
//! Domain-specific error types for loyalty-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  loyalty-core errors (this file)                                       │
//! │  ├── CoreError        - Cart and checkout rule violations              │
//! │  └── ValidationError  - Text input that cannot be interpreted          │
//! │                                                                         │
//! │  loyalty-session errors (separate crate)                               │
//! │  └── SessionError     - Search, submission and config failures         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → Notice → View      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clamping a cashback request is NOT an error. It is a policy that produces
//! warnings (see [`crate::cashback::RedemptionWarning`]).

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A cart operation referenced a row that does not exist.
    ///
    /// ## When This Occurs
    /// - A quantity edit or remove click arrives for a row that was already
    ///   removed by an earlier event
    #[error("No cart line at position {index} (cart has {len} lines)")]
    LineNotFound { index: usize, len: usize },

    /// The order cannot be submitted without a customer.
    #[error("A customer must be selected before checkout")]
    NoCustomerSelected,

    /// A quantity above the per-line limit was entered.
    #[error("Quantity {quantity} exceeds the maximum of {max} per line")]
    QuantityTooLarge { quantity: i64, max: i64 },

    /// The cart total would leave the representable range.
    #[error("Cart total is too large")]
    AmountOverflow,

    /// The order cannot be submitted with an empty cart.
    #[error("The sale must contain at least one item")]
    EmptyCart,

    /// The cashback amount attached to an order breaks the redemption rules.
    ///
    /// ## When This Occurs
    /// Only when an order is assembled by hand. The checkout calculator
    /// clamps every request, so a prepared order never carries one.
    #[error("Invalid cashback redemption of {amount}: {reason}")]
    InvalidRedemption { amount: Money, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., letters in a money field).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
