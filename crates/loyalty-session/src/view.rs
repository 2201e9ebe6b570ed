//! Rendering seam between the page session and whatever draws the page.
//!
//! The session never builds markup. It hands the view plain records after
//! every change and the view decides how to show them.

use loyalty_core::{CheckoutSummary, Customer, LineItem, Product, SectionVisibility};

use crate::search::{SearchKind, SearchResults};

/// A message surfaced to the cashier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Input was adjusted (cashback clamped).
    Warning(String),
    /// Something failed (search request, order submission).
    Error(String),
    /// Neutral confirmation.
    Info(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Warning(msg) | Notice::Error(msg) | Notice::Info(msg) => msg,
        }
    }
}

/// Everything the session asks of the page.
pub trait CheckoutView: Send {
    fn render_customer_results(&mut self, results: &SearchResults<Customer>);

    fn render_product_results(&mut self, results: &SearchResults<Product>);

    /// Shows the selected customer. Use [`Customer::formatted_tax_id`] for
    /// the tax id.
    fn render_selected_customer(&mut self, customer: &Customer);

    /// Redraws the cart table, one row per line in cart order.
    fn render_cart(&mut self, items: &[LineItem]);

    fn render_summary(&mut self, summary: &CheckoutSummary);

    fn set_sections(&mut self, sections: SectionVisibility);

    /// Empties a search box after a pick.
    fn clear_search_input(&mut self, kind: SearchKind);

    /// Writes a corrected amount back into the cashback box.
    fn set_cashback_input(&mut self, value: &str);

    fn notify(&mut self, notice: Notice);
}
