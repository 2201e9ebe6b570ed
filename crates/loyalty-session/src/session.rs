//! # Page Session
//!
//! Owns everything one checkout page needs: the calculator, both search
//! channels and the view. Every UI event is handled to completion before the
//! next one; search requests run on their own tasks and only ever report back
//! through the session's event queue.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   SessionHandle ──UiEvent──►┐                                          │
//! │                             │   ┌─────────────────────────────────┐    │
//! │                             ├──►│         PageSession::run        │    │
//! │                             │   │  tokio::select! {               │    │
//! │   search task ─SearchEvent─►┘   │     ui event     → handle()     │    │
//! │        ▲                        │     search event → apply()      │    │
//! │        │                        │  }                              │    │
//! │        │                        └──────┬──────────────┬───────────┘    │
//! │   DebounceTimer fires                  │              │                │
//! │        ▲                               ▼              ▼                │
//! │        └──── SearchChannel ◄──── Checkout       CheckoutView          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use loyalty_core::validation::{parse_cashback_input, parse_quantity_input};
use loyalty_core::{Checkout, CoreError, Customer, Money, Product, Redemption};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{SearchError, SessionError, SessionResult};
use crate::search::{
    CatalogSearch, QueryInput, ResponseOutcome, SearchChannel, SearchEvent, SearchKind,
    SearchResults,
};
use crate::submit::{OrderSubmitter, SubmissionReceipt};
use crate::view::{CheckoutView, Notice};

/// Capacity of the UI event queue created by [`PageSession::start`].
const UI_EVENT_BUFFER: usize = 64;

// =============================================================================
// UI Events
// =============================================================================

/// Something the cashier did on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Customer search box changed.
    CustomerQuery(String),
    /// Product search box changed.
    ProductQuery(String),
    /// A customer result row was clicked.
    SelectCustomer(usize),
    /// A product result row was clicked.
    SelectProduct(usize),
    /// A cart quantity box changed.
    SetQuantity { index: usize, raw: String },
    /// A cart remove button was clicked.
    RemoveItem(usize),
    /// The cashback box changed.
    CashbackInput(String),
    /// The finish-sale button was clicked.
    Submit,
}

// =============================================================================
// Session Handle
// =============================================================================

/// Sends UI events to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    ui_tx: mpsc::Sender<UiEvent>,
}

impl SessionHandle {
    /// Queues an event for the session.
    pub async fn send(&self, event: UiEvent) -> SessionResult<()> {
        self.ui_tx
            .send(event)
            .await
            .map_err(|_| SessionError::ChannelClosed("Page session has ended".into()))
    }
}

// =============================================================================
// Page Session
// =============================================================================

/// Controller for one checkout page.
pub struct PageSession<V> {
    id: Uuid,
    config: SessionConfig,
    checkout: Checkout,
    catalog: Arc<dyn CatalogSearch>,
    submitter: Arc<dyn OrderSubmitter>,
    view: V,
    customers: SearchChannel<Customer>,
    products: SearchChannel<Product>,
    search_tx: mpsc::UnboundedSender<SearchEvent>,
    search_rx: mpsc::UnboundedReceiver<SearchEvent>,
    /// Redemption last written to or accepted from the cashback box.
    shown_redemption: Money,
}

impl<V: CheckoutView> PageSession<V> {
    /// Creates a session and draws the initial (empty) page.
    pub fn new(
        config: SessionConfig,
        catalog: Arc<dyn CatalogSearch>,
        submitter: Arc<dyn OrderSubmitter>,
        view: V,
    ) -> Self {
        let id = Uuid::new_v4();
        let (search_tx, search_rx) = mpsc::unbounded_channel();
        let debounce = config.debounce();
        let min_len = config.search.min_query_len;

        info!(
            session_id = %id,
            debounce_ms = config.search.debounce_ms,
            earn_rate_bps = config.cashback.earn_rate_bps,
            "Page session created"
        );

        let mut session = PageSession {
            id,
            checkout: Checkout::new(config.earn_rate()),
            config,
            catalog,
            submitter,
            view,
            customers: SearchChannel::new(SearchKind::Customers, debounce, min_len),
            products: SearchChannel::new(SearchKind::Products, debounce, min_len),
            search_tx,
            search_rx,
            shown_redemption: Money::zero(),
        };
        session.refresh();
        session
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn customer_results(&self) -> &SearchResults<Customer> {
        self.customers.results()
    }

    pub fn product_results(&self) -> &SearchResults<Product> {
        self.products.results()
    }

    // =========================================================================
    // Event Loop
    // =========================================================================

    /// Spawns the session on the runtime.
    ///
    /// The task ends once every [`SessionHandle`] is dropped and yields the
    /// session back.
    pub fn start(self) -> (SessionHandle, JoinHandle<Self>)
    where
        V: 'static,
    {
        let (ui_tx, ui_rx) = mpsc::channel(UI_EVENT_BUFFER);
        let task = tokio::spawn(self.run(ui_rx));
        (SessionHandle { ui_tx }, task)
    }

    /// Processes UI and search events until the UI channel closes.
    pub async fn run(mut self, mut ui_rx: mpsc::Receiver<UiEvent>) -> Self {
        info!(session_id = %self.id, "Page session started");

        loop {
            tokio::select! {
                maybe_event = ui_rx.recv() => {
                    match maybe_event {
                        Some(event) => self.handle(event).await,
                        None => {
                            info!(session_id = %self.id, "UI channel closed, page session ending");
                            break;
                        }
                    }
                }
                Some(event) = self.search_rx.recv() => {
                    self.apply_search_event(event);
                }
            }
        }

        self
    }

    /// Waits for the next finished search request.
    pub async fn next_search_event(&mut self) -> Option<SearchEvent> {
        self.search_rx.recv().await
    }

    /// Dispatches one UI event.
    pub async fn handle(&mut self, event: UiEvent) {
        debug!(session_id = %self.id, ?event, "Handling UI event");

        match event {
            UiEvent::CustomerQuery(raw) => self.on_customer_query(&raw),
            UiEvent::ProductQuery(raw) => self.on_product_query(&raw),
            UiEvent::SelectCustomer(index) => {
                self.select_customer(index);
            }
            UiEvent::SelectProduct(index) => {
                self.select_product(index);
            }
            UiEvent::SetQuantity { index, raw } => self.set_quantity(index, &raw),
            UiEvent::RemoveItem(index) => self.remove_item(index),
            UiEvent::CashbackInput(raw) => {
                self.set_cashback(&raw);
            }
            UiEvent::Submit => {
                // Failures are already surfaced as notices.
                let _ = self.submit().await;
            }
        }
    }

    // =========================================================================
    // Search Boxes
    // =========================================================================

    /// Customer search box changed.
    pub fn on_customer_query(&mut self, raw: &str) {
        let catalog = Arc::clone(&self.catalog);
        let events = self.search_tx.clone();

        let input = self.customers.on_input(raw, move |seq, query| {
            debug!(seq, query = %query, "Searching customers");
            tokio::spawn(async move {
                let outcome = catalog.search_customers(&query).await;
                if events
                    .send(SearchEvent::Customers { seq, query, outcome })
                    .is_err()
                {
                    debug!(seq, "Session gone, dropping customer results");
                }
            });
        });

        if input == QueryInput::Cleared {
            self.view.render_customer_results(self.customers.results());
        }
    }

    /// Product search box changed.
    pub fn on_product_query(&mut self, raw: &str) {
        let catalog = Arc::clone(&self.catalog);
        let events = self.search_tx.clone();

        let input = self.products.on_input(raw, move |seq, query| {
            debug!(seq, query = %query, "Searching products");
            tokio::spawn(async move {
                let outcome = catalog.search_products(&query).await;
                if events
                    .send(SearchEvent::Products { seq, query, outcome })
                    .is_err()
                {
                    debug!(seq, "Session gone, dropping product results");
                }
            });
        });

        if input == QueryInput::Cleared {
            self.view.render_product_results(self.products.results());
        }
    }

    /// Applies a finished search request to its results list.
    pub fn apply_search_event(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::Customers { seq, query, outcome } => {
                match self.customers.apply(seq, outcome) {
                    ResponseOutcome::Updated => {
                        debug!(seq, query = %query, count = self.customers.results().records().len(), "Customer results");
                        self.view.render_customer_results(self.customers.results());
                    }
                    ResponseOutcome::Failed(e) => self.report_search_failure(SearchKind::Customers, &query, e),
                    ResponseOutcome::Stale => {}
                }
            }
            SearchEvent::Products { seq, query, outcome } => {
                match self.products.apply(seq, outcome) {
                    ResponseOutcome::Updated => {
                        debug!(seq, query = %query, count = self.products.results().records().len(), "Product results");
                        self.view.render_product_results(self.products.results());
                    }
                    ResponseOutcome::Failed(e) => self.report_search_failure(SearchKind::Products, &query, e),
                    ResponseOutcome::Stale => {}
                }
            }
        }
    }

    fn report_search_failure(&mut self, kind: SearchKind, query: &str, err: SearchError) {
        error!(session_id = %self.id, ?kind, query = %query, error = %err, "Search request failed");
        self.view
            .notify(Notice::Error(kind.failure_message().to_string()));
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Picks a customer from the current results. Returns false when the
    /// position is not listed.
    pub fn select_customer(&mut self, index: usize) -> bool {
        let Some(customer) = self.customers.results().get(index).cloned() else {
            warn!(index, "No customer result at position");
            return false;
        };

        info!(
            session_id = %self.id,
            customer_id = %customer.id,
            balance = %customer.cashback_balance,
            "Customer selected"
        );

        self.customers.clear();
        self.view.clear_search_input(SearchKind::Customers);
        self.view.render_customer_results(self.customers.results());
        self.view.render_selected_customer(&customer);

        self.checkout.select_customer(customer);
        self.refresh();
        true
    }

    /// Adds a product from the current results to the cart. Returns false
    /// when the position is not listed.
    pub fn select_product(&mut self, index: usize) -> bool {
        let Some(product) = self.products.results().get(index).cloned() else {
            warn!(index, "No product result at position");
            return false;
        };

        let line = self.checkout.add_item(&product);
        debug!(
            product_id = %product.id,
            price = %product.sale_price,
            line,
            "Product added to cart"
        );

        self.products.clear();
        self.view.clear_search_input(SearchKind::Products);
        self.view.render_product_results(self.products.results());
        self.refresh();
        true
    }

    // =========================================================================
    // Cart Edits
    // =========================================================================

    /// A quantity box changed. Non-numeric text and values below 1 leave the
    /// line as it was.
    pub fn set_quantity(&mut self, index: usize, raw: &str) {
        let Some(quantity) = parse_quantity_input(raw) else {
            debug!(index, raw = %raw, "Ignoring non-numeric quantity");
            self.view.render_cart(self.checkout.items());
            return;
        };

        match self.checkout.set_quantity(index, quantity) {
            Ok(true) => debug!(index, quantity, "Quantity updated"),
            Ok(false) => debug!(index, quantity, "Ignoring quantity below 1"),
            Err(e @ (CoreError::QuantityTooLarge { .. } | CoreError::AmountOverflow)) => {
                warn!(index, quantity, error = %e, "Quantity change rejected");
                self.view.notify(Notice::Warning(e.to_string()));
            }
            Err(e) => warn!(index, error = %e, "Quantity change rejected"),
        }
        self.refresh();
    }

    /// Removes a cart line.
    pub fn remove_item(&mut self, index: usize) {
        match self.checkout.remove_item(index) {
            Ok(line) => {
                debug!(index, product_id = %line.product_id, "Line removed");
                self.refresh();
            }
            Err(e) => warn!(index, error = %e, "Remove rejected"),
        }
    }

    /// The cashback box changed. Amounts over the balance or the subtotal are
    /// clamped, announced and written back into the box.
    pub fn set_cashback(&mut self, raw: &str) -> Redemption {
        let requested = parse_cashback_input(raw);
        let redemption = self.checkout.set_cashback_redemption(requested);

        for warning in &redemption.warnings {
            warn!(
                requested = %redemption.requested,
                applied = %redemption.amount,
                ?warning,
                "Cashback redemption clamped"
            );
            self.view
                .notify(Notice::Warning(warning.message().to_string()));
        }

        if redemption.was_clamped() {
            self.view
                .set_cashback_input(&self.config.format_amount(redemption.amount));
        }
        self.shown_redemption = redemption.amount;

        self.view.render_summary(&self.checkout.summary());
        redemption
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Sends the order. Problems are shown to the cashier and returned.
    pub async fn submit(&mut self) -> SessionResult<SubmissionReceipt> {
        let order = match self.checkout.prepare_order() {
            Ok(order) => order,
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Order not ready");
                self.view.notify(Notice::Error(e.to_string()));
                return Err(e.into());
            }
        };

        info!(
            session_id = %self.id,
            customer_id = %order.customer_id,
            lines = order.product_ids.len(),
            cashback_used = %order.cashback_used,
            total = %self.checkout.compute_final_amount(),
            "Submitting order"
        );

        match self.submitter.submit(&order).await {
            Ok(receipt) => {
                info!(session_id = %self.id, order_id = ?receipt.order_id, "Order accepted");
                let message = receipt
                    .message
                    .clone()
                    .unwrap_or_else(|| "Sale recorded".to_string());
                self.view.notify(Notice::Info(message));
                Ok(receipt)
            }
            Err(e) => {
                error!(session_id = %self.id, error = %e, "Order submission failed");
                self.view.notify(Notice::Error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Redraws the cart, the totals and the section toggles. A redemption
    /// re-clamped by the last change is written back into the cashback box.
    fn refresh(&mut self) {
        let summary = self.checkout.summary();
        self.view.render_cart(self.checkout.items());
        self.view.render_summary(&summary);
        self.view.set_sections(summary.sections);

        if summary.redemption != self.shown_redemption {
            debug!(
                previous = %self.shown_redemption,
                current = %summary.redemption,
                "Redemption re-clamped"
            );
            self.view
                .set_cashback_input(&self.config.format_amount(summary.redemption));
            self.shown_redemption = summary.redemption;
        }
    }
}
