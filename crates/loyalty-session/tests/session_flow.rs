//! End-to-end page sessions against in-memory collaborators.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use loyalty_core::{
    CheckoutSummary, CoreError, Customer, LineItem, Money, OrderSubmission, Product,
    SectionVisibility,
};
use loyalty_session::{
    CatalogSearch, CheckoutView, Notice, OrderSubmitter, PageSession, SearchError, SearchEvent,
    SearchKind, SearchResults, SessionConfig, SessionError, SubmissionReceipt, SubmitError,
    UiEvent,
};

// =============================================================================
// Fakes
// =============================================================================

#[derive(Default)]
struct FakeCatalog {
    customers: Vec<Customer>,
    products: Vec<Product>,
    /// Artificial latency per query.
    delays: HashMap<String, Duration>,
    failing: bool,
    queries: Mutex<Vec<String>>,
}

impl FakeCatalog {
    fn standard() -> Self {
        FakeCatalog {
            customers: vec![
                customer("c-1", "Ana Souza", 2000),
                customer("c-2", "Bruno Lima", 10000),
            ],
            products: vec![
                product("p-1", "Egeo", "90ml", 5000),
                product("p-2", "Egeo Dolce", "50ml", 3000),
                product("p-3", "Malbec", "100ml", 18990),
            ],
            ..Default::default()
        }
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    async fn pause_for(&self, query: &str) -> Result<(), SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing {
            return Err(SearchError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSearch for FakeCatalog {
    async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, SearchError> {
        self.pause_for(query).await?;
        let needle = query.to_lowercase();
        Ok(self
            .customers
            .iter()
            .filter(|c| c.full_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn search_products(&self, query: &str) -> Result<Vec<Product>, SearchError> {
        self.pause_for(query).await?;
        let needle = query.to_lowercase();
        Ok(self
            .products
            .iter()
            .filter(|p| {
                format!("{} {}", p.name, p.variant)
                    .to_lowercase()
                    .contains(&needle)
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct FakeOrders {
    reject_with: Option<SubmitError>,
    received: Mutex<Vec<OrderSubmission>>,
}

impl FakeOrders {
    fn received(&self) -> Vec<OrderSubmission> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderSubmitter for FakeOrders {
    async fn submit(&self, order: &OrderSubmission) -> Result<SubmissionReceipt, SubmitError> {
        if let Some(err) = &self.reject_with {
            return Err(err.clone());
        }
        self.received.lock().unwrap().push(order.clone());
        Ok(SubmissionReceipt {
            order_id: Some("v-1".into()),
            message: None,
        })
    }
}

#[derive(Debug, Default)]
struct RecordingView {
    customer_results: Option<SearchResults<Customer>>,
    product_results: Option<SearchResults<Product>>,
    selected: Option<Customer>,
    cart: Vec<LineItem>,
    summary: Option<CheckoutSummary>,
    sections: SectionVisibility,
    cleared_inputs: Vec<SearchKind>,
    cashback_input: Option<String>,
    notices: Vec<Notice>,
}

impl CheckoutView for RecordingView {
    fn render_customer_results(&mut self, results: &SearchResults<Customer>) {
        self.customer_results = Some(results.clone());
    }

    fn render_product_results(&mut self, results: &SearchResults<Product>) {
        self.product_results = Some(results.clone());
    }

    fn render_selected_customer(&mut self, customer: &Customer) {
        self.selected = Some(customer.clone());
    }

    fn render_cart(&mut self, items: &[LineItem]) {
        self.cart = items.to_vec();
    }

    fn render_summary(&mut self, summary: &CheckoutSummary) {
        self.summary = Some(summary.clone());
    }

    fn set_sections(&mut self, sections: SectionVisibility) {
        self.sections = sections;
    }

    fn clear_search_input(&mut self, kind: SearchKind) {
        self.cleared_inputs.push(kind);
    }

    fn set_cashback_input(&mut self, value: &str) {
        self.cashback_input = Some(value.to_string());
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

fn customer(id: &str, name: &str, balance_cents: i64) -> Customer {
    Customer {
        id: id.into(),
        full_name: name.into(),
        tax_id: "12345678901".into(),
        phone: None,
        email: None,
        cashback_balance: Money::from_cents(balance_cents),
    }
}

fn product(id: &str, name: &str, variant: &str, price_cents: i64) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        brand: "Boticário".into(),
        variant: variant.into(),
        sale_price: Money::from_cents(price_cents),
    }
}

fn session_with(
    catalog: Arc<FakeCatalog>,
    orders: Arc<FakeOrders>,
) -> PageSession<RecordingView> {
    PageSession::new(
        SessionConfig::default(),
        catalog,
        orders,
        RecordingView::default(),
    )
}

fn session_with_config(config: SessionConfig) -> PageSession<RecordingView> {
    PageSession::new(
        config,
        Arc::new(FakeCatalog::standard()),
        Arc::new(FakeOrders::default()),
        RecordingView::default(),
    )
}

/// Runs a customer search and picks the first hit.
async fn pick_customer(session: &mut PageSession<RecordingView>, query: &str) {
    session.on_customer_query(query);
    let event = session.next_search_event().await.unwrap();
    session.apply_search_event(event);
    assert!(session.select_customer(0));
}

/// Runs a product search and adds the first hit to the cart.
async fn pick_product(session: &mut PageSession<RecordingView>, query: &str) {
    session.on_product_query(query);
    let event = session.next_search_event().await.unwrap();
    session.apply_search_event(event);
    assert!(session.select_product(0));
}

fn summary(session: &PageSession<RecordingView>) -> CheckoutSummary {
    session.view().summary.clone().unwrap()
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_initial_render_hides_sections() {
    let session = session_with(Arc::new(FakeCatalog::standard()), Arc::default());
    let view = session.view();

    assert_eq!(view.sections, SectionVisibility::default());
    assert_eq!(summary(&session).subtotal, Money::zero());
    assert!(view.cart.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_customer_search_is_debounced() {
    let catalog = Arc::new(FakeCatalog::standard());
    let mut session = session_with(catalog.clone(), Arc::default());

    for raw in ["a", "an", "ana"] {
        session.on_customer_query(raw);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(catalog.queries().is_empty());

    let event = session.next_search_event().await.unwrap();
    assert_eq!(event.kind(), SearchKind::Customers);
    session.apply_search_event(event);

    assert_eq!(catalog.queries(), vec!["ana".to_string()]);
    let results = session.view().customer_results.clone().unwrap();
    assert_eq!(results.records().len(), 1);
    assert_eq!(results.records()[0].full_name, "Ana Souza");
}

#[tokio::test(start_paused = true)]
async fn test_short_query_clears_results() {
    let catalog = Arc::new(FakeCatalog::standard());
    let mut session = session_with(catalog.clone(), Arc::default());

    session.on_customer_query("ana");
    let event = session.next_search_event().await.unwrap();
    session.apply_search_event(event);
    assert_eq!(session.customer_results().records().len(), 1);

    session.on_customer_query(" a ");
    assert!(session.customer_results().is_cleared());
    assert_eq!(
        session.view().customer_results,
        Some(SearchResults::Cleared)
    );

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(catalog.queries().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_empty_results_show_no_results() {
    let mut session = session_with(Arc::new(FakeCatalog::standard()), Arc::default());

    session.on_product_query("perfume inexistente");
    let event = session.next_search_event().await.unwrap();
    session.apply_search_event(event);

    assert_eq!(session.view().product_results, Some(SearchResults::NoResults));
    assert!(!session.select_product(0));
}

#[tokio::test(start_paused = true)]
async fn test_stale_search_response_is_dropped() {
    let mut catalog = FakeCatalog::standard();
    catalog
        .delays
        .insert("egeo".to_string(), Duration::from_secs(2));
    let mut session = session_with(Arc::new(catalog), Arc::default());

    session.on_product_query("egeo");
    tokio::time::sleep(Duration::from_millis(600)).await;
    session.on_product_query("egeo 90");
    tokio::time::sleep(Duration::from_millis(600)).await;

    let fresh = session.next_search_event().await.unwrap();
    let fresh_seq = fresh.seq();
    session.apply_search_event(fresh);
    assert_eq!(session.product_results().records().len(), 1);

    let stale = session.next_search_event().await.unwrap();
    assert!(stale.seq() < fresh_seq);
    session.apply_search_event(stale);

    let shown = session.view().product_results.clone().unwrap();
    assert_eq!(shown.records().len(), 1);
    assert_eq!(shown.records()[0].id, "p-1");
}

#[tokio::test(start_paused = true)]
async fn test_search_failure_notifies_once() {
    let catalog = FakeCatalog {
        failing: true,
        ..FakeCatalog::standard()
    };
    let mut session = session_with(Arc::new(catalog), Arc::default());

    session.on_customer_query("ana");
    let event = session.next_search_event().await.unwrap();
    assert!(matches!(
        &event,
        SearchEvent::Customers { outcome: Err(_), .. }
    ));
    session.apply_search_event(event);

    assert_eq!(
        session.view().notices,
        vec![Notice::Error("Error searching customers".into())]
    );
    assert!(session.customer_results().is_cleared());
}

// =============================================================================
// Cart and Cashback
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_select_customer_opens_product_search() {
    let mut session = session_with(Arc::new(FakeCatalog::standard()), Arc::default());

    pick_customer(&mut session, "ana").await;

    let view = session.view();
    assert_eq!(view.selected.as_ref().map(|c| c.id.as_str()), Some("c-1"));
    assert_eq!(
        view.selected.as_ref().map(|c| c.formatted_tax_id()),
        Some("123.456.789-01".to_string())
    );
    assert_eq!(view.cleared_inputs, vec![SearchKind::Customers]);
    assert_eq!(view.customer_results, Some(SearchResults::Cleared));
    assert!(view.sections.products);
    assert!(!view.sections.cashback);
    assert_eq!(summary(&session).cashback_balance, Money::from_cents(2000));
}

#[tokio::test(start_paused = true)]
async fn test_add_quantity_remove_flow() {
    let mut session = session_with(Arc::new(FakeCatalog::standard()), Arc::default());
    pick_customer(&mut session, "ana").await;

    pick_product(&mut session, "egeo 90").await;
    assert_eq!(summary(&session).subtotal, Money::from_cents(5000));
    assert!(session.view().sections.checkout);

    session.set_quantity(0, "3");
    assert_eq!(summary(&session).subtotal, Money::from_cents(15000));

    session.set_quantity(0, "0");
    session.set_quantity(0, "abc");
    session.set_quantity(7, "2");
    assert_eq!(session.view().cart[0].quantity, 3);
    assert_eq!(summary(&session).subtotal, Money::from_cents(15000));

    pick_product(&mut session, "malbec").await;
    assert_eq!(session.view().cart.len(), 2);
    assert_eq!(summary(&session).subtotal, Money::from_cents(33990));

    session.remove_item(0);
    assert_eq!(session.view().cart.len(), 1);
    assert_eq!(session.view().cart[0].product_id, "p-3");
    assert_eq!(summary(&session).subtotal, Money::from_cents(18990));

    session.remove_item(0);
    assert!(session.view().cart.is_empty());
    assert!(!session.view().sections.checkout);
    assert_eq!(summary(&session).final_amount, Money::zero());
}

#[tokio::test(start_paused = true)]
async fn test_cashback_clamped_to_balance() {
    let mut session = session_with(Arc::new(FakeCatalog::standard()), Arc::default());
    pick_customer(&mut session, "ana").await;
    pick_product(&mut session, "egeo 90").await;
    session.set_quantity(0, "3");

    let redemption = session.set_cashback("30");

    assert_eq!(redemption.amount, Money::from_cents(2000));
    let view = session.view();
    assert_eq!(
        view.notices,
        vec![Notice::Warning(
            "Requested cashback exceeds the customer's available balance".into()
        )]
    );
    assert_eq!(view.cashback_input.as_deref(), Some("20.00"));

    let totals = summary(&session);
    assert_eq!(totals.final_amount, Money::from_cents(13000));
    assert_eq!(totals.earned_cashback, Money::from_cents(650));
}

#[tokio::test(start_paused = true)]
async fn test_cashback_clamped_to_subtotal() {
    let mut session = session_with(Arc::new(FakeCatalog::standard()), Arc::default());
    pick_customer(&mut session, "bruno").await;
    pick_product(&mut session, "egeo 90").await;

    let redemption = session.set_cashback("80,00");

    assert_eq!(redemption.amount, Money::from_cents(5000));
    assert_eq!(
        session.view().notices,
        vec![Notice::Warning(
            "Requested cashback exceeds the purchase subtotal".into()
        )]
    );
    assert_eq!(session.view().cashback_input.as_deref(), Some("50.00"));
    assert_eq!(summary(&session).final_amount, Money::zero());
}

#[tokio::test(start_paused = true)]
async fn test_huge_quantity_is_refused_with_notice() {
    let mut session = session_with(Arc::new(FakeCatalog::standard()), Arc::default());
    pick_customer(&mut session, "ana").await;
    pick_product(&mut session, "egeo 90").await;
    session.set_quantity(0, "3");

    session.set_quantity(0, "1000000000000000000");

    assert_eq!(session.view().cart[0].quantity, 3);
    assert_eq!(summary(&session).subtotal, Money::from_cents(15000));
    assert_eq!(
        session.view().notices,
        vec![Notice::Warning(
            "Quantity 1000000000000000000 exceeds the maximum of 999 per line".into()
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn test_clamped_cashback_uses_configured_separator() {
    let mut config = SessionConfig::default();
    config.currency.decimal_separator = ',';
    let mut session = session_with_config(config);
    pick_customer(&mut session, "ana").await;
    pick_product(&mut session, "egeo 90").await;
    session.set_quantity(0, "3");

    session.set_cashback("30");

    assert_eq!(session.view().cashback_input.as_deref(), Some("20,00"));
}

#[tokio::test(start_paused = true)]
async fn test_cart_shrink_rewrites_cashback_box() {
    let mut session = session_with(Arc::new(FakeCatalog::standard()), Arc::default());
    pick_customer(&mut session, "bruno").await;
    pick_product(&mut session, "egeo 90").await;
    pick_product(&mut session, "malbec").await;

    session.set_cashback("80");
    assert_eq!(session.view().cashback_input, None);

    session.remove_item(1);

    assert_eq!(session.view().cashback_input.as_deref(), Some("50.00"));
    let totals = summary(&session);
    assert_eq!(totals.redemption, Money::from_cents(5000));
    assert_eq!(totals.final_amount, Money::zero());
    assert!(session.view().notices.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_valid_cashback_is_silent() {
    let mut session = session_with(Arc::new(FakeCatalog::standard()), Arc::default());
    pick_customer(&mut session, "bruno").await;
    pick_product(&mut session, "egeo 90").await;

    session.set_cashback("12.5");

    assert!(session.view().notices.is_empty());
    assert_eq!(session.view().cashback_input, None);
    assert_eq!(summary(&session).final_amount, Money::from_cents(3750));
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_submit_sends_order() {
    let orders = Arc::new(FakeOrders::default());
    let mut session = session_with(Arc::new(FakeCatalog::standard()), orders.clone());
    pick_customer(&mut session, "bruno").await;
    pick_product(&mut session, "egeo 90").await;
    pick_product(&mut session, "malbec").await;
    session.set_quantity(1, "2");
    session.set_cashback("10");

    let receipt = session.submit().await.unwrap();

    assert_eq!(receipt.order_id.as_deref(), Some("v-1"));
    let received = orders.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].customer_id, "c-2");
    assert_eq!(received[0].product_ids, vec!["p-1", "p-3"]);
    assert_eq!(received[0].quantities, vec![1, 2]);
    assert_eq!(received[0].cashback_used, Money::from_cents(1000));
    assert_eq!(
        session.view().notices.last(),
        Some(&Notice::Info("Sale recorded".into()))
    );
}

#[tokio::test(start_paused = true)]
async fn test_submit_with_empty_cart_is_rejected() {
    let orders = Arc::new(FakeOrders::default());
    let mut session = session_with(Arc::new(FakeCatalog::standard()), orders.clone());
    pick_customer(&mut session, "ana").await;

    let err = session.submit().await.unwrap_err();

    assert!(matches!(err, SessionError::Core(CoreError::EmptyCart)));
    assert!(orders.received().is_empty());
    assert_eq!(
        session.view().notices,
        vec![Notice::Error(
            "The sale must contain at least one item".into()
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn test_submit_rejection_is_reported() {
    let orders = Arc::new(FakeOrders {
        reject_with: Some(SubmitError::Rejected("insufficient balance".into())),
        ..Default::default()
    });
    let mut session = session_with(Arc::new(FakeCatalog::standard()), orders);
    pick_customer(&mut session, "ana").await;
    pick_product(&mut session, "egeo 90").await;

    let err = session.submit().await.unwrap_err();

    assert!(matches!(err, SessionError::Submit(SubmitError::Rejected(_))));
    assert_eq!(
        session.view().notices,
        vec![Notice::Error("Order rejected: insufficient balance".into())]
    );
}

// =============================================================================
// Event Loop
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_event_loop_full_sale() {
    let orders = Arc::new(FakeOrders::default());
    let session = session_with(Arc::new(FakeCatalog::standard()), orders.clone());
    let (handle, task) = session.start();

    handle
        .send(UiEvent::CustomerQuery("ana".into()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    handle.send(UiEvent::SelectCustomer(0)).await.unwrap();

    handle
        .send(UiEvent::ProductQuery("egeo 90".into()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    handle.send(UiEvent::SelectProduct(0)).await.unwrap();

    handle
        .send(UiEvent::SetQuantity {
            index: 0,
            raw: "2".into(),
        })
        .await
        .unwrap();
    handle
        .send(UiEvent::CashbackInput("5".into()))
        .await
        .unwrap();
    handle.send(UiEvent::Submit).await.unwrap();
    drop(handle);

    let session = task.await.unwrap();

    let received = orders.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].quantities, vec![2]);
    assert_eq!(received[0].cashback_used, Money::from_cents(500));
    assert_eq!(
        session.checkout().compute_final_amount(),
        Money::from_cents(9500)
    );
}
