//! # loyalty-session: Checkout Page Controller
//!
//! Runs one checkout page on top of [`loyalty_core::Checkout`]: debounced
//! customer and product search, cart edits, cashback entry and order
//! submission.
//!
//! ## Modules
//!
//! - [`session`] - `PageSession`, the event loop and its handlers
//! - [`search`] - Search channels, request sequencing, the `CatalogSearch` seam
//! - [`debounce`] - Restartable one-shot timer
//! - [`view`] - The `CheckoutView` rendering seam and notices
//! - [`submit`] - The `OrderSubmitter` seam
//! - [`config`] - Layered configuration (defaults, TOML, environment)
//! - [`telemetry`] - Tracing subscriber setup
//! - [`error`] - Session error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use loyalty_session::{PageSession, SessionConfig, UiEvent};
//!
//! loyalty_session::telemetry::init_tracing();
//! let config = SessionConfig::load_or_default(None);
//! let session = PageSession::new(config, Arc::new(catalog), Arc::new(orders), page);
//! let (handle, task) = session.start();
//!
//! handle.send(UiEvent::CustomerQuery("ana".into())).await?;
//! ```

pub mod config;
pub mod debounce;
pub mod error;
pub mod search;
pub mod session;
pub mod submit;
pub mod telemetry;
pub mod view;

pub use config::SessionConfig;
pub use debounce::DebounceTimer;
pub use error::{SearchError, SessionError, SessionResult, SubmitError};
pub use search::{CatalogSearch, SearchChannel, SearchEvent, SearchKind, SearchResults};
pub use session::{PageSession, SessionHandle, UiEvent};
pub use submit::{OrderSubmitter, SubmissionReceipt};
pub use view::{CheckoutView, Notice};
