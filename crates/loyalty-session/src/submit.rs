//! Order submission seam.

use async_trait::async_trait;
use loyalty_core::OrderSubmission;
use serde::{Deserialize, Serialize};

use crate::error::SubmitError;

/// What the order service returns for an accepted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Identifier of the recorded sale, when the service reports one.
    #[serde(default)]
    pub order_id: Option<String>,

    /// Confirmation text to show the cashier.
    #[serde(default)]
    pub message: Option<String>,
}

/// Sends finished orders to the order service.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit(&self, order: &OrderSubmission) -> Result<SubmissionReceipt, SubmitError>;
}
