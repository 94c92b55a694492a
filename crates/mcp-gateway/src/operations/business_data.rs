//! `getBusinessData` operation: Retrieve a business analytics snapshot.

use std::time::Duration;

use mcp_envelope::ParameterBag;
use serde_json::{json, Value};

use crate::types::{GatewayResult, OperationDefinition, Parameters};

use super::registry::{InvocationContext, Operation, OperationFuture};

pub const NAME: &str = "getBusinessData";

pub fn definition() -> OperationDefinition {
    OperationDefinition::new(
        NAME,
        "Retrieves business analytics data: customer count, quarterly sales, and top products",
    )
    .with_parameter(
        "period",
        "Reporting period, e.g. 'Q1-2024' or 'last-30-days' (optional)",
    )
}

/// Stand-in for the analytics backend. Returns a fixed snapshot after a
/// fixed delay.
pub struct GetBusinessData {
    latency: Duration,
}

impl GetBusinessData {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    async fn execute(&self, request_id: &str, params: &Parameters) -> GatewayResult<Value> {
        // Accepted but not yet applied to the snapshot.
        let period = params.lenient_str("period");
        tracing::debug!(request_id, ?period, "Fetching business data");

        tokio::time::sleep(self.latency).await;

        Ok(json!({
            "customerCount": 1250,
            "salesData": [
                { "quarter": "Q1", "amount": 125000 },
                { "quarter": "Q2", "amount": 138000 },
                { "quarter": "Q3", "amount": 142500 },
                { "quarter": "Q4", "amount": 156000 }
            ],
            "topProducts": ["Product A", "Product B", "Product C"]
        }))
    }
}

impl Operation for GetBusinessData {
    fn definition(&self) -> OperationDefinition {
        definition()
    }

    fn invoke<'a>(
        &'a self,
        ctx: InvocationContext<'a>,
        params: &'a Parameters,
    ) -> OperationFuture<'a> {
        Box::pin(self.execute(ctx.request_id, params))
    }
}
