//! `callInternalApi` operation: Call an internal API behind the gateway.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use mcp_envelope::ParameterBag;
use serde_json::{json, Value};

use crate::types::{GatewayResult, OperationDefinition, Parameters};

use super::registry::{InvocationContext, Operation, OperationFuture};

pub const NAME: &str = "callInternalApi";

pub fn definition() -> OperationDefinition {
    OperationDefinition::new(NAME, "Calls an internal API through the API gateway")
        .with_parameter("apiPath", "Path of the internal API, e.g. '/inventory' or '/orders'")
        .with_parameter("method", "HTTP method (optional, defaults to GET)")
        .with_parameter("body", "Request body for POST/PUT calls (optional)")
}

/// Stand-in for the internal API gateway. The response is chosen by
/// substring match on `apiPath`; `method` and `body` are accepted and
/// otherwise ignored.
pub struct CallInternalApi {
    latency: Duration,
}

impl CallInternalApi {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    async fn execute(&self, request_id: &str, params: &Parameters) -> GatewayResult<Value> {
        let api_path = params.optional_str("apiPath")?.unwrap_or_default();
        let method = params.lenient_str("method").unwrap_or("GET");
        let has_body = params.optional_value("body").is_some();
        tracing::debug!(request_id, api_path, method, has_body, "Calling internal API");

        tokio::time::sleep(self.latency).await;

        let response = if api_path.contains("inventory") {
            json!({
                "items": [
                    { "sku": "SKU-001", "name": "Widget", "quantity": 150, "warehouse": "North" },
                    { "sku": "SKU-002", "name": "Gadget", "quantity": 75, "warehouse": "South" },
                    { "sku": "SKU-003", "name": "Gizmo", "quantity": 0, "warehouse": "North" }
                ],
                "totalItems": 225,
                "lowStockItems": ["SKU-003"]
            })
        } else if api_path.contains("orders") {
            json!({
                "totalOrders": 342,
                "pendingOrders": 27,
                "completedOrders": 315,
                "revenue": 48750.25
            })
        } else {
            json!({
                "status": "ok",
                "path": api_path,
                "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
            })
        };

        Ok(response)
    }
}

impl Operation for CallInternalApi {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn with_path(path: &str) -> Parameters {
        let mut params = Parameters::new();
        params.insert("apiPath".into(), json!(path));
        params
    }

    #[tokio::test]
    async fn test_inventory_branch() {
        let op = CallInternalApi::new(Duration::ZERO);
        let result = op.execute("r1", &with_path("/api/v2/inventory/items")).await.unwrap();
        assert_eq!(result["totalItems"], json!(225));
        assert_eq!(result["items"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_orders_branch() {
        let op = CallInternalApi::new(Duration::ZERO);
        let result = op.execute("r1", &with_path("/orders/summary")).await.unwrap();
        assert_eq!(result["totalOrders"], json!(342));
    }

    #[tokio::test]
    async fn test_inventory_wins_over_orders() {
        let op = CallInternalApi::new(Duration::ZERO);
        let result = op.execute("r1", &with_path("/orders/inventory")).await.unwrap();
        assert!(result.get("items").is_some());
    }

    #[tokio::test]
    async fn test_generic_branch() {
        let op = CallInternalApi::new(Duration::ZERO);
        let result = op.execute("r1", &with_path("/health")).await.unwrap();
        assert_eq!(result["status"], json!("ok"));
        assert_eq!(result["path"], json!("/health"));
        assert!(result["timestamp"].is_string());

        let result = op.execute("r2", &Parameters::new()).await.unwrap();
        assert_eq!(result["status"], json!("ok"));
        assert_eq!(result["path"], json!(""));
    }

    #[tokio::test]
    async fn test_match_is_case_sensitive() {
        let op = CallInternalApi::new(Duration::ZERO);
        let result = op.execute("r1", &with_path("/INVENTORY")).await.unwrap();
        assert_eq!(result["status"], json!("ok"));
    }

    #[tokio::test]
    async fn test_method_and_body_are_accepted() {
        let op = CallInternalApi::new(Duration::ZERO);
        let mut params = with_path("/orders");
        params.insert("method".into(), json!("POST"));
        params.insert("body".into(), json!({ "sku": "SKU-001", "quantity": 3 }));
        let result = op.execute("r1", &params).await.unwrap();
        assert_eq!(result["totalOrders"], json!(342));
    }

    #[tokio::test]
    async fn test_non_string_method_is_ignored() {
        let op = CallInternalApi::new(Duration::ZERO);
        let mut params = with_path("/orders");
        params.insert("method".into(), json!(1));
        params.insert("body".into(), json!("raw text"));
        let result = op.execute("r1", &params).await.unwrap();
        assert_eq!(result["totalOrders"], json!(342));
    }
}
