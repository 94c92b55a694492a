//! `triggerLogicApp` operation: Trigger a workflow and report its execution.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use mcp_envelope::ParameterBag;
use serde_json::{json, Value};

use crate::types::{GatewayResult, OperationDefinition, Parameters};

use super::registry::{InvocationContext, Operation, OperationFuture};

pub const NAME: &str = "triggerLogicApp";

const DEFAULT_WORKFLOW: &str = "default-workflow";

pub fn definition() -> OperationDefinition {
    OperationDefinition::new(NAME, "Triggers a Logic App workflow and returns its execution record")
        .with_parameter("workflowName", "Name of the workflow to trigger")
        .with_parameter("inputs", "Input payload passed to the workflow (optional)")
}

/// Stand-in for the workflow service. Every run "succeeds" after a fixed
/// delay with a synthesized execution record.
pub struct TriggerLogicApp {
    latency: Duration,
}

impl TriggerLogicApp {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    async fn execute(&self, request_id: &str, params: &Parameters) -> GatewayResult<Value> {
        let workflow = params
            .optional_str("workflowName")?
            .unwrap_or(DEFAULT_WORKFLOW)
            .to_string();
        let has_inputs = params.optional_value("inputs").is_some();

        let execution_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(request_id, %workflow, %execution_id, has_inputs, "Triggering workflow");

        let start_time = Utc::now();
        tokio::time::sleep(self.latency).await;
        let end_time = Utc::now();

        Ok(json!({
            "executionId": execution_id,
            "workflowName": workflow,
            "status": "Succeeded",
            "startTime": start_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            "endTime": end_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            "outputs": {
                "message": "Workflow executed successfully"
            }
        }))
    }
}

impl Operation for TriggerLogicApp {
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
    use chrono::DateTime;

    #[tokio::test]
    async fn test_echoes_workflow_name() {
        let op = TriggerLogicApp::new(Duration::ZERO);
        let mut params = Parameters::new();
        params.insert("workflowName".into(), json!("invoice-approval"));
        params.insert("inputs".into(), json!({ "invoiceId": 17 }));

        let result = op.execute("r1", &params).await.unwrap();
        assert_eq!(result["workflowName"], json!("invoice-approval"));
        assert_eq!(result["status"], json!("Succeeded"));
        assert!(uuid::Uuid::parse_str(result["executionId"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_defaults_workflow_name() {
        let op = TriggerLogicApp::new(Duration::ZERO);
        let result = op.execute("r1", &Parameters::new()).await.unwrap();
        assert_eq!(result["workflowName"], json!("default-workflow"));
    }

    #[tokio::test]
    async fn test_timestamps_are_ordered() {
        let op = TriggerLogicApp::new(Duration::from_millis(5));
        let result = op.execute("r1", &Parameters::new()).await.unwrap();
        let start = DateTime::parse_from_rfc3339(result["startTime"].as_str().unwrap()).unwrap();
        let end = DateTime::parse_from_rfc3339(result["endTime"].as_str().unwrap()).unwrap();
        assert!(end >= start);
    }

    #[tokio::test]
    async fn test_execution_ids_are_unique() {
        let op = TriggerLogicApp::new(Duration::ZERO);
        let a = op.execute("r1", &Parameters::new()).await.unwrap();
        let b = op.execute("r2", &Parameters::new()).await.unwrap();
        assert_ne!(a["executionId"], b["executionId"]);
    }
}
