//! Invoke dispatcher: resolves an operation name and runs its handler.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::operations::{InvocationContext, OperationRegistry};
use crate::types::{
    GatewayError, GatewayResult, Parameters, ProtocolError, ResponseEnvelope,
};

pub struct InvokeDispatcher {
    registry: Arc<OperationRegistry>,
    config: Arc<GatewayConfig>,
}

impl InvokeDispatcher {
    pub fn new(registry: Arc<OperationRegistry>, config: Arc<GatewayConfig>) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run `operation` with `params`. An unknown name yields an error
    /// envelope; a handler failure is returned as a fault untouched.
    pub async fn dispatch(
        &self,
        request_id: &str,
        operation: &str,
        params: &Parameters,
    ) -> GatewayResult<ResponseEnvelope> {
        let Some(handler) = self.registry.get(operation) else {
            let err = ProtocolError::UnsupportedOperation(operation.to_string());
            tracing::info!(request_id, operation, code = err.code(), "Unknown operation");
            return Ok(err.into_envelope(request_id));
        };

        let ctx = InvocationContext {
            request_id,
            registry: &self.registry,
            config: &self.config,
        };

        tracing::debug!(request_id, operation, params = params.len(), "Dispatching operation");

        let call = handler.invoke(ctx, params);
        let result = match self.config.operation_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                GatewayError::Timeout {
                    operation: operation.to_string(),
                    after: limit,
                }
            })??,
            None => call.await?,
        };

        Ok(ResponseEnvelope::invoke_success(request_id, result))
    }
}
