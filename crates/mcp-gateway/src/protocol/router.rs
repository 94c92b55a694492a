//! Message-type router: sends each envelope to the invoke, stream, or
//! heartbeat handler.

use crate::types::{
    GatewayResult, InvokeRequest, MessageType, ProtocolError, RequestEnvelope, ResponseEnvelope,
    StreamRequest,
};

use super::dispatcher::InvokeDispatcher;

pub struct MessageRouter {
    dispatcher: InvokeDispatcher,
}

impl MessageRouter {
    pub fn new(dispatcher: InvokeDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &InvokeDispatcher {
        &self.dispatcher
    }

    /// Produce exactly one response for `envelope`. Only the sub-request
    /// matching the message type is consulted.
    pub async fn route(
        &self,
        request_id: &str,
        envelope: RequestEnvelope,
    ) -> GatewayResult<ResponseEnvelope> {
        match envelope.message_type() {
            MessageType::Invoke => self.handle_invoke(request_id, envelope.invoke_request).await,
            MessageType::Stream => Ok(handle_stream(request_id, envelope.stream_request.as_ref())),
            MessageType::Heartbeat => Ok(handle_heartbeat(request_id)),
            MessageType::Other(kind) => {
                let err = ProtocolError::UnsupportedMessageType(kind);
                tracing::info!(request_id, code = err.code(), "{err}");
                Ok(err.into_envelope(request_id))
            }
        }
    }

    async fn handle_invoke(
        &self,
        request_id: &str,
        invoke: Option<InvokeRequest>,
    ) -> GatewayResult<ResponseEnvelope> {
        let Some((operation, invoke)) = invoke.and_then(|inv| {
            let name = inv.operation_name()?.to_string();
            Some((name, inv))
        }) else {
            let err = ProtocolError::MissingInvokeFields;
            tracing::info!(request_id, code = err.code(), "{err}");
            return Ok(err.into_envelope(request_id));
        };

        self.dispatcher
            .dispatch(request_id, &operation, &invoke.parameters)
            .await
    }
}

/// Single-chunk stream: one final chunk naming the request, no incremental
/// delivery.
fn handle_stream(request_id: &str, stream: Option<&StreamRequest>) -> ResponseEnvelope {
    let operation = stream.and_then(|s| s.operation.as_deref());
    tracing::debug!(request_id, ?operation, "Stream request");
    ResponseEnvelope::stream_chunk(
        request_id,
        format!("Streaming response for request {request_id}"),
        true,
    )
}

fn handle_heartbeat(request_id: &str) -> ResponseEnvelope {
    tracing::trace!(request_id, "Heartbeat");
    ResponseEnvelope::acknowledged(request_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use crate::config::GatewayConfig;
    use crate::operations::OperationRegistry;
    use crate::types::Status;

    fn router() -> MessageRouter {
        let config = GatewayConfig::default().with_simulated_latency(Duration::ZERO);
        let registry = OperationRegistry::standard(&config).unwrap();
        MessageRouter::new(InvokeDispatcher::new(Arc::new(registry), Arc::new(config)))
    }

    fn envelope(value: serde_json::Value) -> RequestEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_heartbeat_has_no_payload() {
        let env = router()
            .route("r1", envelope(json!({ "messageType": "heartbeat" })))
            .await
            .unwrap();
        assert_eq!(env, ResponseEnvelope::acknowledged("r1"));
        assert!(env.invoke_response.is_none());
        assert!(env.stream_response.is_none());
        assert!(env.error.is_none());
    }

    #[tokio::test]
    async fn test_stream_returns_one_final_chunk() {
        let env = router()
            .route(
                "abc",
                envelope(json!({
                    "messageType": "stream",
                    "streamRequest": { "operation": "getBusinessData" }
                })),
            )
            .await
            .unwrap();
        assert_eq!(env.status, Status::Success);
        let chunk = env.stream_response.unwrap();
        assert!(chunk.is_final);
        assert_eq!(chunk.data, "Streaming response for request abc");
    }

    #[tokio::test]
    async fn test_stream_without_stream_request() {
        let env = router()
            .route("s2", envelope(json!({ "messageType": "stream" })))
            .await
            .unwrap();
        assert!(env.stream_response.unwrap().is_final);
    }

    #[tokio::test]
    async fn test_unsupported_message_type() {
        for kind in ["bogus", "", "Invoke", "HEARTBEAT"] {
            let env = router()
                .route("r4", envelope(json!({ "messageType": kind })))
                .await
                .unwrap();
            assert_eq!(env.status, Status::Error);
            assert_eq!(env.request_id.as_deref(), Some("r4"));
            assert_eq!(
                env.error.unwrap().message,
                format!("Unsupported message type: {kind}")
            );
        }
    }

    #[tokio::test]
    async fn test_invoke_missing_fields() {
        for body in [
            json!({ "messageType": "invoke" }),
            json!({ "messageType": "invoke", "invokeRequest": {} }),
            json!({ "messageType": "invoke", "invokeRequest": { "operation": "" } }),
            json!({ "messageType": "invoke", "streamRequest": { "operation": "getBusinessData" } }),
        ] {
            let env = router().route("r5", envelope(body)).await.unwrap();
            assert_eq!(
                env.error.unwrap().message,
                "Invoke request is missing required fields"
            );
        }
    }

    #[tokio::test]
    async fn test_invoke_ignores_stream_request() {
        let env = router()
            .route(
                "r6",
                envelope(json!({
                    "messageType": "invoke",
                    "invokeRequest": { "operation": "list_operations" },
                    "streamRequest": { "operation": "ghost" }
                })),
            )
            .await
            .unwrap();
        assert!(env.is_success());
        assert!(env.invoke_response.is_some());
    }
}
