//! Top-level request handler: raw payload in, transport reply out.
//!
//! This is the one place faults are caught. Decode failures become a
//! bad-request reply; faults from routing, dispatch, or encoding (including a
//! panicking operation) become an internal-error reply.

use std::sync::Arc;
use std::time::Instant;

use mcp_envelope::{decode_request, encode_response};

use crate::config::GatewayConfig;
use crate::operations::OperationRegistry;
use crate::types::{GatewayError, GatewayResult, RequestEnvelope, ResponseEnvelope};

use super::dispatcher::InvokeDispatcher;
use super::router::MessageRouter;

/// Body of the bad-request reply.
pub const INVALID_REQUEST_FORMAT: &str = "Invalid request format";

const FALLBACK_INTERNAL_ERROR: &[u8] =
    br#"{"status":"error","error":{"message":"Internal server error"}}"#;

/// Transport-level outcome of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    Ok,
    BadRequest,
    InternalError,
}

impl ReplyStatus {
    pub fn http_status(self) -> u16 {
        match self {
            ReplyStatus::Ok => 200,
            ReplyStatus::BadRequest => 400,
            ReplyStatus::InternalError => 500,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ReplyStatus::BadRequest => "text/plain; charset=utf-8",
            ReplyStatus::Ok | ReplyStatus::InternalError => "application/json",
        }
    }
}

/// Encoded reply ready for a transport to write.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: ReplyStatus,
    pub body: Vec<u8>,
}

impl Reply {
    fn bad_request() -> Self {
        Self {
            status: ReplyStatus::BadRequest,
            body: INVALID_REQUEST_FORMAT.as_bytes().to_vec(),
        }
    }

    fn internal(fault: &GatewayError) -> Self {
        let body = encode_response(&fault.to_envelope())
            .unwrap_or_else(|_| FALLBACK_INTERNAL_ERROR.to_vec());
        Self {
            status: ReplyStatus::InternalError,
            body,
        }
    }
}

/// Entry point shared by every transport. Cheap to clone.
#[derive(Clone)]
pub struct RequestHandler {
    router: Arc<MessageRouter>,
}

impl RequestHandler {
    pub fn new(registry: OperationRegistry, config: GatewayConfig) -> Self {
        let dispatcher = InvokeDispatcher::new(Arc::new(registry), Arc::new(config));
        Self {
            router: Arc::new(MessageRouter::new(dispatcher)),
        }
    }

    /// Handler over the reference operation catalog.
    pub fn standard(config: GatewayConfig) -> GatewayResult<Self> {
        let registry = OperationRegistry::standard(&config)?;
        Ok(Self::new(registry, config))
    }

    pub fn registry(&self) -> &OperationRegistry {
        self.router.dispatcher().registry()
    }

    pub fn config(&self) -> &GatewayConfig {
        self.router.dispatcher().config()
    }

    /// Decode, route, and encode one raw payload.
    pub async fn handle_payload(&self, payload: &[u8]) -> Reply {
        let envelope = match decode_request(payload) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(bytes = payload.len(), "Rejected request: {e}");
                return Reply::bad_request();
            }
        };

        let response = match self.handle_envelope(envelope).await {
            Ok(response) => response,
            Err(fault) => return Reply::internal(&fault),
        };

        match encode_response(&response) {
            Ok(body) => Reply {
                status: ReplyStatus::Ok,
                body,
            },
            Err(e) => {
                let fault = GatewayError::from(e);
                tracing::error!(code = fault.code(), "Failed to encode response: {fault}");
                Reply::internal(&fault)
            }
        }
    }

    /// Route a decoded envelope. Routing runs on its own task so a panic in
    /// an operation surfaces here as a fault.
    pub async fn handle_envelope(
        &self,
        envelope: RequestEnvelope,
    ) -> GatewayResult<ResponseEnvelope> {
        let request_id = envelope
            .request_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let message_type = envelope.message_type.clone();
        let started = Instant::now();

        let router = Arc::clone(&self.router);
        let task_request_id = request_id.clone();
        let task = tokio::spawn(async move { router.route(&task_request_id, envelope).await });

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(join) => Err(GatewayError::Internal(describe_join_error(join))),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(response) => tracing::info!(
                request_id = %request_id,
                message_type = %message_type,
                status = ?response.status,
                elapsed_ms,
                "Handled request"
            ),
            Err(fault) => tracing::error!(
                request_id = %request_id,
                message_type = %message_type,
                code = fault.code(),
                elapsed_ms,
                "Request failed: {fault}"
            ),
        }

        outcome
    }
}

fn describe_join_error(join: tokio::task::JoinError) -> String {
    if join.is_cancelled() {
        return "request task was cancelled".to_string();
    }
    let panic = join.into_panic();
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "operation panicked".to_string()
    }
}
