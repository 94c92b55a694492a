//! Error types for the gateway.
//!
//! Two channels: [`ProtocolError`] is an ordinary outcome that becomes an
//! error envelope with a successful transport status, while [`GatewayError`]
//! is a fault that escalates to the top-level request handler and becomes a
//! transport-level internal error.

use std::time::Duration;

use mcp_envelope::{ParameterError, ResponseEnvelope};

/// Stable error codes used in structured logs.
pub mod error_codes {
    pub const UNSUPPORTED_MESSAGE_TYPE: &str = "unsupported_message_type";
    pub const MISSING_INVOKE_FIELDS: &str = "missing_invoke_fields";
    pub const UNSUPPORTED_OPERATION: &str = "unsupported_operation";
    pub const INVALID_REQUEST: &str = "invalid_request";

    pub const INVALID_PARAMS: &str = "invalid_params";
    pub const TIMEOUT: &str = "timeout";
    pub const DUPLICATE_OPERATION: &str = "duplicate_operation";
    pub const CONFIG: &str = "config";
    pub const INTERNAL: &str = "internal";
    pub const TRANSPORT: &str = "transport";
}

/// Recognized envelope that cannot be served. Answered with an error envelope.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Unsupported message type: {0}")]
    UnsupportedMessageType(String),

    #[error("Invoke request is missing required fields")]
    MissingInvokeFields,

    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),
}

impl ProtocolError {
    pub fn code(&self) -> &'static str {
        use error_codes::*;
        match self {
            ProtocolError::UnsupportedMessageType(_) => UNSUPPORTED_MESSAGE_TYPE,
            ProtocolError::MissingInvokeFields => MISSING_INVOKE_FIELDS,
            ProtocolError::UnsupportedOperation(_) => UNSUPPORTED_OPERATION,
        }
    }

    pub fn into_envelope(self, request_id: &str) -> ResponseEnvelope {
        ResponseEnvelope::error(Some(request_id.to_string()), self.to_string())
    }
}

/// Faults raised anywhere below the top-level request handler.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Operation '{operation}' timed out after {}s", .after.as_secs_f64())]
    Timeout { operation: String, after: Duration },

    #[error("Operation already registered: {0}")]
    DuplicateOperation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Internal(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        use error_codes::*;
        match self {
            GatewayError::InvalidParams(_) => INVALID_PARAMS,
            GatewayError::Timeout { .. } => TIMEOUT,
            GatewayError::DuplicateOperation(_) => DUPLICATE_OPERATION,
            GatewayError::Config(_) => CONFIG,
            GatewayError::Internal(_) | GatewayError::Io(_) | GatewayError::Json(_) => INTERNAL,
            GatewayError::Transport(_) => TRANSPORT,
        }
    }

    /// The generic envelope returned with a transport-level internal error.
    pub fn to_envelope(&self) -> ResponseEnvelope {
        ResponseEnvelope::error(None, format!("Internal server error: {self}"))
    }
}

impl From<ParameterError> for GatewayError {
    fn from(e: ParameterError) -> Self {
        GatewayError::InvalidParams(e.to_string())
    }
}

impl From<mcp_envelope::EnvelopeError> for GatewayError {
    fn from(e: mcp_envelope::EnvelopeError) -> Self {
        GatewayError::Internal(e.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
