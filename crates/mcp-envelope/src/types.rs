//! Core data types for request and response envelopes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::params::Parameters;

/// Message types understood by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    Invoke,
    Stream,
    Heartbeat,
    /// Anything else, kept verbatim so it can be echoed back in the error.
    Other(String),
}

impl MessageType {
    /// Exact, case-sensitive match against the known message types.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "invoke" => MessageType::Invoke,
            "stream" => MessageType::Stream,
            "heartbeat" => MessageType::Heartbeat,
            other => MessageType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Invoke => "invoke",
            MessageType::Stream => "stream",
            MessageType::Heartbeat => "heartbeat",
            MessageType::Other(s) => s,
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An incoming request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoke_request: Option<InvokeRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_request: Option<StreamRequest>,
}

impl RequestEnvelope {
    pub fn message_type(&self) -> MessageType {
        MessageType::parse(&self.message_type)
    }
}

/// Payload of an `invoke` message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvokeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Parameters::is_empty"
    )]
    pub parameters: Parameters,
}

impl InvokeRequest {
    pub fn new(operation: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            operation: Some(operation.into()),
            parameters,
        }
    }

    /// The operation name, if present and non-empty.
    pub fn operation_name(&self) -> Option<&str> {
        self.operation.as_deref().filter(|name| !name.is_empty())
    }
}

/// Payload of a `stream` message. Carried on the wire but not consulted by
/// the single-chunk stream handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Parameters::is_empty"
    )]
    pub parameters: Parameters,
}

/// Outcome carried in a response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// An outgoing response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoke_response: Option<InvokeResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_response: Option<StreamResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub result: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamResponse {
    pub data: String,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ResponseEnvelope {
    fn bare(request_id: Option<String>, status: Status) -> Self {
        Self {
            request_id,
            status,
            invoke_response: None,
            stream_response: None,
            error: None,
        }
    }

    /// Successful `invoke` reply carrying an operation result.
    pub fn invoke_success(request_id: impl Into<String>, result: Value) -> Self {
        Self {
            invoke_response: Some(InvokeResponse { result }),
            ..Self::bare(Some(request_id.into()), Status::Success)
        }
    }

    /// Successful `stream` reply carrying one chunk.
    pub fn stream_chunk(request_id: impl Into<String>, data: String, is_final: bool) -> Self {
        Self {
            stream_response: Some(StreamResponse { data, is_final }),
            ..Self::bare(Some(request_id.into()), Status::Success)
        }
    }

    /// Successful reply with no payload.
    pub fn acknowledged(request_id: impl Into<String>) -> Self {
        Self::bare(Some(request_id.into()), Status::Success)
    }

    /// Error reply. `request_id` is absent when the failure happened before
    /// the envelope could be attributed to a request.
    pub fn error(request_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            error: Some(ErrorDetail {
                message: message.into(),
                code: None,
            }),
            ..Self::bare(request_id, Status::Error)
        }
    }

    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.code = Some(code.into());
        }
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Parameters, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Parameters>::deserialize(deserializer)?.unwrap_or_default())
}

/// Errors raised while decoding or encoding envelopes.
#[derive(thiserror::Error, Debug)]
pub enum EnvelopeError {
    #[error("Empty request body")]
    Empty,

    #[error("Malformed JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("Request body is not a JSON object")]
    NotAnObject,

    #[error("Envelope shape error: {0}")]
    Shape(#[source] serde_json::Error),

    #[error("Envelope encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Errors raised by typed parameter accessors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("parameter '{name}' must be {expected}")]
    WrongType {
        name: String,
        expected: &'static str,
    },
}

/// Convenience result type.
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;
