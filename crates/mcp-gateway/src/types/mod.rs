//! Data types used by the gateway.

pub mod error;

pub use error::*;
pub use mcp_envelope::{
    ErrorDetail, InvokeRequest, InvokeResponse, MessageType, OperationDefinition, Parameters,
    RequestEnvelope, ResponseEnvelope, Status, StreamRequest, StreamResponse,
};

pub const SERVER_NAME: &str = "mcp-gateway";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
