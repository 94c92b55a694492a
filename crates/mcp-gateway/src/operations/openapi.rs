//! `get_openapi_spec` operation: Static OpenAPI description of the endpoint.
//!
//! Hand-maintained. Keep in step with the envelope types in `mcp-envelope`.

use std::sync::OnceLock;

use serde_json::{json, Value};

use crate::types::{OperationDefinition, Parameters, SERVER_VERSION};

use super::registry::{InvocationContext, Operation, OperationFuture};

pub const NAME: &str = "get_openapi_spec";

pub fn definition() -> OperationDefinition {
    OperationDefinition::new(NAME, "Returns the OpenAPI specification for this server")
}

pub struct GetOpenApiSpec;

impl Operation for GetOpenApiSpec {
    fn definition(&self) -> OperationDefinition {
        definition()
    }

    fn invoke<'a>(
        &'a self,
        _ctx: InvocationContext<'a>,
        _params: &'a Parameters,
    ) -> OperationFuture<'a> {
        Box::pin(async { Ok(document().clone()) })
    }
}

/// The OpenAPI 3.0 document, built on first use.
pub fn document() -> &'static Value {
    static DOCUMENT: OnceLock<Value> = OnceLock::new();
    DOCUMENT.get_or_init(build_document)
}

fn build_document() -> Value {
    json!({
        "openapi": "3.0.1",
        "info": {
            "title": "MCP Gateway",
            "description": "Model Context Protocol endpoint dispatching invoke, stream, and heartbeat envelopes to business operations.",
            "version": SERVER_VERSION
        },
        "paths": {
            "/mcp": {
                "post": {
                    "operationId": "handleMcpRequest",
                    "summary": "Process an MCP envelope",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/McpRequest" }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Envelope processed. Protocol-level failures are reported with status \"error\".",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/McpResponse" }
                                }
                            }
                        },
                        "400": {
                            "description": "The body could not be decoded into an envelope.",
                            "content": {
                                "text/plain": {
                                    "schema": { "type": "string", "example": "Invalid request format" }
                                }
                            }
                        },
                        "500": {
                            "description": "Unexpected failure while processing the envelope.",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/McpResponse" }
                                }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "McpRequest": {
                    "type": "object",
                    "required": ["messageType"],
                    "properties": {
                        "requestId": {
                            "type": "string",
                            "description": "Caller-supplied identifier echoed in the response. Generated when absent."
                        },
                        "messageType": {
                            "type": "string",
                            "enum": ["invoke", "stream", "heartbeat"]
                        },
                        "invokeRequest": { "$ref": "#/components/schemas/InvokeRequest" },
                        "streamRequest": { "$ref": "#/components/schemas/StreamRequest" }
                    }
                },
                "InvokeRequest": {
                    "type": "object",
                    "required": ["operation"],
                    "properties": {
                        "operation": { "type": "string" },
                        "parameters": {
                            "type": "object",
                            "additionalProperties": true
                        }
                    }
                },
                "StreamRequest": {
                    "type": "object",
                    "properties": {
                        "operation": { "type": "string" },
                        "parameters": {
                            "type": "object",
                            "additionalProperties": true
                        }
                    }
                },
                "McpResponse": {
                    "type": "object",
                    "required": ["status"],
                    "properties": {
                        "requestId": { "type": "string" },
                        "status": {
                            "type": "string",
                            "enum": ["success", "error"]
                        },
                        "invokeResponse": { "$ref": "#/components/schemas/InvokeResponse" },
                        "streamResponse": { "$ref": "#/components/schemas/StreamResponse" },
                        "error": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                },
                "InvokeResponse": {
                    "type": "object",
                    "properties": {
                        "result": {}
                    }
                },
                "StreamResponse": {
                    "type": "object",
                    "required": ["data", "isFinal"],
                    "properties": {
                        "data": { "type": "string" },
                        "isFinal": { "type": "boolean" }
                    }
                },
                "ErrorResponse": {
                    "type": "object",
                    "required": ["message"],
                    "properties": {
                        "message": { "type": "string" },
                        "code": { "type": "string" }
                    }
                }
            }
        }
    })
}
