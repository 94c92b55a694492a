//! HTTP transport: `POST /mcp` plus `/health` and `/openapi.json`.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::operations::openapi;
use crate::protocol::RequestHandler;
use crate::types::{GatewayError, GatewayResult, SERVER_VERSION};

/// HTTP transport for remote MCP clients.
pub struct HttpTransport {
    handler: RequestHandler,
    cors: bool,
}

impl HttpTransport {
    pub fn new(handler: RequestHandler) -> Self {
        Self {
            handler,
            cors: false,
        }
    }

    /// Answer cross-origin requests from any origin.
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    /// Build the axum router without binding a socket.
    pub fn router(&self) -> Router {
        let app = Router::new()
            .route("/mcp", post(handle_request))
            .route("/health", get(handle_health))
            .route("/openapi.json", get(handle_openapi))
            .with_state(self.handler.clone());

        if self.cors {
            app.layer(CorsLayer::permissive())
        } else {
            app
        }
    }

    /// Run the HTTP server on the given address until Ctrl+C.
    pub async fn run(&self, addr: &str) -> GatewayResult<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!("HTTP transport listening on {addr}");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        tracing::info!("HTTP transport stopped");
        Ok(())
    }
}

/// Handle one MCP envelope. The raw body is passed through untouched so
/// that decode failures get the plain-text bad-request reply.
async fn handle_request(State(handler): State<RequestHandler>, body: Bytes) -> Response {
    let reply = handler.handle_payload(&body).await;
    let status = StatusCode::from_u16(reply.status.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        [(header::CONTENT_TYPE, reply.status.content_type())],
        reply.body,
    )
        .into_response()
}

async fn handle_health(State(handler): State<RequestHandler>) -> AxumJson<serde_json::Value> {
    AxumJson(serde_json::json!({
        "status": "ok",
        "version": SERVER_VERSION,
        "operations": handler.registry().len(),
    }))
}

async fn handle_openapi() -> AxumJson<serde_json::Value> {
    AxumJson(openapi::document().clone())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
