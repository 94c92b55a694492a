//! MCP Gateway: envelope-based dispatch of MCP operations to business integrations.

pub mod config;
pub mod operations;
pub mod protocol;
pub mod repl;
pub mod transport;
pub mod types;

pub use config::GatewayConfig;
pub use operations::{Operation, OperationRegistry};
pub use protocol::RequestHandler;
pub use transport::StdioTransport;
