//! MCP Gateway: entry point.

use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use mcp_gateway::config::GatewayConfig;
use mcp_gateway::operations::{list_operations, openapi};
use mcp_gateway::protocol::RequestHandler;
use mcp_gateway::transport::StdioTransport;
use mcp_gateway::types::{InvokeRequest, Parameters, RequestEnvelope, SERVER_NAME, SERVER_VERSION};

#[derive(Parser)]
#[command(
    name = "mcp-gateway",
    about = "MCP Gateway: envelope-based dispatch of MCP operations to business integrations",
    version
)]
struct Cli {
    /// Comma-separated operations advertised by list_operations.
    /// Overrides MCP_ALLOWED_OPERATIONS.
    #[arg(long, global = true)]
    allowed_operations: Option<String>,

    /// Simulated latency of the mock integrations, in milliseconds.
    /// Overrides MCP_SIMULATED_LATENCY_MS.
    #[arg(long, global = true)]
    latency_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve newline-delimited envelopes over stdio (default).
    Serve,

    /// Serve envelopes over HTTP (POST /mcp).
    #[cfg(feature = "http")]
    ServeHttp {
        /// Listen address (host:port).
        #[arg(long, default_value = "127.0.0.1:3100")]
        addr: String,

        /// Allow cross-origin requests from any origin.
        #[arg(long)]
        cors: bool,
    },

    /// Print the operation listing, filtered by the allow-list.
    Operations,

    /// Print the OpenAPI document.
    Openapi,

    /// Print server information as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   mcp-gateway completions bash > ~/.local/share/bash-completion/completions/mcp-gateway
    ///   mcp-gateway completions zsh > ~/.zfunc/_mcp-gateway
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = GatewayConfig::from_env()?;
    if let Some(raw) = cli.allowed_operations.as_deref() {
        config = config.with_allowed_operations(raw);
    }
    if let Some(ms) = cli.latency_ms {
        config = config.with_simulated_latency(Duration::from_millis(ms));
    }
    if config.auth_enabled {
        tracing::warn!("MCP_AUTH_ENABLED is set, but this server does not enforce authentication");
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let handler = RequestHandler::standard(config)?;
            StdioTransport::new(handler).run().await?;
        }

        #[cfg(feature = "http")]
        Commands::ServeHttp { addr, cors } => {
            use mcp_gateway::transport::HttpTransport;

            tracing::info!("MCP Gateway v{SERVER_VERSION}");
            tracing::info!("Advertised operations: {}", config.allowed_operations);
            if let Some(limit) = config.operation_timeout {
                tracing::info!("Operation timeout: {}s", limit.as_secs());
            }

            let handler = RequestHandler::standard(config)?;
            HttpTransport::new(handler).with_cors(cors).run(&addr).await?;
        }

        Commands::Operations => {
            let handler = RequestHandler::standard(config)?;
            let envelope = RequestEnvelope {
                request_id: Some("cli".to_string()),
                message_type: "invoke".to_string(),
                invoke_request: Some(InvokeRequest::new(list_operations::NAME, Parameters::new())),
                stream_request: None,
            };
            let response = handler.handle_envelope(envelope).await?;
            let result = response
                .invoke_response
                .map(|r| r.result)
                .unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Openapi => {
            println!("{}", serde_json::to_string_pretty(openapi::document())?);
        }

        Commands::Info => {
            let handler = RequestHandler::standard(config)?;
            let config = handler.config();
            let info = serde_json::json!({
                "server": { "name": SERVER_NAME, "version": SERVER_VERSION },
                "message_types": ["invoke", "stream", "heartbeat"],
                "operations": handler.registry().names().collect::<Vec<_>>(),
                "operation_count": handler.registry().len(),
                "advertised": config.allowed_operations.to_string(),
                "auth_enforced": false,
                "operation_timeout_secs": config.operation_timeout.map(|d| d.as_secs()),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "mcp-gateway", &mut std::io::stdout());
        }

        Commands::Repl => {
            let handler = RequestHandler::standard(config)?;
            let runtime = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || mcp_gateway::repl::run(handler, runtime)).await??;
        }
    }

    Ok(())
}
