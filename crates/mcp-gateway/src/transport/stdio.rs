//! Stdio transport: reads envelopes from stdin, writes replies to stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::RequestHandler;
use crate::types::GatewayResult;

use super::framing;

/// Line-oriented transport for local clients and pipelines.
pub struct StdioTransport {
    handler: RequestHandler,
}

impl StdioTransport {
    pub fn new(handler: RequestHandler) -> Self {
        Self { handler }
    }

    /// Run the transport loop on the process stdin/stdout.
    pub async fn run(&self) -> GatewayResult<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        tracing::info!("Stdio transport started");
        self.serve(stdin, stdout).await
    }

    /// Serve newline-delimited envelopes until the reader reaches EOF.
    /// Requests on one connection are answered in order.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> GatewayResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            if bytes_read == 0 {
                tracing::info!("EOF on input, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let reply = self.handler.handle_payload(trimmed.as_bytes()).await;
            let framed = framing::frame_reply(reply)?;
            writer.write_all(&framed).await?;
            writer.flush().await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::{json, Value};

    use crate::config::GatewayConfig;

    #[tokio::test]
    async fn test_serves_lines_in_order() {
        let handler = RequestHandler::standard(
            GatewayConfig::default().with_simulated_latency(Duration::ZERO),
        )
        .unwrap();
        let transport = StdioTransport::new(handler);

        let input = concat!(
            "{\"messageType\":\"heartbeat\",\"requestId\":\"a\"}\n",
            "\n",
            "{\"broken\":\n",
            "{\"messageType\":\"bogus\",\"requestId\":\"b\"}\n",
        );
        let mut output = Vec::new();
        transport
            .serve(BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        let lines: Vec<Value> = output
            .split(|b| *b == b'\n')
            .filter(|l| !l.is_empty())
            .map(|l| serde_json::from_slice(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], json!({ "requestId": "a", "status": "success" }));
        assert_eq!(lines[1]["error"]["code"], json!("invalid_request"));
        assert_eq!(
            lines[2]["error"]["message"],
            json!("Unsupported message type: bogus")
        );
    }
}
