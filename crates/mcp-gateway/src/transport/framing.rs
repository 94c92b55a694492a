//! Message framing for newline-delimited JSON.

use mcp_envelope::encode_response;

use crate::protocol::{Reply, ReplyStatus, INVALID_REQUEST_FORMAT};
use crate::types::{error_codes, GatewayResult, ResponseEnvelope};

/// Turn a reply into a single output line (with trailing newline).
///
/// Line-oriented transports have no status channel, so a bad request is
/// written as an error envelope instead of plain text.
pub fn frame_reply(reply: Reply) -> GatewayResult<Vec<u8>> {
    let mut line = match reply.status {
        ReplyStatus::BadRequest => encode_response(
            &ResponseEnvelope::error(None, INVALID_REQUEST_FORMAT)
                .with_error_code(error_codes::INVALID_REQUEST),
        )?,
        ReplyStatus::Ok | ReplyStatus::InternalError => reply.body,
    };
    line.push(b'\n');
    Ok(line)
}
