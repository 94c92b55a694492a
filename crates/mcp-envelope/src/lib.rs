//! MCP Envelope: protocol core for the MCP Gateway: wire envelopes, codec,
//! operation definitions, parameter accessors, and allow-lists.

pub mod allow_list;
pub mod codec;
pub mod definition;
pub mod params;
pub mod types;

pub use allow_list::AllowList;
pub use codec::{decode_request, decode_response, encode_request, encode_response};
pub use definition::OperationDefinition;
pub use params::{ParameterBag, Parameters};
pub use types::*;
