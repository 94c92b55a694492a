//! Protocol handling: envelope routing and operation dispatch.

pub mod dispatcher;
pub mod handler;
pub mod router;

pub use dispatcher::InvokeDispatcher;
pub use handler::{Reply, ReplyStatus, RequestHandler, INVALID_REQUEST_FORMAT};
pub use router::MessageRouter;
