pub mod error;
pub mod sink;
pub mod ws;

pub use error::ComError;
pub use sink::MessageSink;
pub use ws::{PendingConnection, WsClient, WsConnection, WsServer};
