mod client;
mod server;

pub use client::WsClient;
pub use server::{PendingConnection, WsConnection, WsServer};
