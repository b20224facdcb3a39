//! Capture, detect, serialize, send, throttle.
//!
//! `run_session` is the streaming loop for one client. `Acceptor` listens for
//! WebSocket clients and runs one session per connection.

mod acceptor;
pub use acceptor::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod session;
pub use session::*;

pub mod wire;
