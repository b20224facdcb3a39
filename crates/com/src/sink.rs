use {crate::ComError, std::future::Future};

/// Outbound half of a client connection.
pub trait MessageSink: Send {
    /// Send one text message.
    ///
    /// Returns `ComError::ConnectionClosed` once the peer has gone away.
    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), ComError>> + Send;
}
