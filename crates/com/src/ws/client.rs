use {
    crate::ComError,
    futures_util::{SinkExt, StreamExt},
    std::net::SocketAddr,
    tokio_websockets::{ClientBuilder, MaybeTlsStream, WebSocketStream},
};

/// WebSocket client that receives text messages.
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl WsClient {
    /// Connect to a `ws://` URI.
    pub async fn connect(uri: &str) -> Result<Self, ComError> {
        let parsed_uri: http::Uri = uri.parse().map_err(|e| {
            ComError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid WebSocket URI: {e}"),
            ))
        })?;
        let (stream, _response) = ClientBuilder::from_uri(parsed_uri).connect().await?;
        Ok(Self { stream })
    }

    pub async fn connect_addr(addr: SocketAddr) -> Result<Self, ComError> {
        Self::connect(&format!("ws://{addr}")).await
    }

    /// Receive the next text message, skipping binary and control frames.
    ///
    /// Returns `ComError::ConnectionClosed` when the server closes the
    /// connection.
    pub async fn recv_text(&mut self) -> Result<String, ComError> {
        loop {
            match self.stream.next().await {
                Some(Ok(msg)) => {
                    if let Some(text) = msg.as_text() {
                        return Ok(text.to_string());
                    }
                }
                Some(Err(e)) => return Err(ComError::from(e)),
                None => return Err(ComError::ConnectionClosed),
            }
        }
    }

    /// Send a close frame.
    pub async fn close(&mut self) -> Result<(), ComError> {
        self.stream.close().await.map_err(ComError::from)
    }
}
