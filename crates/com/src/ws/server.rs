use {
    crate::{ComError, MessageSink},
    futures_util::{SinkExt, StreamExt, stream::SplitSink},
    std::{
        net::SocketAddr,
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
    },
    tokio::{
        net::{TcpListener, TcpStream, ToSocketAddrs},
        task::JoinHandle,
    },
    tokio_websockets::{Message, ServerBuilder, WebSocketStream},
};

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;

/// WebSocket listener. Each accepted connection is served on its own.
pub struct WsServer {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl WsServer {
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, ComError> {
        let listener = TcpListener::bind(addr).await.map_err(ComError::Io)?;
        let local_addr = listener.local_addr().map_err(ComError::Io)?;
        Ok(Self {
            listener,
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the next TCP connection. The handshake happens in `upgrade`
    /// so a slow client does not hold up the accept loop.
    pub async fn accept(&self) -> Result<PendingConnection, ComError> {
        let (stream, peer) = self.listener.accept().await.map_err(ComError::Io)?;
        Ok(PendingConnection { stream, peer })
    }
}

/// Accepted TCP connection that has not done the WebSocket handshake yet.
pub struct PendingConnection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl PendingConnection {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Perform the WebSocket handshake.
    ///
    /// The read half is drained by a background task that discards whatever
    /// the client sends. A close frame, read error or end of stream marks the
    /// connection closed, so the next `send_text` reports `ConnectionClosed`.
    pub async fn upgrade(self) -> Result<WsConnection, ComError> {
        let peer = self.peer;
        let (_request, ws_stream) = ServerBuilder::new().accept(self.stream).await?;
        let (writer, mut reader) = ws_stream.split();

        let closed = Arc::new(AtomicBool::new(false));
        let reader_task = tokio::spawn({
            let closed = Arc::clone(&closed);
            async move {
                loop {
                    match reader.next().await {
                        Some(Ok(msg)) => {
                            if msg.is_close() {
                                log::debug!("Client {peer} sent close");
                                break;
                            }
                        }
                        Some(Err(e)) => {
                            log::debug!("Client {peer} read error: {e}");
                            break;
                        }
                        None => break,
                    }
                }
                closed.store(true, Ordering::Release);
            }
        });

        Ok(WsConnection {
            writer,
            closed,
            reader_task,
            peer,
        })
    }
}

/// Server side of one WebSocket connection, send only.
pub struct WsConnection {
    writer: WsSink,
    closed: Arc<AtomicBool>,
    reader_task: JoinHandle<()>,
    peer: SocketAddr,
}

impl WsConnection {
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Send a close frame and flush it.
    pub async fn close(&mut self) -> Result<(), ComError> {
        self.closed.store(true, Ordering::Release);
        self.writer.close().await.map_err(ComError::from)
    }
}

impl MessageSink for WsConnection {
    async fn send_text(&mut self, text: String) -> Result<(), ComError> {
        if self.is_closed() {
            return Err(ComError::ConnectionClosed);
        }
        self.writer
            .send(Message::text(text))
            .await
            .map_err(ComError::from)
    }
}

impl Drop for WsConnection {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}
