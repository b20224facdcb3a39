use {
    crate::{SessionEnd, StreamConfig, run_session},
    com::{ComError, PendingConnection, WsServer},
    hands::{HandDetector, InferError},
    std::{future::Future, net::SocketAddr, sync::Arc, time::Duration},
    tokio::{
        sync::watch,
        task::{JoinError, JoinSet},
    },
    video::CaptureDevice,
};

/// How long sessions get to stop on their own after shutdown is requested.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Supplies the per-session capture device and detector.
pub trait SessionFactory: Send + Sync + 'static {
    type Capture: CaptureDevice + 'static;
    type Detector: HandDetector + 'static;

    /// A fresh, unopened capture device.
    fn capture(&self, config: &StreamConfig) -> Self::Capture;

    fn detector(&self) -> Result<Self::Detector, InferError>;
}

/// Accepts WebSocket clients and runs one streaming session per connection.
pub struct Acceptor<F: SessionFactory> {
    server: WsServer,
    config: Arc<StreamConfig>,
    factory: Arc<F>,
}

impl<F: SessionFactory> Acceptor<F> {
    pub async fn bind(config: StreamConfig, factory: F) -> Result<Self, ComError> {
        let server = WsServer::bind((config.host(), config.port())).await?;
        log::info!(
            "Starting WebSocket server on ws://{}:{} ({})",
            config.host(),
            config.port(),
            server.local_addr()
        );
        Ok(Self {
            server,
            config: Arc::new(config),
            factory: Arc::new(factory),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    /// Accept clients until `shutdown` resolves, then stop every session.
    ///
    /// Sessions are told to stop and get `SHUTDOWN_GRACE` to do so. Whatever
    /// is still running after that is aborted, which still releases its
    /// capture device.
    pub async fn run(self, shutdown: impl Future<Output = ()>) {
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut sessions = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                pending = accept_next(&self.server) => {
                    sessions.spawn(serve(
                        pending,
                        Arc::clone(&self.config),
                        Arc::clone(&self.factory),
                        stop_rx.clone(),
                    ));
                }
                Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                    log_join(joined);
                }
            }
        }

        log::info!("Shutting down, stopping {} session(s)", sessions.len());
        // Receivers only go away with their sessions.
        let _ = stop_tx.send(true);

        let drain = async {
            while let Some(joined) = sessions.join_next().await {
                log_join(joined);
            }
        };
        let drained = tokio::time::timeout(SHUTDOWN_GRACE, drain).await;
        if drained.is_err() {
            log::warn!(
                "{} session(s) still running after {:?}, aborting",
                sessions.len(),
                SHUTDOWN_GRACE
            );
            sessions.abort_all();
            while sessions.join_next().await.is_some() {}
        }
    }
}

/// Next TCP connection. Accept errors are logged and retried after a pause.
async fn accept_next(server: &WsServer) -> PendingConnection {
    loop {
        match server.accept().await {
            Ok(pending) => return pending,
            Err(e) => {
                log::warn!("Accept error: {e}");
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
            }
        }
    }
}

async fn serve<F: SessionFactory>(
    pending: PendingConnection,
    config: Arc<StreamConfig>,
    factory: Arc<F>,
    shutdown: watch::Receiver<bool>,
) {
    let peer = pending.peer_addr();
    let mut connection = match pending.upgrade().await {
        Ok(connection) => connection,
        Err(e) => {
            log::warn!("WebSocket handshake failed for {peer}: {e}");
            return;
        }
    };
    log::info!("Client connected: {peer}");

    let mut detector = match factory.detector() {
        Ok(detector) => detector,
        Err(e) => {
            log::error!("Failed to create detector for {peer}: {e}");
            return;
        }
    };

    let capture = factory.capture(&config);
    match run_session(capture, &mut detector, &mut connection, &config, shutdown).await {
        Ok(SessionEnd::Disconnected) => log::info!("Client disconnected: {peer}"),
        Ok(SessionEnd::Shutdown) => {
            log::info!("Closing connection to {peer} for shutdown");
            if let Err(e) = connection.close().await {
                log::debug!("Close to {peer} failed: {e}");
            }
        }
        Err(e) => {
            log::error!("Session for {peer} ended: {e}");
            if let Err(e) = connection.close().await {
                log::debug!("Close to {peer} failed: {e}");
            }
        }
    }
}

fn log_join(joined: Result<(), JoinError>) {
    match joined {
        Err(e) if e.is_panic() => log::error!("Session task panicked: {e}"),
        _ => {}
    }
}
