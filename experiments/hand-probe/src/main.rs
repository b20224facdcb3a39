use {
    anyhow::Context,
    base::log,
    com::{ComError, WsClient},
    hands::HandLandmark,
    pipeline::wire,
};

const SERVER_URL: &str = "ws://localhost:8765";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    base::init_stdout_logger();

    log::info!("Connecting to {SERVER_URL}");
    let mut client = WsClient::connect(SERVER_URL)
        .await
        .with_context(|| format!("connecting to {SERVER_URL}"))?;
    log::info!("Connected");

    loop {
        let text = match client.recv_text().await {
            Ok(text) => text,
            Err(ComError::ConnectionClosed) => {
                log::info!("Server closed the connection");
                return Ok(());
            }
            Err(e) => return Err(e).context("receiving landmarks"),
        };

        let hands = match wire::decode(&text) {
            Ok(hands) => hands,
            Err(e) => {
                log::warn!("Malformed message: {e}");
                continue;
            }
        };

        match hands.first() {
            Some(hand) => {
                let tip = hand.landmark(HandLandmark::IndexFingerTip);
                log::info!(
                    "Index fingertip: x={:.3} y={:.3} z={:.3}",
                    tip.x,
                    tip.y,
                    tip.z
                );
            }
            None => log::debug!("No hands"),
        }
    }
}
