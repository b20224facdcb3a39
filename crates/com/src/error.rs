use std::{fmt, io};

#[derive(Debug)]
pub enum ComError {
    Io(io::Error),
    WebSocket(tokio_websockets::Error),
    /// The peer is gone. Sessions treat this as a normal end.
    ConnectionClosed,
}

impl ComError {
    pub fn is_closed(&self) -> bool {
        matches!(self, ComError::ConnectionClosed)
    }
}

impl fmt::Display for ComError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComError::Io(err) => write!(f, "io error: {err}"),
            ComError::WebSocket(err) => write!(f, "websocket error: {err}"),
            ComError::ConnectionClosed => write!(f, "connection closed"),
        }
    }
}

impl std::error::Error for ComError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComError::Io(err) => Some(err),
            ComError::WebSocket(err) => Some(err),
            ComError::ConnectionClosed => None,
        }
    }
}

fn is_disconnect(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
    )
}

impl From<io::Error> for ComError {
    fn from(err: io::Error) -> Self {
        if is_disconnect(err.kind()) {
            ComError::ConnectionClosed
        } else {
            ComError::Io(err)
        }
    }
}

impl From<tokio_websockets::Error> for ComError {
    fn from(err: tokio_websockets::Error) -> Self {
        match err {
            tokio_websockets::Error::AlreadyClosed => ComError::ConnectionClosed,
            tokio_websockets::Error::Io(err) => ComError::from(err),
            err => ComError::WebSocket(err),
        }
    }
}
