use {com::ComError, hands::InferError, std::fmt, video::VideoError};

/// Reasons a session ends abnormally. A client disconnect is not one of them.
#[derive(Debug)]
pub enum SessionError {
    DeviceOpen(VideoError),
    ReadFailures(u32),
    Detector(InferError),
    Encode(serde_json::Error),
    Send(ComError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::DeviceOpen(err) => write!(f, "failed to open capture device: {err}"),
            SessionError::ReadFailures(count) => {
                write!(f, "{count} consecutive frame reads failed")
            }
            SessionError::Detector(err) => write!(f, "detector failed: {err}"),
            SessionError::Encode(err) => write!(f, "failed to encode landmarks: {err}"),
            SessionError::Send(err) => write!(f, "failed to send landmarks: {err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::DeviceOpen(err) => Some(err),
            SessionError::ReadFailures(_) => None,
            SessionError::Detector(err) => Some(err),
            SessionError::Encode(err) => Some(err),
            SessionError::Send(err) => Some(err),
        }
    }
}

impl From<InferError> for SessionError {
    fn from(err: InferError) -> Self {
        SessionError::Detector(err)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Encode(err)
    }
}
