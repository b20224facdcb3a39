use std::fmt;

#[derive(Debug)]
pub enum InferError {
    Runtime(String),
    Shape(String),
    Config(String),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::Runtime(msg) => write!(f, "runtime error: {msg}"),
            InferError::Shape(msg) => write!(f, "shape error: {msg}"),
            InferError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<image::ImageError> for InferError {
    fn from(err: image::ImageError) -> Self {
        InferError::Shape(err.to_string())
    }
}
