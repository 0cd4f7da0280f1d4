use std::fmt;

/// Custom error types for log decoding
#[derive(Debug)]
pub enum AglogError {
    /// I/O errors opening or reading the input stream
    Io(std::io::Error),
    /// Malformed timestamp-offset string (expected signed HH:MM)
    InvalidOffset(String),
    /// Decode errors with context
    Parse(String),
}

impl fmt::Display for AglogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AglogError::Io(err) => write!(f, "I/O error: {}", err),
            AglogError::InvalidOffset(msg) => write!(f, "Invalid offset: {}", msg),
            AglogError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for AglogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AglogError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AglogError {
    fn from(err: std::io::Error) -> Self {
        AglogError::Io(err)
    }
}

impl From<anyhow::Error> for AglogError {
    fn from(err: anyhow::Error) -> Self {
        AglogError::Parse(err.to_string())
    }
}
