//! Error types for l2switch

use thiserror::Error;

/// Result type alias for l2switch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for l2switch
#[derive(Error, Debug)]
pub enum Error {
    /// Network I/O error
    #[error("Network I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame too short or otherwise unreadable
    #[error("Packet parsing error: {0}")]
    PacketParsing(String),

    /// Malformed configuration line
    #[error("Invalid configuration at line {line}: {reason}")]
    InvalidConfig { line: usize, reason: String },

    /// An attached interface has no VLAN entry in the configuration
    #[error("Port '{0}' has no VLAN configuration")]
    UnknownPort(String),

    /// Interface not found
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// Interface error
    #[error("Interface error: {0}")]
    Interface(String),

    /// Link transport error
    #[error("Link error: {0}")]
    Link(String),
}

impl Error {
    /// Create a parsing error with a custom message
    pub fn parsing<S: Into<String>>(msg: S) -> Self {
        Error::PacketParsing(msg.into())
    }

    /// Create a configuration error for the given (1-based) line
    pub fn config<S: Into<String>>(line: usize, reason: S) -> Self {
        Error::InvalidConfig {
            line,
            reason: reason.into(),
        }
    }

    /// Create a link error with a custom message
    pub fn link<S: Into<String>>(msg: S) -> Self {
        Error::Link(msg.into())
    }
}
