//! Error types for cbscrape.
//!
//! Only protocol misuse and I/O failures are errors. Login failures are
//! reported as [`ConnectOutcome`](crate::session::ConnectOutcome) values and
//! parse degradation is not an error at all.

use std::io;
use thiserror::Error;

/// Main error type for cbscrape operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Terminal channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Session-level errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl Error {
    /// Whether the remote end actively refused the TCP connection.
    pub fn is_connection_refused(&self) -> bool {
        match self {
            Error::Transport(TransportError::Io(e)) => e.kind() == io::ErrorKind::ConnectionRefused,
            Error::Transport(TransportError::Ssh(russh::Error::IO(e))) => {
                e.kind() == io::ErrorKind::ConnectionRefused
            }
            _ => false,
        }
    }
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// SSH-level authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host is not in known_hosts and verification is strict
    #[error("Host {host}:{port} not found in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal channel errors.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Reading from or writing to the stream failed
    #[error("Channel I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Session errors (caller misuse, lost synchronisation).
#[derive(Error, Debug)]
pub enum SessionError {
    /// A command was issued outside the Connected state
    #[error("No active SSH session - call connect() first")]
    NotConnected,

    /// The device never echoed the command back
    #[error("Echo of '{command}' not received")]
    EchoLost { command: String },

    /// Invalid configuration in the session builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type alias using cbscrape's Error.
pub type Result<T> = std::result::Result<T, Error>;
