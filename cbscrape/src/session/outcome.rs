//! Session states and login outcomes.

use std::fmt;

use serde::Serialize;

/// Lifecycle state of a [`Session`](super::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SessionState {
    /// No channel is held.
    #[default]
    Disconnected,

    /// A login is in progress.
    Authenticating,

    /// Logged in at the command prompt; commands may be issued.
    Connected,

    /// The last connection attempt failed before credentials were judged.
    Failed,
}

/// Terminal outcome of [`Session::connect`](super::Session::connect).
///
/// Every way a login can end is one variant here, with one status string
/// and one resulting [`SessionState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConnectOutcome {
    /// Logged in and sitting at the command prompt.
    Established,

    /// The SSH server refused the connection.
    Refused,

    /// The stream ended or timed out before any login challenge.
    StartFailed,

    /// The host key question was answered but no login challenge followed.
    HostKeyUnconfirmed,

    /// The device asked for the user name again after the password.
    WrongCredentials,

    /// The stream ended or timed out during the credential exchange.
    LoginFailed,

    /// Transport or channel failure.
    Failed(String),
}

impl ConnectOutcome {
    /// Human-readable status line.
    pub fn status(&self) -> String {
        match self {
            ConnectOutcome::Established => "Connection established".to_string(),
            ConnectOutcome::Refused => {
                "SSH connection refused (is the SSH server enabled?)".to_string()
            }
            ConnectOutcome::StartFailed => {
                "SSH session failed to start (EOF or Timeout)".to_string()
            }
            ConnectOutcome::HostKeyUnconfirmed => {
                "SSH host key confirmation failed (EOF or Timeout)".to_string()
            }
            ConnectOutcome::WrongCredentials => "Wrong credentials".to_string(),
            ConnectOutcome::LoginFailed => {
                "SSH session failed after login attempt (EOF or Timeout)".to_string()
            }
            ConnectOutcome::Failed(message) => format!("Connection failed: {message}"),
        }
    }

    /// The session state this outcome leaves behind.
    pub fn state(&self) -> SessionState {
        match self {
            ConnectOutcome::Established => SessionState::Connected,
            ConnectOutcome::WrongCredentials | ConnectOutcome::LoginFailed => {
                SessionState::Disconnected
            }
            ConnectOutcome::Refused
            | ConnectOutcome::StartFailed
            | ConnectOutcome::HostKeyUnconfirmed
            | ConnectOutcome::Failed(_) => SessionState::Failed,
        }
    }

    pub fn is_established(&self) -> bool {
        matches!(self, ConnectOutcome::Established)
    }
}

impl fmt::Display for ConnectOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status())
    }
}
