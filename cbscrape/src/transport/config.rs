//! SSH connection settings.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// What to do with the server's host key, after OpenSSH's
/// `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default)]
pub enum HostKeyVerification {
    /// Only hosts already in known_hosts, with the recorded key.
    Strict,

    /// Record unknown hosts, refuse a changed key.
    #[default]
    AcceptNew,

    /// Trust any key. Lab switches only.
    Disabled,
}

/// Where and how to open the SSH connection.
#[derive(Debug)]
pub struct SshConfig {
    pub host: String,
    pub port: u16,

    /// User presented at the SSH layer. Usually the same user that later
    /// answers the in-band `User Name:` challenge.
    pub username: String,

    pub auth: AuthMethod,

    /// Bounds the TCP connect and the handshake; also the idle limit.
    pub timeout: Duration,

    /// PTY columns. Wide enough that the switch does not wrap config lines.
    pub terminal_width: u32,

    /// PTY rows.
    pub terminal_height: u32,

    pub host_key_verification: HostKeyVerification,

    /// known_hosts file; `~/.ssh/known_hosts` when unset.
    pub known_hosts_path: Option<PathBuf>,
}

impl SshConfig {
    /// Settings for `username@host:22` with no SSH-level credentials.
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: username.into(),
            auth: AuthMethod::None,
            timeout: Duration::from_secs(10),
            terminal_width: 511,
            terminal_height: 24,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// `host:port`, for logging.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// SSH-level authentication.
///
/// CBS switches usually accept `None` here and run their own `User Name:` /
/// `Password:` dialogue inside the shell.
#[derive(Debug, Default)]
pub enum AuthMethod {
    #[default]
    None,

    Password(SecretString),

    PrivateKey {
        path: PathBuf,
        /// For encrypted keys.
        passphrase: Option<SecretString>,
    },
}
