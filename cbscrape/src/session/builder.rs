//! Builder for SSH-backed sessions.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::{Credentials, Session, Timeouts};
use crate::channel::SshConnector;
use crate::error::{Result, SessionError};
use crate::transport::{AuthMethod, HostKeyVerification, SshConfig};

/// Builder for constructing a [`Session`] over SSH.
///
/// # Example
///
/// ```rust,no_run
/// use cbscrape::SessionBuilder;
///
/// # async fn example() -> Result<(), cbscrape::Error> {
/// let mut session = SessionBuilder::new("192.168.1.254")
///     .username("cisco")
///     .password("cisco")
///     .build()?;
///
/// let outcome = session.connect().await;
/// println!("{outcome}");
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<String>,
    ssh_auth: AuthMethod,
    connect_timeout: Duration,
    timeouts: Timeouts,
    terminal_width: u32,
    terminal_height: u32,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
}

impl SessionBuilder {
    /// Create a new session builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            password: None,
            ssh_auth: AuthMethod::None,
            connect_timeout: Duration::from_secs(10),
            timeouts: Timeouts::default(),
            terminal_width: 511,
            terminal_height: 24,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the login user name.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password answered at the in-band `Password:` challenge.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Also present the password at the SSH layer, for switches configured
    /// with SSH password authentication instead of the in-band login.
    pub fn ssh_password(mut self, password: impl Into<String>) -> Self {
        self.ssh_auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Authenticate at the SSH layer with a private key.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.ssh_auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Authenticate at the SSH layer with an encrypted private key.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.ssh_auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        };
        self
    }

    /// Set the TCP connect and SSH handshake timeout (default: 10s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the per-expectation timeout during login (default: 10s).
    pub fn login_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.login = timeout;
        self
    }

    /// Set the per-expectation timeout while running commands (default: 10s).
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.command = timeout;
        self
    }

    /// Set the prompt probe timeout used by `validate()` (default: 2s).
    pub fn validate_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.validate = timeout;
        self
    }

    /// Set terminal dimensions.
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Set host key verification mode (default: accept new keys).
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a known_hosts file other than `~/.ssh/known_hosts`.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Build the session.
    ///
    /// This creates the session but does not connect. Call `connect()` on
    /// the returned session to log in.
    pub fn build(self) -> Result<Session<SshConnector>> {
        let username = self.username.ok_or_else(|| SessionError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;
        let password = self.password.ok_or_else(|| SessionError::InvalidConfig {
            message: "Password is required".to_string(),
        })?;

        let mut ssh_config = SshConfig::new(self.host.clone(), username.clone());
        ssh_config.port = self.port;
        ssh_config.auth = self.ssh_auth;
        ssh_config.timeout = self.connect_timeout;
        ssh_config.terminal_width = self.terminal_width;
        ssh_config.terminal_height = self.terminal_height;
        ssh_config.host_key_verification = self.host_key_verification;
        ssh_config.known_hosts_path = self.known_hosts_path;

        Ok(Session::new(
            self.host,
            SshConnector::new(ssh_config),
            Credentials::new(username, password),
            self.timeouts,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;

    #[test]
    fn test_build_requires_credentials() {
        let err = SessionBuilder::new("10.0.0.2").password("x").build();
        assert!(matches!(
            err,
            Err(crate::Error::Session(SessionError::InvalidConfig { .. }))
        ));

        let err = SessionBuilder::new("10.0.0.2").username("admin").build();
        assert!(err.is_err());
    }

    #[test]
    fn test_build_defaults() {
        let session = SessionBuilder::new("10.0.0.2")
            .username("admin")
            .password("secret")
            .validate_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(session.host(), "10.0.0.2");
        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(session.timeouts().command, Duration::from_secs(10));
        assert_eq!(session.timeouts().validate, Duration::from_secs(5));
        assert_eq!(session.connector.config().port, 22);
        assert!(matches!(session.connector.config().auth, AuthMethod::None));
    }
}
