//! Interactive session state machine.
//!
//! A [`Session`] owns at most one live terminal channel. It logs in,
//! reconnects quietly on request, and hands out a [`Connected`] handle
//! through which every command is issued.
//!
//! ```text
//!                 connect()                 Established
//!  Disconnected ────────────► Authenticating ───────────► Connected
//!       ▲                          │                         │
//!       │  WrongCredentials /      │ Refused / StartFailed / │ reset(): close,
//!       │  LoginFailed             │ HostKey / Failed        │ connect() again
//!       └──────────────────────────┤                         │
//!                                  ▼                         │
//!                                Failed ◄────────────────────┘ (if re-login fails)
//! ```

mod builder;
mod connected;
mod login;
mod outcome;

pub use builder::SessionBuilder;
pub use connected::{ConfigSource, Connected};
pub use login::Credentials;
pub use outcome::{ConnectOutcome, SessionState};

use std::time::Duration;

use log::{info, warn};
use regex::bytes::Regex;

use crate::channel::{Connector, TerminalChannel};
use crate::dialect;
use crate::error::{Result, SessionError};

/// Read timeouts for session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Each expectation during login.
    pub login: Duration,

    /// Each expectation while running a command (per page for paged output).
    pub command: Duration,

    /// The prompt probe of [`Connected::validate`].
    pub validate: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            login: Duration::from_secs(10),
            command: Duration::from_secs(10),
            validate: Duration::from_secs(2),
        }
    }
}

/// A logical login session with one device.
pub struct Session<C: Connector> {
    host: String,
    connector: C,
    credentials: Credentials,
    timeouts: Timeouts,
    state: SessionState,
    channel: Option<C::Channel>,
    /// Hostname shown by the prompt at the last successful login.
    hostname: Option<String>,
    /// Prompt that ends every command on `channel`.
    prompt: Option<Regex>,
    last_outcome: Option<ConnectOutcome>,
}

impl<C: Connector> Session<C> {
    /// Create a disconnected session.
    pub fn new(
        host: impl Into<String>,
        connector: C,
        credentials: Credentials,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            host: host.into(),
            connector,
            credentials,
            timeouts,
            state: SessionState::Disconnected,
            channel: None,
            hostname: None,
            prompt: None,
            last_outcome: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Hostname read off the prompt, once logged in.
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Outcome of the most recent `connect()` or `reset()`.
    pub fn last_outcome(&self) -> Option<&ConnectOutcome> {
        self.last_outcome.as_ref()
    }

    /// Log in over a freshly spawned channel.
    ///
    /// Never fails: every way the attempt can end is a [`ConnectOutcome`].
    /// A channel held from an earlier login is released first.
    pub async fn connect(&mut self) -> ConnectOutcome {
        self.release_channel().await;
        self.state = SessionState::Authenticating;

        let outcome = match self.connector.spawn().await {
            Ok(mut channel) => {
                let login = match login::run(&mut channel, &self.credentials, self.timeouts.login)
                    .await
                {
                    Ok(login) => login,
                    Err(e) => ConnectOutcome::Failed(e.to_string()).into(),
                };
                if login.outcome.is_established() {
                    self.prompt = Some(self.prompt_for(login.hostname.as_deref()));
                    self.hostname = login.hostname;
                    self.channel = Some(channel);
                } else if let Err(e) = channel.close().await {
                    warn!("{}: closing channel after failed login: {}", self.host, e);
                }
                login.outcome
            }
            Err(e) => classify_spawn_error(&e),
        };

        self.state = outcome.state();
        info!("{}: {}", self.host, outcome);
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    /// Release the channel. Safe in any state; close errors are swallowed.
    pub async fn disconnect(&mut self) {
        self.release_channel().await;
        self.state = SessionState::Disconnected;
    }

    /// Tear the channel down and log in again, keeping this session.
    ///
    /// Clears device-side pagination and buffering state between heavy
    /// commands. Requires the Connected state.
    pub async fn reset(&mut self) -> Result<ConnectOutcome> {
        if self.state != SessionState::Connected {
            return Err(SessionError::NotConnected.into());
        }
        info!("{}: quiet reset", self.host);
        Ok(self.connect().await)
    }

    /// Borrow the command handle, or fail with `NotConnected`.
    pub fn connected(&mut self) -> Result<Connected<'_, C::Channel>> {
        match (self.state, self.channel.as_mut(), self.prompt.as_ref()) {
            (SessionState::Connected, Some(channel), Some(prompt)) => {
                Ok(Connected::new(channel, prompt.clone(), self.timeouts))
            }
            _ => Err(SessionError::NotConnected.into()),
        }
    }

    /// Fetch the running configuration, reset, then fetch the startup
    /// configuration on the fresh channel.
    pub async fn both_configs(&mut self) -> Result<(Vec<String>, Vec<String>)> {
        let running = self.connected()?.config(ConfigSource::Running).await?;
        self.reset().await?;
        let startup = self.connected()?.config(ConfigSource::Startup).await?;
        Ok((running, startup))
    }

    /// The prompt of `hostname`, or any privileged prompt when the login
    /// prompt showed no usable hostname.
    fn prompt_for(&self, hostname: Option<&str>) -> Regex {
        match hostname.map(dialect::host_prompt) {
            Some(Ok(prompt)) => prompt,
            Some(Err(e)) => {
                warn!("{}: falling back to the generic prompt: {}", self.host, e);
                dialect::COMMAND_PROMPT.clone()
            }
            None => dialect::COMMAND_PROMPT.clone(),
        }
    }

    async fn release_channel(&mut self) {
        self.prompt = None;
        if let Some(mut channel) = self.channel.take() {
            if let Err(e) = channel.close().await {
                warn!("{}: error during disconnect: {}", self.host, e);
            }
        }
    }
}

impl<C: Connector> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.host)
            .field("username", &self.credentials.username)
            .field("state", &self.state)
            .finish()
    }
}

/// Map a failure to open the channel onto the login outcome it stands for.
fn classify_spawn_error(error: &crate::Error) -> ConnectOutcome {
    use crate::error::{Error, TransportError};

    if error.is_connection_refused() {
        return ConnectOutcome::Refused;
    }
    match error {
        Error::Transport(TransportError::AuthenticationFailed { .. }) => {
            ConnectOutcome::WrongCredentials
        }
        Error::Transport(TransportError::Timeout(_)) => ConnectOutcome::StartFailed,
        other => ConnectOutcome::Failed(other.to_string()),
    }
}
