//! Command primitives available only on a logged-in session.

use std::time::Duration;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::bytes::Regex;

use super::Timeouts;
use crate::channel::{Expect, TerminalChannel};
use crate::dialect;
use crate::error::{ChannelError, Result, SessionError};
use crate::parse::{self, StatusTable};

/// Which stored configuration to dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Running,
    Startup,
}

impl ConfigSource {
    pub fn command(self) -> &'static str {
        match self {
            ConfigSource::Running => dialect::SHOW_RUNNING_CONFIG,
            ConfigSource::Startup => dialect::SHOW_STARTUP_CONFIG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Echo {
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    More,
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Prompt,
}

static PROBE: Lazy<Vec<(Probe, Regex)>> =
    Lazy::new(|| vec![(Probe::Prompt, dialect::ANY_PROMPT.clone())]);

/// Handle to a session in the Connected state.
///
/// Obtained from [`Session::connected`](super::Session::connected); command
/// methods exist only here, so a command cannot be issued on a session that
/// is not logged in.
pub struct Connected<'s, Ch> {
    channel: &'s mut Ch,
    /// The prompt of the host logged into, not any line ending in `#`.
    prompt: Regex,
    timeouts: Timeouts,
}

impl<'s, Ch: TerminalChannel> Connected<'s, Ch> {
    pub(super) fn new(channel: &'s mut Ch, prompt: Regex, timeouts: Timeouts) -> Self {
        Self {
            channel,
            prompt,
            timeouts,
        }
    }

    /// Send a command and consume its echo.
    ///
    /// The echo must be consumed before the response, otherwise every later
    /// read starts with the tail of the command line.
    async fn dispatch(&mut self, command: &str) -> Result<()> {
        let echo = vec![(
            Echo::Command,
            Regex::new(&regex::escape(command)).map_err(ChannelError::InvalidPattern)?,
        )];

        debug!("sending command {:?}", command);
        self.channel.send_line(command).await?;

        match self.channel.expect(echo.as_slice(), self.timeouts.command).await? {
            Expect::Matched { .. } => Ok(()),
            Expect::Eof { .. } | Expect::Timeout { .. } => Err(SessionError::EchoLost {
                command: command.to_string(),
            }
            .into()),
        }
    }

    /// Run a command whose output fits on one screen.
    ///
    /// Returns the text between the echo and the next prompt, trimmed. A read
    /// cut short by end of stream or timeout returns what arrived.
    pub async fn run(&mut self, command: &str) -> Result<String> {
        self.dispatch(command).await?;

        let patterns = [(Reply::Prompt, self.prompt.clone())];
        let reply = self.channel.expect(&patterns, self.timeouts.command).await?;
        if !matches!(reply, Expect::Matched { .. }) {
            warn!("{:?}: prompt not seen, returning partial output", command);
        }
        Ok(reply.into_before().trim().to_string())
    }

    /// Run a command whose output is paginated, answering every pagination
    /// marker with a space. Returns the raw accumulated output.
    pub async fn run_paged(&mut self, command: &str) -> Result<String> {
        self.dispatch(command).await?;

        let patterns = [
            (Page::More, dialect::MORE_MARKER.clone()),
            (Page::Prompt, self.prompt.clone()),
        ];
        let mut output = String::new();
        let mut pages = 1usize;
        loop {
            match self.channel.expect(&patterns, self.timeouts.command).await? {
                Expect::Matched {
                    kind: Page::More,
                    before,
                    ..
                } => {
                    output.push_str(&before);
                    pages += 1;
                    self.channel.send(dialect::NEXT_PAGE).await?;
                }
                Expect::Matched {
                    kind: Page::Prompt,
                    before,
                    ..
                } => {
                    output.push_str(&before);
                    break;
                }
                Expect::Eof { before } => {
                    warn!("{:?}: stream ended after {} page(s)", command, pages);
                    output.push_str(&before);
                    break;
                }
                Expect::Timeout { before } => {
                    warn!("{:?}: timed out after {} page(s)", command, pages);
                    output.push_str(&before);
                    break;
                }
            }
        }

        debug!("{:?}: {} bytes over {} page(s)", command, output.len(), pages);
        Ok(output)
    }

    /// Fetch and normalize a stored configuration.
    pub async fn config(&mut self, source: ConfigSource) -> Result<Vec<String>> {
        let raw = self.run_paged(source.command()).await?;
        Ok(parse::normalize_config(&raw))
    }

    /// Model name from `show system`, or `"Unknown"`.
    pub async fn model_name(&mut self) -> Result<String> {
        let output = self.run(dialect::SHOW_SYSTEM).await?;
        Ok(parse::parse_model_name(&output).unwrap_or_else(|| dialect::UNKNOWN_MODEL.to_string()))
    }

    /// Parsed `show interfaces status`.
    pub async fn interfaces_status(&mut self) -> Result<StatusTable> {
        let raw = self.run_paged(dialect::SHOW_INTERFACES_STATUS).await?;
        Ok(parse::parse_interfaces_status(&raw))
    }

    /// Check that the console still answers with a privileged prompt.
    ///
    /// Any failure, including a `>` prompt, counts as not synchronised.
    pub async fn validate(&mut self) -> bool {
        self.probe(self.timeouts.validate).await.unwrap_or(false)
    }

    async fn probe(&mut self, timeout: Duration) -> Result<bool> {
        self.channel.send_line("").await?;
        match self.channel.expect(PROBE.as_slice(), timeout).await? {
            Expect::Matched {
                kind: Probe::Prompt,
                matched,
                ..
            } => Ok(matched.ends_with('#')),
            Expect::Eof { .. } | Expect::Timeout { .. } => Ok(false),
        }
    }
}
