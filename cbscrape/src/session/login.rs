//! The in-band login dialogue.
//!
//! ```text
//!              ┌───────────────┐  yes   ┌────────────┐
//!   spawn ───► │ first contact ├───────►│ User Name: │
//!              └─┬──────┬────┬─┘        └─────┬──────┘
//!     refused ◄──┘      │    └──► prompt      │ username
//!   EOF/timeout ◄───────┘   (SSH auth done)   ▼
//!                                       ┌───────────┐ password ┌──────────────┐
//!                                       │ Password: ├─────────►│ second check │
//!                                       └───────────┘          └─┬─────┬────┬─┘
//!                                               prompt ◄─────────┘     │    └─► EOF/timeout
//!                                                          User Name: ◄┘
//! ```

use std::time::Duration;

use log::debug;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use secrecy::{ExposeSecret, SecretString};

use super::outcome::ConnectOutcome;
use crate::channel::{Expect, TerminalChannel};
use crate::dialect;
use crate::error::Result;

/// In-band login credentials.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// How the dialogue ended. `hostname` is read off the prompt that
/// completed a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Login {
    pub(crate) outcome: ConnectOutcome,
    pub(crate) hostname: Option<String>,
}

impl From<ConnectOutcome> for Login {
    fn from(outcome: ConnectOutcome) -> Self {
        Self {
            outcome,
            hostname: None,
        }
    }
}

impl Login {
    fn at_prompt(matched: &str) -> Self {
        let hostname = dialect::prompt_hostname(matched).map(str::to_string);
        debug!("login: prompt for host {:?}", hostname);
        Self {
            outcome: ConnectOutcome::Established,
            hostname,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FirstContact {
    HostKey,
    Refused,
    UserName,
    Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Challenge {
    UserName,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Prompt,
    UserName,
}

static FIRST_CONTACT: Lazy<Vec<(FirstContact, Regex)>> = Lazy::new(|| {
    vec![
        (FirstContact::HostKey, dialect::HOST_KEY_PROMPT.clone()),
        (FirstContact::Refused, dialect::CONNECTION_REFUSED.clone()),
        (FirstContact::UserName, dialect::USER_NAME_PROMPT.clone()),
        (FirstContact::Prompt, dialect::COMMAND_PROMPT.clone()),
    ]
});

static USER_NAME: Lazy<Vec<(Challenge, Regex)>> =
    Lazy::new(|| vec![(Challenge::UserName, dialect::USER_NAME_PROMPT.clone())]);

static PASSWORD: Lazy<Vec<(Challenge, Regex)>> =
    Lazy::new(|| vec![(Challenge::Password, dialect::PASSWORD_PROMPT.clone())]);

static VERDICT: Lazy<Vec<(Verdict, Regex)>> = Lazy::new(|| {
    vec![
        (Verdict::Prompt, dialect::COMMAND_PROMPT.clone()),
        (Verdict::UserName, dialect::USER_NAME_PROMPT.clone()),
    ]
});

/// Drive the login dialogue on a freshly spawned channel.
///
/// Channel I/O errors are returned; every dialogue outcome is a value.
pub(crate) async fn run<Ch: TerminalChannel>(
    channel: &mut Ch,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<Login> {
    match channel.expect(FIRST_CONTACT.as_slice(), timeout).await? {
        Expect::Matched {
            kind: FirstContact::HostKey,
            ..
        } => {
            debug!("login: accepting host key");
            channel.send_line(dialect::HOST_KEY_ACCEPT).await?;
            match channel.expect(USER_NAME.as_slice(), timeout).await? {
                Expect::Matched { .. } => {}
                Expect::Eof { .. } | Expect::Timeout { .. } => {
                    return Ok(ConnectOutcome::HostKeyUnconfirmed.into());
                }
            }
        }
        Expect::Matched {
            kind: FirstContact::Refused,
            ..
        } => return Ok(ConnectOutcome::Refused.into()),
        Expect::Matched {
            kind: FirstContact::UserName,
            ..
        } => {}
        Expect::Matched {
            kind: FirstContact::Prompt,
            matched,
            ..
        } => {
            debug!("login: prompt reached without in-band challenge");
            return Ok(Login::at_prompt(&matched));
        }
        Expect::Eof { .. } | Expect::Timeout { .. } => {
            return Ok(ConnectOutcome::StartFailed.into());
        }
    }

    submit_credentials(channel, credentials, timeout).await
}

async fn submit_credentials<Ch: TerminalChannel>(
    channel: &mut Ch,
    credentials: &Credentials,
    timeout: Duration,
) -> Result<Login> {
    debug!("login: sending user name '{}'", credentials.username);
    channel.send_line(&credentials.username).await?;

    match channel.expect(PASSWORD.as_slice(), timeout).await? {
        Expect::Matched { .. } => {}
        Expect::Eof { .. } | Expect::Timeout { .. } => {
            return Ok(ConnectOutcome::LoginFailed.into());
        }
    }

    debug!("login: sending password");
    channel
        .send_line(credentials.password.expose_secret())
        .await?;

    let login = match channel.expect(VERDICT.as_slice(), timeout).await? {
        Expect::Matched {
            kind: Verdict::Prompt,
            matched,
            ..
        } => Login::at_prompt(&matched),
        Expect::Matched {
            kind: Verdict::UserName,
            ..
        } => ConnectOutcome::WrongCredentials.into(),
        Expect::Eof { .. } | Expect::Timeout { .. } => ConnectOutcome::LoginFailed.into(),
    };
    Ok(login)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::PtyChannel;
    use crate::channel::testing::{PASSWORD as PASS, PROMPT, USERNAME, login};
    use tokio_test::io::Builder;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn credentials() -> Credentials {
        Credentials::new(USERNAME, PASS)
    }

    #[tokio::test]
    async fn test_direct_user_name_challenge() {
        let mock = login(&mut Builder::new()).build();
        let mut channel = PtyChannel::new(mock);
        let login = run(&mut channel, &credentials(), TIMEOUT).await.unwrap();
        assert_eq!(login.outcome, ConnectOutcome::Established);
        assert_eq!(login.hostname.as_deref(), Some("switch01"));
    }

    #[tokio::test]
    async fn test_host_key_prompt_is_accepted() {
        let mut builder = Builder::new();
        builder
            .read(b"The authenticity of host '10.0.0.2 (10.0.0.2)' can't be established.\r\n")
            .read(b"Are you sure you want to continue connecting (yes/no)? ")
            .write(b"yes\n");
        let mock = login(&mut builder).build();
        let mut channel = PtyChannel::new(mock);

        let outcome = run(&mut channel, &credentials(), TIMEOUT).await.unwrap().outcome;
        assert_eq!(outcome, ConnectOutcome::Established);
    }

    #[tokio::test]
    async fn test_refused_connection() {
        let mock = Builder::new()
            .read(b"ssh: connect to host 10.0.0.2 port 22: Connection refused\r\n")
            .build();
        let mut channel = PtyChannel::new(mock);
        let outcome = run(&mut channel, &credentials(), TIMEOUT).await.unwrap().outcome;
        assert_eq!(outcome, ConnectOutcome::Refused);
    }

    #[tokio::test]
    async fn test_prompt_without_challenge() {
        let mock = Builder::new().read(b"Welcome\r\ncore-sw.lab# ").build();
        let mut channel = PtyChannel::new(mock);
        let login = run(&mut channel, &credentials(), TIMEOUT).await.unwrap();
        assert_eq!(login.outcome, ConnectOutcome::Established);
        assert_eq!(login.hostname.as_deref(), Some("core-sw.lab"));
    }

    #[tokio::test]
    async fn test_rejected_credentials_loop_back() {
        let mock = Builder::new()
            .read(b"User Name:")
            .write(b"admin\n")
            .read(b"admin\r\nPassword:")
            .write(b"secret\n")
            .read(b"\r\n\r\nUser Name:")
            .build();
        let mut channel = PtyChannel::new(mock);
        let login = run(&mut channel, &credentials(), TIMEOUT).await.unwrap();
        assert_eq!(login.outcome, ConnectOutcome::WrongCredentials);
        assert!(login.hostname.is_none());
    }

    #[tokio::test]
    async fn test_eof_before_challenge() {
        let mock = Builder::new().read(b"Connection closed by remote host\r\n").build();
        let mut channel = PtyChannel::new(mock);
        let outcome = run(&mut channel, &credentials(), TIMEOUT).await.unwrap().outcome;
        assert_eq!(outcome, ConnectOutcome::StartFailed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_waiting_for_password() {
        let mock = Builder::new()
            .read(b"User Name:")
            .write(b"admin\n")
            .wait(Duration::from_secs(120))
            .build();
        let mut channel = PtyChannel::new(mock);
        let outcome = run(&mut channel, &credentials(), TIMEOUT).await.unwrap().outcome;
        assert_eq!(outcome, ConnectOutcome::LoginFailed);
    }

    #[tokio::test]
    async fn test_eof_after_host_key() {
        let mock = Builder::new()
            .read(b"The authenticity of host 'sw (10.0.0.2)' can't be established.\r\n")
            .write(b"yes\n")
            .build();
        let mut channel = PtyChannel::new(mock);
        let outcome = run(&mut channel, &credentials(), TIMEOUT).await.unwrap().outcome;
        assert_eq!(outcome, ConnectOutcome::HostKeyUnconfirmed);
    }

    #[test]
    fn test_prompt_constant_is_a_prompt() {
        assert!(dialect::COMMAND_PROMPT.is_match(PROMPT));
    }
}
