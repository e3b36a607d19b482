//! Scripted device transcripts for tests.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use tokio_test::io::{Builder, Mock};

use super::expect::Connector;
use super::pty::PtyChannel;
use crate::error::{Result, TransportError};

pub(crate) const USERNAME: &str = "admin";
pub(crate) const PASSWORD: &str = "secret";
pub(crate) const PROMPT: &[u8] = b"\r\nswitch01#";

/// Hands out one scripted transcript per `spawn()`.
#[derive(Default)]
pub(crate) struct ScriptedConnector {
    scripts: Mutex<VecDeque<std::result::Result<Mock, io::ErrorKind>>>,
}

impl ScriptedConnector {
    pub(crate) fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self::default()
    }

    pub(crate) fn with(mut self, mock: Mock) -> Self {
        self.scripts.get_mut().unwrap().push_back(Ok(mock));
        self
    }

    pub(crate) fn with_error(mut self, kind: io::ErrorKind) -> Self {
        self.scripts.get_mut().unwrap().push_back(Err(kind));
        self
    }

    pub(crate) fn remaining(&self) -> usize {
        self.scripts.lock().unwrap().len()
    }
}

impl Connector for ScriptedConnector {
    type Channel = PtyChannel<Mock>;

    async fn spawn(&self) -> Result<Self::Channel> {
        let next = self.scripts.lock().unwrap().pop_front();
        match next {
            Some(Ok(mock)) => Ok(PtyChannel::new(mock)),
            Some(Err(kind)) => Err(TransportError::Io(io::Error::from(kind)).into()),
            None => Err(TransportError::Io(io::Error::from(io::ErrorKind::NotConnected)).into()),
        }
    }
}

/// Append a successful in-band login to a transcript.
pub(crate) fn login(builder: &mut Builder) -> &mut Builder {
    builder
        .read(b"\r\nUser Name:")
        .write(format!("{USERNAME}\n").as_bytes())
        .read(format!("{USERNAME}\r\nPassword:").as_bytes())
        .write(format!("{PASSWORD}\n").as_bytes())
        .read(PROMPT)
}

/// Append one unpaged command exchange to a transcript.
pub(crate) fn command<'a>(builder: &'a mut Builder, command: &str, output: &str) -> &'a mut Builder {
    builder
        .write(format!("{command}\n").as_bytes())
        .read(format!("{command}\r\n{output}").as_bytes())
        .read(PROMPT)
}

/// A transcript that only logs in.
pub(crate) fn login_only() -> Mock {
    login(&mut Builder::new()).build()
}
